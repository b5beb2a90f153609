//! Plugins command implementation

use std::sync::Arc;

use miette::Result;
use vuels_service::create_vue_service_plugins;
use vuels_ts_plugin::remote::HostProcessEngine;

use crate::utils::workspace_vue_options;

/// Names of the composed plugins, in order.
pub fn plugin_names(hybrid: bool) -> Vec<String> {
    create_vue_service_plugins(
        Arc::new(HostProcessEngine),
        workspace_vue_options(),
        None,
        hybrid,
    )
    .iter()
    .map(|plugin| plugin.name().to_string())
    .collect()
}

pub fn run_plugins(hybrid: bool) -> Result<()> {
    for name in plugin_names(hybrid) {
        println!("{name}");
    }
    Ok(())
}
