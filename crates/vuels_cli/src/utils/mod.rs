//! CLI utility functions

use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;
use vuels_core::VueCompilerOptions;
use vuels_language::ServiceEnvironment;
use vuels_service::GetVueOptions;

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Options read from the workspace configuration on every call.
pub fn workspace_vue_options() -> GetVueOptions {
    Arc::new(|env: &ServiceEnvironment| VueCompilerOptions::resolve(env))
}
