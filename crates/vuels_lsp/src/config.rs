//! Configuration management for LSP server.

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, info};
use vuels_core::VueCompilerOptions;
use vuels_language::ServiceEnvironment;

/// Lazily resolved `vueCompilerOptions` of the workspace.
#[derive(Default)]
pub struct OptionsCache {
    cached: RwLock<Option<VueCompilerOptions>>,
}

impl OptionsCache {
    /// Returns the cached options, resolving them from `env` on a miss.
    pub fn get(&self, env: &ServiceEnvironment) -> VueCompilerOptions {
        if let Some(options) = self.cached.read().as_ref() {
            return options.clone();
        }
        let options = VueCompilerOptions::resolve(env);
        debug!("Resolved vueCompilerOptions: {:?}", options.extensions);
        *self.cached.write() = Some(options.clone());
        options
    }

    /// Drops the cached options.
    pub fn invalidate(&self) {
        if self.cached.write().take().is_some() {
            info!("Project configuration changed, vueCompilerOptions will be reloaded");
        }
    }

    /// Returns `true` if options are cached.
    pub fn is_cached(&self) -> bool {
        self.cached.read().is_some()
    }
}

impl fmt::Debug for OptionsCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsCache")
            .field("cached", &self.is_cached())
            .finish()
    }
}

/// Returns `true` if a changed file is a project configuration file.
pub fn is_config_file(path: &str) -> bool {
    VueCompilerOptions::CONFIG_FILES
        .iter()
        .any(|name| path.ends_with(name))
}
