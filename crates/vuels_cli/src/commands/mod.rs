//! Subcommand implementations

mod lsp;
mod plugins;

pub use lsp::run_lsp;
pub use plugins::{plugin_names, run_plugins};
