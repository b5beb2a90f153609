//! Debouncing utilities for LSP notifications.

use std::future::Future;
use std::time::Duration;

use tower_lsp::lsp_types::Url;
use tracing::trace;

use crate::state::SharedState;

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Spawns a debounced validation task.
///
/// The task waits for the debounce period and runs `validate` only if the
/// document is still open at `version`.
pub fn spawn_debounced_validation<F, Fut>(state: SharedState, uri: Url, version: i32, validate: F)
where
    F: FnOnce(Url, i32) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS)).await;

        if state.is_current(&uri, version) {
            validate(uri, version).await;
        } else {
            trace!("Skipping stale validation of {} v{}", uri, version);
        }
    });
}
