//! Watched files handler.

use std::sync::Arc;

use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use crate::ServerOptions;
use crate::config::is_config_file;
use crate::handler::initialize::build_session;
use crate::state::BackendState;

/// Handles the `workspace/didChangeWatchedFiles` notification.
///
/// A changed `tsconfig.json` or `jsconfig.json` replaces the session with
/// one built from the new configuration, and the open documents are
/// registered again. Returns the documents to validate again.
pub async fn handle_did_change_watched_files(
    state: &BackendState,
    options: &ServerOptions,
    params: DidChangeWatchedFilesParams,
) -> Vec<(Url, i32)> {
    debug!("Watched files changed: {:?}", params.changes);

    if !params
        .changes
        .iter()
        .any(|change| is_config_file(change.uri.path()))
    {
        return Vec::new();
    }
    state.options.invalidate();

    let Some(current) = state.session() else {
        return Vec::new();
    };
    let session = build_session(state, options, current.context().env().clone());

    let reported_languages = state.reported_languages.read();
    let mut documents = state.documents.write();
    for document in documents.values_mut() {
        let reported = reported_languages
            .get(&document.uri)
            .map_or(document.language_id.as_str(), String::as_str);
        let script = session.context().language().set(
            document.uri.clone(),
            reported,
            document.text.as_str(),
        );
        document.language_id = script.language_id;
    }
    let reopened: Vec<(Url, i32)> = documents
        .values()
        .map(|document| (document.uri.clone(), document.version))
        .collect();
    *state.session.write() = Some(Arc::new(session));
    drop(documents);
    drop(reported_languages);

    info!(
        "Project configuration reloaded, {} open documents registered again",
        reopened.len()
    );
    reopened
}
