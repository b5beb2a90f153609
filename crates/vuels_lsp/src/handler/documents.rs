//! Document lifecycle handlers (open, change, close).

use tower_lsp::lsp_types::*;
use tracing::debug;
use vuels_language::TextDocument;

use crate::conversion::language_id_for;
use crate::state::BackendState;

/// Stores a document and keeps the language registry in step.
///
/// The registry may derive another language id from the project options,
/// so the id the client reported is kept apart for later re-registration.
fn store(state: &BackendState, uri: Url, reported_language: &str, version: i32, text: String) {
    let reported = language_id_for(&uri, reported_language);
    let language_id = match state.session() {
        Some(session) => {
            session
                .context()
                .language()
                .set(uri.clone(), &reported, text.as_str())
                .language_id
        }
        None => reported.clone(),
    };
    state.reported_languages.write().insert(uri.clone(), reported);
    let document = TextDocument::new(uri.clone(), language_id, version, text);
    state.documents.write().insert(uri, document);
}

/// Handles the `textDocument/didOpen` notification.
///
/// Returns the URI and version to validate.
pub async fn handle_did_open(
    state: &BackendState,
    params: DidOpenTextDocumentParams,
) -> (Url, i32) {
    debug!("Document opened: {}", params.text_document.uri);

    let document = params.text_document;
    store(
        state,
        document.uri.clone(),
        &document.language_id,
        document.version,
        document.text,
    );
    (document.uri, document.version)
}

/// Handles the `textDocument/didChange` notification.
///
/// Returns the URI and version for debounced validation.
pub async fn handle_did_change(
    state: &BackendState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, i32)> {
    debug!("Document changed: {}", params.text_document.uri);

    let change = params.content_changes.into_iter().last()?;
    let uri = params.text_document.uri;
    let version = params.text_document.version;
    let reported = state
        .reported_languages
        .read()
        .get(&uri)
        .cloned()
        .unwrap_or_default();
    store(state, uri.clone(), &reported, version, change.text);
    Some((uri, version))
}

/// Handles the `textDocument/didClose` notification.
pub async fn handle_did_close(state: &BackendState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    let uri = params.text_document.uri;
    state.documents.write().remove(&uri);
    state.reported_languages.write().remove(&uri);
    if let Some(session) = state.session() {
        session.context().language().delete(&uri);
    }
    uri
}
