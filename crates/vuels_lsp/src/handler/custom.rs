//! Requests outside the base protocol.

use tower_lsp::jsonrpc::Result;
use vuels_language::{AutoInsertChange, DropItem};

use super::features::lookup;
use crate::conversion::{
    AutoInsertParams, AutoInsertResponse, DocumentDropParams, DocumentDropResponse,
};
use crate::state::BackendState;

/// Handles `vue/autoInsert`, sent by the client after each keystroke.
pub async fn handle_auto_insert(
    state: &BackendState,
    params: AutoInsertParams,
) -> Result<Option<AutoInsertResponse>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    let change: AutoInsertChange = params.last_change.into();
    Ok(session
        .auto_insert(&document, params.position, &change)
        .await
        .map(AutoInsertResponse::from))
}

/// Handles `vue/documentDrop`.
pub async fn handle_document_drop(
    state: &BackendState,
    params: DocumentDropParams,
) -> Result<Option<DocumentDropResponse>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    let items: Vec<DropItem> = params.data_transfer.into_iter().map(Into::into).collect();
    Ok(session
        .document_drop(&document, params.position, &items)
        .await
        .map(DocumentDropResponse::from))
}
