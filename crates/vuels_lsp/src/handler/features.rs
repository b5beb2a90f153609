//! Language feature requests, answered by the composed plugins.

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::debug;
use vuels_language::TextDocument;

use crate::session::Session;
use crate::state::BackendState;

/// The session and the open document at `uri`.
pub(crate) fn lookup(state: &BackendState, uri: &Url) -> Option<(Arc<Session>, TextDocument)> {
    let session = state.session()?;
    let document = state.document(uri)?;
    Some((session, document))
}

/// Handles the `textDocument/hover` request.
pub async fn handle_hover(state: &BackendState, params: HoverParams) -> Result<Option<Hover>> {
    let params = params.text_document_position_params;
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(session.hover(&document, params.position).await)
}

/// Handles the `textDocument/completion` request.
pub async fn handle_completion(
    state: &BackendState,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let params = params.text_document_position;
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(session
        .completion(&document, params.position)
        .await
        .map(CompletionResponse::List))
}

/// Handles the `textDocument/codeAction` request.
pub async fn handle_code_action(
    state: &BackendState,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    debug!("Code action request: {}", params.text_document.uri);

    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    let only = params.context.only.unwrap_or_default();
    let actions = session
        .code_actions(&document, params.range)
        .await
        .into_iter()
        .filter(|action| {
            only.is_empty()
                || action.kind.as_ref().is_some_and(|kind| {
                    only.iter()
                        .any(|wanted| kind.as_str().starts_with(wanted.as_str()))
                })
        })
        .map(CodeActionOrCommand::CodeAction)
        .collect();
    Ok(Some(actions))
}

/// Handles the `textDocument/codeLens` request.
pub async fn handle_code_lens(
    state: &BackendState,
    params: CodeLensParams,
) -> Result<Option<Vec<CodeLens>>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(Some(session.code_lenses(&document).await))
}

/// Handles the `textDocument/inlayHint` request.
pub async fn handle_inlay_hint(
    state: &BackendState,
    params: InlayHintParams,
) -> Result<Option<Vec<InlayHint>>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(Some(session.inlay_hints(&document, params.range).await))
}

/// Handles the `textDocument/documentSymbol` request.
pub async fn handle_document_symbol(
    state: &BackendState,
    params: DocumentSymbolParams,
) -> Result<Option<DocumentSymbolResponse>> {
    debug!("Document symbol request: {}", params.text_document.uri);

    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    let symbols = session.document_symbols(&document).await;
    Ok(Some(DocumentSymbolResponse::Nested(symbols)))
}

/// Handles the `textDocument/foldingRange` request.
pub async fn handle_folding_range(
    state: &BackendState,
    params: FoldingRangeParams,
) -> Result<Option<Vec<FoldingRange>>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(Some(session.folding_ranges(&document).await))
}

/// Handles the `textDocument/formatting` request.
pub async fn handle_formatting(
    state: &BackendState,
    params: DocumentFormattingParams,
) -> Result<Option<Vec<TextEdit>>> {
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(session.formatting(&document, &params.options).await)
}

/// Handles the `textDocument/definition` request.
pub async fn handle_definition(
    state: &BackendState,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let params = params.text_document_position_params;
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    let locations = session.definition(&document, params.position).await;
    Ok((!locations.is_empty()).then_some(GotoDefinitionResponse::Array(locations)))
}

/// Handles the `textDocument/references` request.
pub async fn handle_references(
    state: &BackendState,
    params: ReferenceParams,
) -> Result<Option<Vec<Location>>> {
    let params = params.text_document_position;
    let Some((session, document)) = lookup(state, &params.text_document.uri) else {
        return Ok(None);
    };
    Ok(Some(session.references(&document, params.position).await))
}
