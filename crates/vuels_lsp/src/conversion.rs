//! LSP type conversion utilities.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    InsertTextFormat, Position, TextDocumentIdentifier, TextEdit, Url, WorkspaceEdit,
};
use vuels_language::{AutoInsertChange, DocumentDropEdit, DropItem};

use crate::session::AutoInsert;

/// Language id of a document, derived from its extension.
///
/// Falls back to the id the client reported.
pub fn language_id_for(uri: &Url, reported: &str) -> String {
    let extension = Path::new(uri.path())
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    let id = match extension.as_deref() {
        Some("vue") => "vue",
        Some("html" | "htm") => "html",
        Some("css") => "css",
        Some("scss") => "scss",
        Some("less") => "less",
        Some("json") => "json",
        Some("jsonc") => "jsonc",
        Some("pug" | "jade") => "pug",
        Some("ts" | "mts" | "cts") => "typescript",
        Some("tsx") => "typescriptreact",
        Some("js" | "mjs" | "cjs") => "javascript",
        Some("jsx") => "javascriptreact",
        _ => reported,
    };
    id.to_string()
}

/// Parameters of `vue/autoInsert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoInsertParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
    pub last_change: LastChange,
}

/// The content change that triggered an auto-insert request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastChange {
    pub range_offset: usize,
    pub range_length: usize,
    pub text: String,
}

impl From<LastChange> for AutoInsertChange {
    fn from(change: LastChange) -> Self {
        Self {
            range_offset: change.range_offset,
            range_length: change.range_length,
            text: change.text,
        }
    }
}

/// Result of `vue/autoInsert`: a snippet to insert, or an edit to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutoInsertResponse {
    Snippet(String),
    Edit(TextEdit),
}

impl From<AutoInsert> for AutoInsertResponse {
    fn from(answer: AutoInsert) -> Self {
        match answer {
            AutoInsert::Snippet(snippet) => Self::Snippet(snippet),
            AutoInsert::Edit(edit) => Self::Edit(edit),
        }
    }
}

/// Parameters of `vue/documentDrop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDropParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
    pub data_transfer: Vec<DataTransferItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTransferItem {
    pub mime_type: String,
    pub value: String,
}

impl From<DataTransferItem> for DropItem {
    fn from(item: DataTransferItem) -> Self {
        Self {
            mime_type: item.mime_type,
            value: item.value,
        }
    }
}

/// Result of `vue/documentDrop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDropResponse {
    pub insert_text: String,
    pub insert_text_format: InsertTextFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_edit: Option<WorkspaceEdit>,
}

impl From<DocumentDropEdit> for DocumentDropResponse {
    fn from(edit: DocumentDropEdit) -> Self {
        Self {
            insert_text: edit.insert_text,
            insert_text_format: edit.insert_text_format,
            additional_edit: edit.additional_edit,
        }
    }
}
