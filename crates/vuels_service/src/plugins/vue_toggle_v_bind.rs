//! Code action toggling an attribute between static and bound (`:name`).

use std::collections::HashMap;

use async_trait::async_trait;
use vuels_language::lsp_types::{CodeAction, CodeActionKind, Range, TextEdit, WorkspaceEdit};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::{TagContext, html_tag_context, template_at};

pub const NAME: &str = "vue-toggle-v-bind-codeaction";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(ToggleVBindFeatures)
    })
}

struct ToggleVBindFeatures;

/// The edit toggling the attribute whose name starts at `start`, as
/// `(offset, removed length, inserted text)`.
pub fn toggle(name: &str, start: usize) -> Option<(usize, usize, &'static str)> {
    if let Some(rest) = name.strip_prefix("v-bind:") {
        return (!rest.is_empty()).then_some((start, "v-bind".len(), ""));
    }
    if let Some(rest) = name.strip_prefix(':') {
        return (!rest.is_empty()).then_some((start, 1, ""));
    }
    let directive = name.starts_with("v-") || name.starts_with(['@', '#', '.']);
    (!directive && !name.is_empty()).then_some((start, 0, ":"))
}

#[async_trait]
impl PluginFeatures for ToggleVBindFeatures {
    async fn provide_code_actions(
        &self,
        document: &TextDocument,
        range: Range,
    ) -> ServiceResult<Vec<CodeAction>> {
        let Some((template, offset)) = template_at(document, range.start) else {
            return Ok(Vec::new());
        };
        let text = &document.text;
        let block_start = template.start as usize;
        if !matches!(
            html_tag_context(text, block_start, offset),
            TagContext::Attribute { .. }
        ) {
            return Ok(Vec::new());
        }

        let start = text[..offset]
            .rfind(char::is_whitespace)
            .map_or(block_start, |i| i + 1);
        let end = text[start..]
            .find(|c: char| c == '=' || c == '>' || c == '/' || c.is_whitespace())
            .map_or(text.len(), |i| start + i);
        if offset > end {
            return Ok(Vec::new());
        }
        let Some((at, removed, inserted)) = toggle(&text[start..end], start) else {
            return Ok(Vec::new());
        };
        let Some(edit_range) = document.range_of(at, at + removed) else {
            return Ok(Vec::new());
        };

        let edit = TextEdit {
            range: edit_range,
            new_text: inserted.to_string(),
        };
        Ok(vec![CodeAction {
            title: "Toggle v-bind".to_string(),
            kind: Some(CodeActionKind::REFACTOR_REWRITE),
            edit: Some(WorkspaceEdit {
                changes: Some(HashMap::from([(document.uri.clone(), vec![edit])])),
                ..Default::default()
            }),
            ..Default::default()
        }])
    }
}
