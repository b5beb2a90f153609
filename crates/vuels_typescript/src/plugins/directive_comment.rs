//! Completion of `// @ts-...` directive comments.

use async_trait::async_trait;
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, Documentation, Position,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use crate::convert::{is_script_document, line_prefix};

pub const NAME: &str = "typescript-directive-comment";

const DIRECTIVES: &[(&str, &str)] = &[
    ("@ts-check", "Enables semantic checks in a JavaScript file."),
    ("@ts-nocheck", "Disables semantic checks in the file."),
    ("@ts-ignore", "Suppresses errors on the next line."),
    (
        "@ts-expect-error",
        "Suppresses errors on the next line and reports when there are none.",
    ),
];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(DirectiveCommentFeatures)
    })
}

struct DirectiveCommentFeatures;

/// The partially typed directive after `//`, if the line is a bare comment.
fn directive_prefix(line: &str) -> Option<&str> {
    let body = line.trim_start().strip_prefix("//")?.trim_start();
    body.chars()
        .all(|c| c == '@' || c == '-' || c.is_ascii_alphanumeric())
        .then_some(body)
}

#[async_trait]
impl PluginFeatures for DirectiveCommentFeatures {
    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        if !is_script_document(document) {
            return Ok(None);
        }
        let Some(typed) = directive_prefix(line_prefix(document, position)) else {
            return Ok(None);
        };

        let items: Vec<CompletionItem> = DIRECTIVES
            .iter()
            .filter(|(name, _)| name.starts_with(typed) || typed.is_empty())
            .map(|(name, doc)| CompletionItem {
                label: name.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                documentation: Some(Documentation::String(doc.to_string())),
                ..Default::default()
            })
            .collect();

        Ok((!items.is_empty()).then_some(CompletionList {
            is_incomplete: false,
            items,
        }))
    }
}
