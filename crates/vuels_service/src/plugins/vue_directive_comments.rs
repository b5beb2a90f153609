//! Completion of template directive comments such as `<!-- @vue-ignore -->`.

use async_trait::async_trait;
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, CompletionTextEdit, Position, Range,
    TextEdit,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::template_at;

pub const NAME: &str = "vue-directive-comments";

const DIRECTIVES: &[(&str, &str)] = &[
    ("@vue-ignore", "Suppress errors in the next element"),
    ("@vue-skip", "Skip type checking of the next element"),
    ("@vue-expect-error", "Expect an error in the next element"),
    ("@vue-generic", "Declare generic arguments of the next component"),
];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(DirectiveCommentFeatures)
    })
}

struct DirectiveCommentFeatures;

#[async_trait]
impl PluginFeatures for DirectiveCommentFeatures {
    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        let Some((template, offset)) = template_at(document, position) else {
            return Ok(None);
        };
        let before = &document.text[template.start as usize..offset];
        let Some(open) = before.rfind("<!--") else {
            return Ok(None);
        };
        let body = &before[open + 4..];
        let typed = body.trim_start();
        if !typed.starts_with('@') || typed.contains(char::is_whitespace) {
            return Ok(None);
        }

        let start = offset - typed.len();
        let Some(start) = document.position_at(start) else {
            return Ok(None);
        };
        let range = Range::new(start, position);
        let items = DIRECTIVES
            .iter()
            .map(|(label, detail)| CompletionItem {
                label: label.to_string(),
                kind: Some(CompletionItemKind::KEYWORD),
                detail: Some(detail.to_string()),
                text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                    range,
                    new_text: label.to_string(),
                })),
                ..Default::default()
            })
            .collect();
        Ok(Some(CompletionList {
            is_incomplete: false,
            items,
        }))
    }
}
