//! Wraps a type assertion in parentheses when a member access follows it.
//!
//! `{{ foo as Bar. }}` becomes `{{ (foo as Bar). }}`.

use async_trait::async_trait;
use vuels_language::lsp_types::{Position, TextEdit};
use vuels_language::{
    AutoInsertChange, LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext,
    ServiceResult, TextDocument,
};

use super::template_at;

pub const NAME: &str = "vue-autoinsert-parentheses";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(ParenthesesFeatures)
    })
}

struct ParenthesesFeatures;

fn has_type_assertion(expression: &str) -> bool {
    let wrapped = expression.starts_with('(') && expression.ends_with(')');
    !wrapped && expression.split_whitespace().any(|word| word == "as")
}

#[async_trait]
impl PluginFeatures for ParenthesesFeatures {
    async fn provide_auto_insert_edit(
        &self,
        document: &TextDocument,
        position: Position,
        change: &AutoInsertChange,
    ) -> ServiceResult<Option<TextEdit>> {
        if change.text != "." {
            return Ok(None);
        }
        let Some((template, offset)) = template_at(document, position) else {
            return Ok(None);
        };
        let text = &document.text;
        let block_start = template.start as usize;
        if offset <= block_start || !text[..offset].ends_with('.') {
            return Ok(None);
        }

        let before = &text[block_start..offset - 1];
        let Some(open) = before.rfind("{{") else {
            return Ok(None);
        };
        if before[open..].contains("}}") {
            return Ok(None);
        }
        let region = &before[open + 2..];
        let expression = region.trim();
        if !has_type_assertion(expression) {
            return Ok(None);
        }

        let start = block_start + open + 2 + (region.len() - region.trim_start().len());
        let Some(range) = document.range_of(start, offset) else {
            return Ok(None);
        };
        Ok(Some(TextEdit {
            range,
            new_text: format!("({expression})."),
        }))
    }
}
