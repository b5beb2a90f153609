//! Shows the arguments a method-reference event handler is called with.
//!
//! `@click="submit"` is called as `submit(...arguments)`; the hint makes the
//! hidden call visible.

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{InlayHint, InlayHintLabel, InlayHintTooltip, Range};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::is_vue_document;

pub const NAME: &str = "vue-inlay-hints-hidden-callback-param";

const LABEL: &str = "(...arguments)";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(HiddenCallbackParamFeatures)
    })
}

struct HiddenCallbackParamFeatures;

fn is_member_path(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && !value.ends_with('.')
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.')
}

/// End offsets of event handler values that are plain method references.
pub fn method_handlers(text: &str, start: usize, end: usize) -> Vec<usize> {
    let mut found = Vec::new();
    let region = &text[start..end];
    for (i, _) in region.match_indices('=') {
        let name_start = region[..i]
            .rfind(|c: char| c.is_whitespace() || c == '<')
            .map_or(0, |p| p + 1);
        let name = &region[name_start..i];
        if !(name.starts_with('@') || name.starts_with("v-on:")) {
            continue;
        }
        let Some(quote) = region[i + 1..].chars().next().filter(|c| *c == '"' || *c == '\'')
        else {
            continue;
        };
        let value_start = i + 2;
        let Some(len) = region[value_start..].find(quote) else {
            continue;
        };
        let value = &region[value_start..value_start + len];
        if is_member_path(value.trim()) {
            let trailing = value.len() - value.trim_end().len();
            found.push(start + value_start + len - trailing);
        }
    }
    found
}

#[async_trait]
impl PluginFeatures for HiddenCallbackParamFeatures {
    async fn provide_inlay_hints(
        &self,
        document: &TextDocument,
        range: Range,
    ) -> ServiceResult<Vec<InlayHint>> {
        if !is_vue_document(document) {
            return Ok(Vec::new());
        }
        let Some(template) = parse_sfc(&document.text).template else {
            return Ok(Vec::new());
        };

        let hints = method_handlers(&document.text, template.start as usize, template.end as usize)
            .into_iter()
            .filter_map(|offset| document.position_at(offset))
            .filter(|p| p.line >= range.start.line && p.line <= range.end.line)
            .map(|position| InlayHint {
                position,
                label: InlayHintLabel::String(LABEL.to_string()),
                kind: None,
                text_edits: None,
                tooltip: Some(InlayHintTooltip::String(
                    "The handler is called with the event arguments".to_string(),
                )),
                padding_left: None,
                padding_right: None,
                data: None,
            })
            .collect();
        Ok(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{app_document, session};
    use pretty_assertions::assert_eq;
    use vuels_language::lsp_types::Position;

    #[test]
    fn test_method_handlers() {
        let text = r#"<a @click="submit" v-on:input='form.update ' @keyup="n++" :x="y">"#;
        assert_eq!(
            method_handlers(text, 0, text.len()),
            vec![
                text.find("submit").unwrap() + "submit".len(),
                text.find("form.update").unwrap() + "form.update".len(),
            ]
        );
    }

    #[tokio::test]
    async fn test_hint_after_method_reference() {
        let instance = create().create(&session());
        let all = Range::new(Position::new(0, 0), Position::new(100, 0));
        let hints = instance
            .features()
            .provide_inlay_hints(&app_document(), all)
            .await
            .unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].position, Position::new(5, 30));
    }
}
