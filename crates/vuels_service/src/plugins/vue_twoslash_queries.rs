//! Inline type queries in templates: `<!-- ^? -->` under an expression.

use std::sync::Arc;

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{InlayHint, InlayHintKind, InlayHintLabel, Position, Range};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};
use vuels_ts_plugin::TsPluginClient;
use vuels_typescript::convert::file_name_of;

use super::{is_vue_document, request_error};
use crate::GetTsPluginClient;

pub const NAME: &str = "vue-twoslash-queries";

pub fn create(get_ts_plugin_client: GetTsPluginClient) -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, move |context: &ServiceContext| {
        PluginInstance::new(TwoslashFeatures {
            context: context.clone(),
            client: get_ts_plugin_client(context),
        })
    })
}

struct TwoslashFeatures {
    context: ServiceContext,
    client: Option<Arc<dyn TsPluginClient>>,
}

/// Byte offsets of the `^` of each `<!-- ^? -->` comment in `text[start..end]`.
pub fn find_template_queries(text: &str, start: usize, end: usize) -> Vec<usize> {
    let mut queries = Vec::new();
    let mut pos = start;
    while let Some(rel) = text[pos..end].find("<!--") {
        let open = pos + rel + 4;
        let Some(close) = text[open..end].find("-->").map(|i| open + i) else {
            break;
        };
        let body = &text[open..close];
        if body.trim() == "^?" {
            queries.push(open + body.find('^').unwrap_or_default());
        }
        pos = close + 3;
    }
    queries
}

#[async_trait]
impl PluginFeatures for TwoslashFeatures {
    async fn provide_inlay_hints(
        &self,
        document: &TextDocument,
        range: Range,
    ) -> ServiceResult<Vec<InlayHint>> {
        let Some(client) = &self.client else {
            return Ok(Vec::new());
        };
        if !is_vue_document(document) {
            return Ok(Vec::new());
        }
        let Some(template) = parse_sfc(&document.text).template else {
            return Ok(Vec::new());
        };
        let file_name = file_name_of(&self.context, &document.uri);

        let mut hints = Vec::new();
        let (start, end) = (template.start as usize, template.end as usize);
        for caret in find_template_queries(&document.text, start, end) {
            let Some(at) = document.position_at(caret) else {
                continue;
            };
            if at.line == 0 || at.line < range.start.line || at.line > range.end.line {
                continue;
            }
            let target = document.offset_at(Position::new(at.line - 1, at.character));
            let Some(info) = client
                .get_quick_info_at_position(&file_name, target as u32)
                .await
                .map_err(request_error(NAME))?
            else {
                continue;
            };
            let display = info.split("\n\n").next().unwrap_or_default();
            let Some(end_of_line) = document.text[caret..]
                .find('\n')
                .and_then(|i| document.position_at(caret + i))
            else {
                continue;
            };
            hints.push(InlayHint {
                position: end_of_line,
                label: InlayHintLabel::String(display.replace(['\r', '\n'], " ")),
                kind: Some(InlayHintKind::TYPE),
                text_edits: None,
                tooltip: None,
                padding_left: Some(true),
                padding_right: None,
                data: None,
            });
        }
        Ok(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{StubClient, client_factory, document, session};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_template_queries() {
        let text = "<p>{{ a }}</p>\n<!--   ^? -->\n<!-- note -->";
        assert_eq!(find_template_queries(text, 0, text.len()), vec![22]);
    }

    #[tokio::test]
    async fn test_query_hint() {
        let stub = StubClient {
            quick_info: Some("const count: number\n\nThe count.".to_string()),
            ..Default::default()
        };
        let instance = create(client_factory(stub)).create(&session());
        let doc = document(
            "vue",
            "<template>\n  {{ count }}\n<!-- ^? -->\n</template>\n",
        );
        let all = Range::new(Position::new(0, 0), Position::new(10, 0));
        let hints = instance.features().provide_inlay_hints(&doc, all).await.unwrap();

        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].position, Position::new(2, 11));
        assert_eq!(
            hints[0].label,
            InlayHintLabel::String("const count: number".to_string())
        );
    }
}
