//! Style, data, template and component-specific plugins.

pub mod css;
pub mod emmet;
pub mod json;
pub mod pug_beautify;
pub mod vue_autoinsert_dotvalue;
pub mod vue_autoinsert_parentheses;
pub mod vue_autoinsert_space;
pub mod vue_codelens_references;
pub mod vue_directive_comments;
pub mod vue_document_drop;
pub mod vue_extract_file;
pub mod vue_hidden_callback_param;
pub mod vue_sfc;
pub mod vue_template;
pub mod vue_toggle_v_bind;
pub mod vue_twoslash_queries;

use vuels_core::{SfcBlock, parse_sfc};
use vuels_language::lsp_types::{Position, Range, TextEdit};
use vuels_language::{ServiceError, TextDocument};
use vuels_ts_plugin::RequestError;

/// Language id of component documents.
pub const VUE_LANGUAGE_ID: &str = "vue";

/// Common HTML elements offered next to components.
pub const HTML_ELEMENTS: &[&str] = &[
    "a", "article", "aside", "button", "canvas", "code", "dd", "details", "dialog", "div", "dl",
    "dt", "em", "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "img", "input", "label", "legend", "li", "main", "nav", "ol", "option", "p",
    "pre", "section", "select", "slot", "span", "strong", "summary", "table", "tbody", "td",
    "template", "textarea", "tfoot", "th", "thead", "tr", "ul", "video",
];

pub(crate) fn is_vue_document(document: &TextDocument) -> bool {
    document.language_id == VUE_LANGUAGE_ID
}

/// The template block containing `position`, with the position's byte offset.
pub(crate) fn template_at(
    document: &TextDocument,
    position: Position,
) -> Option<(SfcBlock, usize)> {
    if !is_vue_document(document) {
        return None;
    }
    let offset = document.offset_at(position);
    let template = parse_sfc(&document.text).template?;
    template
        .contains(offset as u32)
        .then_some((template, offset))
}

pub(crate) fn is_tag_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

/// Start of the identifier-like word ending at `offset`.
pub(crate) fn word_start(text: &str, offset: usize, is_word: impl Fn(char) -> bool) -> usize {
    text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word(*ch))
        .last()
        .map_or(offset, |(i, _)| i)
}

/// Where the cursor sits relative to markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagContext {
    /// Typing a tag name; `start` is where the name begins.
    TagName { start: usize },
    /// Inside the start tag of `tag`, outside any attribute value.
    Attribute { tag: String },
    /// Anywhere else.
    Content,
}

/// Classifies `offset` inside HTML starting at `block_start`.
pub(crate) fn html_tag_context(text: &str, block_start: usize, offset: usize) -> TagContext {
    let before = &text[block_start..offset];
    if let Some(open) = before.rfind("<!--")
        && !before[open..].contains("-->")
    {
        return TagContext::Content;
    }
    let Some(lt) = before.rfind('<') else {
        return TagContext::Content;
    };
    let inner = &before[lt + 1..];
    if inner.contains('>') || inner.starts_with('!') {
        return TagContext::Content;
    }
    let name = inner.strip_prefix('/').unwrap_or(inner);
    if name.chars().all(is_tag_char) {
        return TagContext::TagName {
            start: offset - name.len(),
        };
    }
    if inner.starts_with('/') || inner.matches(['"', '\'']).count() % 2 == 1 {
        return TagContext::Content;
    }
    let tag: String = name.chars().take_while(|c| is_tag_char(*c)).collect();
    if tag.is_empty() {
        TagContext::Content
    } else {
        TagContext::Attribute { tag }
    }
}

/// Tags resolved through the component table rather than as elements.
pub(crate) fn is_component_tag(tag: &str) -> bool {
    tag.contains('-') || tag.starts_with(|c: char| c.is_ascii_uppercase())
}

/// Inserts `import` into `<script setup>`, creating the block if missing.
pub(crate) fn import_edit(document: &TextDocument, import: &str) -> Option<TextEdit> {
    let sfc = parse_sfc(&document.text);
    if let Some(script) = &sfc.script_setup {
        let at = document.position_at(script.start as usize)?;
        return Some(TextEdit {
            range: Range::new(at, at),
            new_text: format!("\n{import}"),
        });
    }
    let lang = sfc
        .script
        .as_ref()
        .and_then(|s| s.lang.as_deref())
        .unwrap_or("ts");
    let start = Position::new(0, 0);
    Some(TextEdit {
        range: Range::new(start, start),
        new_text: format!("<script setup lang=\"{lang}\">\n{import}\n</script>\n\n"),
    })
}

pub(crate) fn request_error(plugin: &str) -> impl Fn(RequestError) -> ServiceError + '_ {
    move |e| ServiceError::plugin(plugin, e.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{GetTsPluginClient, GetVueOptions};
    use async_trait::async_trait;
    use rstest::rstest;
    use vuels_ts_plugin::{ComponentProp, ExtractPropCandidate, RequestResult, TsPluginClient};
    use vuels_core::{VueCompilerOptions, VueLanguagePlugin};
    use vuels_language::lsp_types::Url;
    use vuels_language::{LanguageRegistry, ServiceContext, ServiceEnvironment, TypeScriptSupport};
    use vuels_typescript::ScriptEngine;
    use vuels_typescript::test_utils::{FakeEngine, FakeLanguageService};

    pub(crate) const APP: &str = "/work/App.vue";

    pub(crate) const APP_SOURCE: &str = r#"<script setup lang="ts">
const count = ref(0)
</script>

<template>
  <my-button @click="increment">{{ count }}</my-button>
  <input type="text">
</template>

<style scoped>
.app { color: red; }
</style>
"#;

    pub(crate) fn app_uri() -> Url {
        Url::from_file_path(APP).unwrap()
    }

    pub(crate) fn app_document() -> TextDocument {
        document("vue", APP_SOURCE)
    }

    pub(crate) fn document(language_id: &str, text: &str) -> TextDocument {
        TextDocument::new(app_uri(), language_id, 1, text)
    }

    pub(crate) fn engine(fake: FakeLanguageService) -> Arc<dyn ScriptEngine> {
        Arc::new(FakeEngine::new(fake))
    }

    fn registry(typescript: bool) -> Arc<LanguageRegistry> {
        let mut registry = LanguageRegistry::new(vec![Arc::new(VueLanguagePlugin::default())]);
        if typescript {
            registry = registry.with_typescript(TypeScriptSupport::default());
        }
        registry.set(app_uri(), "vue", APP_SOURCE);
        Arc::new(registry)
    }

    pub(crate) fn session() -> ServiceContext {
        ServiceContext::new(ServiceEnvironment::default(), registry(true))
    }

    pub(crate) fn session_without_typescript() -> ServiceContext {
        ServiceContext::new(ServiceEnvironment::default(), registry(false))
    }

    /// Client answering from fixed data.
    #[derive(Default, Clone)]
    pub(crate) struct StubClient {
        pub names: Vec<String>,
        pub props: Vec<ComponentProp>,
        pub events: Vec<String>,
        pub attrs: Vec<String>,
        pub context_props: Vec<String>,
        pub properties: Vec<String>,
        pub extract: Vec<ExtractPropCandidate>,
        pub quick_info: Option<String>,
    }

    #[async_trait]
    impl TsPluginClient for StubClient {
        async fn collect_extract_props(
            &self,
            _file_name: &str,
            _template_code_range: (u32, u32),
        ) -> RequestResult<Option<Vec<ExtractPropCandidate>>> {
            Ok(Some(self.extract.clone()))
        }

        async fn get_properties_at_location(
            &self,
            _file_name: &str,
            _position: u32,
        ) -> RequestResult<Option<Vec<String>>> {
            Ok(Some(self.properties.clone()))
        }

        async fn get_component_events(
            &self,
            _file_name: &str,
            _tag: &str,
        ) -> RequestResult<Option<Vec<String>>> {
            Ok(Some(self.events.clone()))
        }

        async fn get_component_names(
            &self,
            _file_name: &str,
        ) -> RequestResult<Option<Vec<String>>> {
            Ok(Some(self.names.clone()))
        }

        async fn get_component_props(
            &self,
            _file_name: &str,
            _tag: &str,
            required_only: bool,
        ) -> RequestResult<Option<Vec<ComponentProp>>> {
            Ok(Some(
                self.props
                    .iter()
                    .filter(|p| !required_only || p.required)
                    .cloned()
                    .collect(),
            ))
        }

        async fn get_element_attrs(
            &self,
            _file_name: &str,
            _tag: &str,
        ) -> RequestResult<Option<Vec<String>>> {
            Ok(Some(self.attrs.clone()))
        }

        async fn get_template_context_props(
            &self,
            _file_name: &str,
        ) -> RequestResult<Option<Vec<String>>> {
            Ok(Some(self.context_props.clone()))
        }

        async fn get_quick_info_at_position(
            &self,
            _file_name: &str,
            _position: u32,
        ) -> RequestResult<Option<String>> {
            Ok(self.quick_info.clone())
        }
    }

    pub(crate) fn client_factory(stub: StubClient) -> GetTsPluginClient {
        Arc::new(move |_context: &ServiceContext| {
            Some(Arc::new(stub.clone()) as Arc<dyn TsPluginClient>)
        })
    }

    pub(crate) fn vue_options() -> GetVueOptions {
        Arc::new(|_env: &ServiceEnvironment| VueCompilerOptions::default())
    }

    pub(crate) fn no_client() -> GetTsPluginClient {
        Arc::new(|_context: &ServiceContext| None)
    }

    /// Position of the first occurrence of `needle` in [`APP_SOURCE`], plus `delta` bytes.
    pub(crate) fn position_of(needle: &str, delta: usize) -> Position {
        app_document()
            .position_at(APP_SOURCE.find(needle).unwrap() + delta)
            .unwrap()
    }

    #[rstest]
    #[case("<div><my-b", TagContext::TagName { start: 6 })]
    #[case("<div></", TagContext::TagName { start: 7 })]
    #[case("<my-button :a=\"1\" ", TagContext::Attribute { tag: "my-button".to_string() })]
    #[case("<my-button :a=\"x ", TagContext::Content)]
    #[case("<div>text ", TagContext::Content)]
    #[case("<!-- <a ", TagContext::Content)]
    fn test_html_tag_context(#[case] text: &str, #[case] expected: TagContext) {
        assert_eq!(html_tag_context(text, 0, text.len()), expected);
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("{{ count", 8, char::is_alphanumeric), 3);
        assert_eq!(word_start("a b", 1, char::is_alphanumeric), 0);
        assert_eq!(word_start("a ", 2, char::is_alphanumeric), 2);
    }

    #[test]
    fn test_template_at() {
        let doc = app_document();
        assert!(template_at(&doc, position_of("<my-button", 1)).is_some());
        assert!(template_at(&doc, position_of("const", 0)).is_none());
    }
}
