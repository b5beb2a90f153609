//! Template completion and hover, one plugin per template syntax.
//!
//! Component names, props, events and element attributes come from the
//! client bridge, so the same plugin works embedded and in hybrid mode.

use std::sync::Arc;

use async_trait::async_trait;
use vuels_core::VueCompilerOptions;
use vuels_core::casing::hyphenate;
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, Documentation, Hover, HoverContents,
    MarkupContent, MarkupKind, Position,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};
use vuels_ts_plugin::TsPluginClient;
use vuels_typescript::convert::file_name_of;

use super::{
    HTML_ELEMENTS, TagContext, html_tag_context, is_component_tag, is_tag_char, request_error,
    template_at,
};
use crate::{GetTsPluginClient, GetVueOptions};

const DIRECTIVES: &[&str] = &[
    "v-if", "v-else-if", "v-else", "v-for", "v-show", "v-model", "v-slot", "v-bind", "v-on",
    "v-html", "v-text", "v-once", "v-memo", "v-pre", "v-cloak",
];

/// A template syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateLanguage {
    Html,
    Pug,
}

impl TemplateLanguage {
    pub fn plugin_name(self) -> &'static str {
        match self {
            Self::Html => "vue-template-html",
            Self::Pug => "vue-template-pug",
        }
    }

    /// Returns `true` if a template block with this `lang` uses the syntax.
    pub fn accepts(self, lang: Option<&str>) -> bool {
        match self {
            Self::Html => matches!(lang, None | Some("html")),
            Self::Pug => matches!(lang, Some("pug" | "jade")),
        }
    }
}

pub fn create(
    language: TemplateLanguage,
    get_vue_options: GetVueOptions,
    get_ts_plugin_client: GetTsPluginClient,
) -> LanguageServicePlugin {
    LanguageServicePlugin::new(language.plugin_name(), move |context: &ServiceContext| {
        PluginInstance::new(TemplateFeatures {
            language,
            context: context.clone(),
            vue_options: get_vue_options(context.env()),
            client: get_ts_plugin_client(context),
        })
    })
}

struct TemplateFeatures {
    language: TemplateLanguage,
    context: ServiceContext,
    vue_options: VueCompilerOptions,
    client: Option<Arc<dyn TsPluginClient>>,
}

/// Classifies `offset` inside a pug template starting at `block_start`.
fn pug_tag_context(text: &str, block_start: usize, offset: usize) -> TagContext {
    let line_start = text[block_start..offset]
        .rfind('\n')
        .map_or(block_start, |i| block_start + i + 1);
    let line = text[line_start..offset].trim_start();

    if let Some(paren) = line.rfind('(')
        && !line[paren..].contains(')')
    {
        let tag: String = line[..paren].chars().take_while(|c| is_tag_char(*c)).collect();
        return if tag.is_empty() {
            TagContext::Content
        } else {
            TagContext::Attribute { tag }
        };
    }
    if line.chars().all(is_tag_char) {
        TagContext::TagName {
            start: offset - line.len(),
        }
    } else {
        TagContext::Content
    }
}

fn item(label: impl Into<String>, kind: CompletionItemKind, detail: &str) -> CompletionItem {
    CompletionItem {
        label: label.into(),
        kind: Some(kind),
        detail: Some(detail.to_string()),
        ..Default::default()
    }
}

impl TemplateFeatures {
    /// File name and cursor context, if `position` is in a template of this syntax.
    fn locate(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Option<(String, TagContext, usize)> {
        let (template, offset) = template_at(document, position)?;
        if !self.language.accepts(template.lang.as_deref()) {
            return None;
        }
        let file_name = file_name_of(&self.context, &document.uri);
        if !self.vue_options.is_component_file(&file_name) {
            return None;
        }
        let start = template.start as usize;
        let tag_context = match self.language {
            TemplateLanguage::Html => html_tag_context(&document.text, start, offset),
            TemplateLanguage::Pug => pug_tag_context(&document.text, start, offset),
        };
        Some((file_name, tag_context, offset))
    }

    async fn tag_items(
        &self,
        client: &dyn TsPluginClient,
        file_name: &str,
    ) -> ServiceResult<Vec<CompletionItem>> {
        let names = client
            .get_component_names(file_name)
            .await
            .map_err(request_error(self.language.plugin_name()))?
            .unwrap_or_default();

        let mut items: Vec<CompletionItem> = Vec::new();
        for name in names {
            for label in [hyphenate(&name), name] {
                if !items.iter().any(|i| i.label == label) {
                    items.push(item(label, CompletionItemKind::CLASS, "component"));
                }
            }
        }
        items.extend(
            HTML_ELEMENTS
                .iter()
                .map(|e| item(*e, CompletionItemKind::PROPERTY, "element")),
        );
        Ok(items)
    }

    async fn attribute_items(
        &self,
        client: &dyn TsPluginClient,
        file_name: &str,
        tag: &str,
    ) -> ServiceResult<Vec<CompletionItem>> {
        let to_service_error = request_error(self.language.plugin_name());
        let mut items = Vec::new();

        if is_component_tag(tag) {
            let props = client
                .get_component_props(file_name, tag, false)
                .await
                .map_err(&to_service_error)?
                .unwrap_or_default();
            for prop in props {
                let detail = if prop.required { "required prop" } else { "prop" };
                let mut prop_item = item(hyphenate(&prop.name), CompletionItemKind::FIELD, detail);
                if !prop.documentation.is_empty() {
                    prop_item.documentation = Some(Documentation::String(prop.documentation));
                }
                items.push(prop_item);
            }

            let events = client
                .get_component_events(file_name, tag)
                .await
                .map_err(&to_service_error)?
                .unwrap_or_default();
            items.extend(
                events.iter().map(|e| {
                    item(format!("@{}", hyphenate(e)), CompletionItemKind::EVENT, "event")
                }),
            );
        } else {
            let attrs = client
                .get_element_attrs(file_name, tag)
                .await
                .map_err(&to_service_error)?
                .unwrap_or_default();
            items.extend(
                attrs
                    .into_iter()
                    .map(|a| item(a, CompletionItemKind::FIELD, "attribute")),
            );
        }

        items.extend(
            DIRECTIVES
                .iter()
                .map(|d| item(*d, CompletionItemKind::KEYWORD, "directive")),
        );
        Ok(items)
    }
}

#[async_trait]
impl PluginFeatures for TemplateFeatures {
    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let Some((file_name, tag_context, _)) = self.locate(document, position) else {
            return Ok(None);
        };

        let items = match tag_context {
            TagContext::TagName { .. } => self.tag_items(client.as_ref(), &file_name).await?,
            TagContext::Attribute { tag } => {
                self.attribute_items(client.as_ref(), &file_name, &tag)
                    .await?
            }
            TagContext::Content => return Ok(None),
        };
        Ok(Some(CompletionList {
            is_incomplete: false,
            items,
        }))
    }

    async fn provide_hover(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<Hover>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let Some((file_name, TagContext::TagName { .. }, offset)) = self.locate(document, position)
        else {
            return Ok(None);
        };

        let info = client
            .get_quick_info_at_position(&file_name, offset as u32)
            .await
            .map_err(request_error(self.language.plugin_name()))?;
        Ok(info.map(|text| {
            let (display, documentation) = text.split_once("\n\n").unwrap_or((text.as_str(), ""));
            let mut value = format!("```typescript\n{display}\n```");
            if !documentation.is_empty() {
                value.push_str("\n\n");
                value.push_str(documentation);
            }
            Hover {
                contents: HoverContents::Markup(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value,
                }),
                range: None,
            }
        }))
    }
}
