//! Pads a freshly opened interpolation: `{{` becomes `{{ | }}`.

use async_trait::async_trait;
use vuels_language::lsp_types::Position;
use vuels_language::{
    AutoInsertChange, LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext,
    ServiceResult, TextDocument,
};

use super::template_at;

pub const NAME: &str = "vue-autoinsert-space";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| PluginInstance::new(SpaceFeatures))
}

struct SpaceFeatures;

#[async_trait]
impl PluginFeatures for SpaceFeatures {
    async fn provide_auto_insert_snippet(
        &self,
        document: &TextDocument,
        position: Position,
        change: &AutoInsertChange,
    ) -> ServiceResult<Option<String>> {
        if !change.text.ends_with('{') {
            return Ok(None);
        }
        let Some((_, offset)) = template_at(document, position) else {
            return Ok(None);
        };
        let before = &document.text[..offset];
        if !before.ends_with("{{") || before.ends_with("{{{") {
            return Ok(None);
        }
        let snippet = if document.text[offset..].starts_with("}}") {
            " $0 "
        } else {
            " $0 }}"
        };
        Ok(Some(snippet.to_string()))
    }
}
