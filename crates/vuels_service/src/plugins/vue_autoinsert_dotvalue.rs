//! Appends `.value` after a ref read in script code.

use std::sync::Arc;

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::Position;
use vuels_language::{
    AutoInsertChange, LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext,
    ServiceResult, TextDocument,
};
use vuels_ts_plugin::TsPluginClient;
use vuels_typescript::convert::file_name_of;

use super::{is_vue_document, request_error, word_start};
use crate::GetTsPluginClient;

pub const NAME: &str = "vue-autoinsert-dotvalue";

const SNIPPET: &str = "${1:.value}";

pub fn create(get_ts_plugin_client: GetTsPluginClient) -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, move |context: &ServiceContext| {
        PluginInstance::new(DotValueFeatures {
            context: context.clone(),
            client: get_ts_plugin_client(context),
        })
    })
}

struct DotValueFeatures {
    context: ServiceContext,
    client: Option<Arc<dyn TsPluginClient>>,
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Returns `true` if the quick info display describes a ref.
pub fn is_ref_type(display: &str) -> bool {
    ["Ref<", "ShallowRef<", "ComputedRef<", "WritableComputedRef<"]
        .iter()
        .any(|marker| display.contains(marker))
}

#[async_trait]
impl PluginFeatures for DotValueFeatures {
    async fn provide_auto_insert_snippet(
        &self,
        document: &TextDocument,
        position: Position,
        change: &AutoInsertChange,
    ) -> ServiceResult<Option<String>> {
        let Some(client) = &self.client else {
            return Ok(None);
        };
        let mut typed = change.text.chars();
        let (Some(ch), None) = (typed.next(), typed.next()) else {
            return Ok(None);
        };
        if !is_identifier_char(ch) || !is_vue_document(document) {
            return Ok(None);
        }

        let offset = document.offset_at(position);
        let sfc = parse_sfc(&document.text);
        let in_script = [&sfc.script_setup, &sfc.script]
            .into_iter()
            .flatten()
            .any(|block| block.contains(offset as u32));
        if !in_script {
            return Ok(None);
        }

        let text = &document.text;
        let start = word_start(text, offset, is_identifier_char);
        let identifier = &text[start..offset];
        if identifier.is_empty() || identifier.starts_with(|c: char| c.is_ascii_digit()) {
            return Ok(None);
        }
        if text[..start].ends_with('.') {
            return Ok(None);
        }
        if text[offset..]
            .chars()
            .next()
            .is_some_and(|c| is_identifier_char(c) || c == '.')
        {
            return Ok(None);
        }

        let file_name = file_name_of(&self.context, &document.uri);
        let info = client
            .get_quick_info_at_position(&file_name, start as u32)
            .await
            .map_err(request_error(NAME))?;
        Ok(info
            .is_some_and(|display| is_ref_type(&display))
            .then(|| SNIPPET.to_string()))
    }
}
