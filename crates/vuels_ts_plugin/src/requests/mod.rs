//! Component-semantic request handlers.
//!
//! Every handler is a plain function over a [`RequestContext`] and its
//! arguments. Positions are byte offsets into the component source. A
//! construct that does not resolve yields `Ok(None)`; only a file name the
//! document-identifier mapper rejects is an error.

mod collect_extract_props;
mod component_info;
mod properties;
mod quick_info;
mod template_context;

use serde::{Deserialize, Serialize};

pub use collect_extract_props::collect_extract_props;
pub use component_info::{
    get_component_events, get_component_names, get_component_props, get_element_attrs,
};
pub use properties::get_properties_at_location;
pub use quick_info::get_quick_info_at_position;
pub use template_context::get_template_context_props;

/// A template expression that can be extracted into a prop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPropCandidate {
    pub name: String,
    pub type_text: String,
    /// The expression is written to, so the prop needs `v-model`.
    pub model: bool,
}

/// A prop declared by a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProp {
    pub name: String,
    pub required: bool,
    pub documentation: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use vuels_core::{VueCompilerOptions, VueLanguagePlugin};
    use vuels_language::lsp_types::Url;
    use vuels_language::{LanguageRegistry, TypeScriptEnvironment, TypeScriptSupport};
    use vuels_typescript::SharedLanguageService;
    use vuels_typescript::test_utils::{FakeEngine, FakeLanguageService};

    use crate::RequestContext;

    pub const APP: &str = "/work/App.vue";

    pub const APP_SOURCE: &str = r#"<script setup lang="ts">
import MyButton from './MyButton.vue'
const count = ref(0)
</script>

<template>
  <my-button @click="count++">{{ count }}</my-button>
  <input>
</template>
"#;

    pub fn registry() -> Arc<LanguageRegistry> {
        let registry = LanguageRegistry::new(vec![Arc::new(VueLanguagePlugin::default())])
            .with_typescript(TypeScriptSupport::default());
        registry.set(Url::from_file_path(APP).unwrap(), "vue", APP_SOURCE);
        Arc::new(registry)
    }

    pub fn context(fake: FakeLanguageService, is_ts_plugin: bool) -> RequestContext {
        context_with(registry(), fake, is_ts_plugin)
    }

    pub fn context_with(
        language: Arc<LanguageRegistry>,
        fake: FakeLanguageService,
        is_ts_plugin: bool,
    ) -> RequestContext {
        let engine = Arc::new(FakeEngine::new(FakeLanguageService::new()));
        RequestContext {
            typescript: engine,
            language,
            language_service: Some(SharedLanguageService::new(Arc::new(fake))),
            vue_options: VueCompilerOptions::default(),
            is_ts_plugin,
            get_file_id: TypeScriptEnvironment::file_urls().file_name_to_uri,
        }
    }

    /// Source offset of the first occurrence of `needle`, plus `delta`.
    pub fn offset_of(needle: &str, delta: u32) -> u32 {
        APP_SOURCE.find(needle).unwrap() as u32 + delta
    }

    /// Generated offset of a source offset in the registered App.vue.
    pub fn generated_of(language: &LanguageRegistry, source: u32) -> u32 {
        let script = language.get(&Url::from_file_path(APP).unwrap()).unwrap();
        script
            .generated
            .unwrap()
            .root()
            .to_generated_offsets(source)
            .next()
            .unwrap()
            .0
    }
}
