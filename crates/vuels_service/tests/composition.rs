//! End-to-end composition: instantiate every plugin the way a host does and
//! ask component questions through the default client bridge.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vuels_core::{COMPONENTS_BINDING, VueCompilerOptions, VueLanguagePlugin};
use vuels_language::lsp_types::Url;
use vuels_language::{
    LanguageRegistry, LanguageServicePlugin, ServiceContext, ServiceEnvironment,
    TypeScriptSupport,
};
use vuels_service::{
    GetVueOptions, create_default_get_ts_plugin_client, create_vue_service_plugins,
};
use vuels_ts_plugin::DECORATION_TAG;
use vuels_typescript::test_utils::{FakeEngine, FakeLanguageService};
use vuels_typescript::{ResolvedType, ScriptEngine, TypeMember, TypeScriptLanguageService};

const APP: &str = "/work/App.vue";
const PLAIN: &str = "/work/Plain.vue";

const APP_SOURCE: &str = r#"<script setup lang="ts">
import MyButton from './MyButton.vue'
</script>

<template>
  <my-button />
</template>
"#;

const PLAIN_SOURCE: &str = "<template>\n  <div>plain</div>\n</template>\n";

fn vue_options() -> GetVueOptions {
    Arc::new(|_env: &ServiceEnvironment| VueCompilerOptions::default())
}

fn engine() -> Arc<dyn ScriptEngine> {
    let fake = FakeLanguageService::new().with_type(
        APP,
        COMPONENTS_BINDING,
        ResolvedType {
            members: vec![
                TypeMember::new("MyButton", "typeof MyButton"),
                TypeMember::new("__VLS_internal", "unknown"),
                TypeMember::new("MyButton", "typeof MyButton"),
            ],
            ..Default::default()
        },
    );
    Arc::new(FakeEngine::new(fake))
}

fn context(typescript: bool) -> ServiceContext {
    let mut registry = LanguageRegistry::new(vec![Arc::new(VueLanguagePlugin::default())]);
    if typescript {
        registry = registry.with_typescript(TypeScriptSupport::default());
    }
    registry.set(Url::from_file_path(APP).unwrap(), "vue", APP_SOURCE);
    registry.set(Url::from_file_path(PLAIN).unwrap(), "vue", PLAIN_SOURCE);
    ServiceContext::new(ServiceEnvironment::default(), Arc::new(registry))
}

fn instantiate(plugins: &[LanguageServicePlugin], context: &ServiceContext) {
    for plugin in plugins {
        let instance = plugin.create(context);
        context.register_provider(plugin.name(), instance.provide().clone());
    }
}

#[tokio::test]
async fn test_embedded_session_answers_component_names() {
    let engine = engine();
    let plugins = create_vue_service_plugins(engine.clone(), vue_options(), None, false);
    let context = context(true);
    instantiate(&plugins, &context);

    let service = context.inject::<TypeScriptLanguageService>().unwrap();
    assert!(service.is_decorated(DECORATION_TAG));

    let client = create_default_get_ts_plugin_client(engine, vue_options())(&context).unwrap();
    assert_eq!(
        client.get_component_names(APP).await.unwrap(),
        Some(vec!["MyButton".to_string()])
    );
    assert_eq!(client.get_component_names(PLAIN).await.unwrap(), Some(Vec::new()));
}

#[test]
fn test_providers_follow_plugin_order() {
    let plugins = create_vue_service_plugins(engine(), vue_options(), None, false);
    let context = context(true);

    let mut publishing = Vec::new();
    for plugin in &plugins {
        let instance = plugin.create(&context);
        if !instance.provide().is_empty() {
            publishing.push(plugin.name().to_string());
        }
        context.register_provider(plugin.name(), instance.provide().clone());
    }

    assert_eq!(publishing.first().map(String::as_str), Some("typescript-semantic"));
    assert_eq!(context.providers(), publishing);
}

#[test]
fn test_without_scripting_support_nothing_is_bridged_or_decorated() {
    let engine = engine();
    let plugins = create_vue_service_plugins(engine.clone(), vue_options(), None, false);
    let context = context(false);
    instantiate(&plugins, &context);

    if let Some(service) = context.inject::<TypeScriptLanguageService>() {
        assert!(!service.is_decorated(DECORATION_TAG));
    }
    assert!(create_default_get_ts_plugin_client(engine, vue_options())(&context).is_none());
}

#[test]
fn test_hybrid_session_publishes_no_semantic_service() {
    let plugins = create_vue_service_plugins(engine(), vue_options(), None, true);
    let context = context(true);
    instantiate(&plugins, &context);

    assert!(context.inject::<TypeScriptLanguageService>().is_none());
    assert!(!plugins.iter().any(|p| p.name() == "typescript-semantic"));
}
