//! Composition of the full plugin list.

use std::sync::Arc;

use tracing::debug;
use vuels_core::VueCompilerOptions;
use vuels_language::{
    LanguageServicePlugin, ServiceContext, ServiceEnvironment, TypeScriptEnvironment,
};
use vuels_ts_plugin::decorate_language_service_for_vue;
use vuels_typescript::plugins::{doc_comment, semantic, syntactic, twoslash};
use vuels_typescript::{ScriptEngine, TypeScriptLanguageService, create_typescript_plugins};

use crate::client::{GetTsPluginClient, create_default_get_ts_plugin_client};
use crate::plugins::vue_template::TemplateLanguage;
use crate::plugins::{
    css, emmet, json, pug_beautify, vue_autoinsert_dotvalue, vue_autoinsert_parentheses,
    vue_autoinsert_space, vue_codelens_references, vue_directive_comments, vue_document_drop,
    vue_extract_file, vue_hidden_callback_param, vue_sfc, vue_template, vue_toggle_v_bind,
    vue_twoslash_queries,
};

/// Resolves the component compiler options of an environment.
pub type GetVueOptions = Arc<dyn Fn(&ServiceEnvironment) -> VueCompilerOptions + Send + Sync>;

/// Assembles the ordered plugin list of the Vue language service.
///
/// Outside hybrid mode the full scripting bundle is installed and its
/// semantic plugin is replaced in place by one that extends the published
/// language service for component files. In hybrid mode semantic analysis
/// lives in the engine's host process, so only the syntactic and
/// doc-comment plugins are installed locally.
///
/// `get_ts_plugin_client` defaults to the in-process bridge.
pub fn create_vue_service_plugins(
    typescript: Arc<dyn ScriptEngine>,
    get_vue_options: GetVueOptions,
    get_ts_plugin_client: Option<GetTsPluginClient>,
    hybrid_mode: bool,
) -> Vec<LanguageServicePlugin> {
    let get_ts_plugin_client = get_ts_plugin_client.unwrap_or_else(|| {
        create_default_get_ts_plugin_client(typescript.clone(), get_vue_options.clone())
    });

    let mut plugins = if hybrid_mode {
        vec![syntactic::create(), doc_comment::create()]
    } else {
        let mut bundle = create_typescript_plugins(typescript.clone());
        if let Some(plugin) = bundle.iter_mut().find(|p| p.name() == semantic::NAME) {
            *plugin =
                decorate_semantic(plugin.clone(), typescript.clone(), get_vue_options.clone());
        }
        bundle
    };

    plugins.extend([
        twoslash::create(),
        css::create(),
        pug_beautify::create(),
        json::create(),
        vue_template::create(
            TemplateLanguage::Html,
            get_vue_options.clone(),
            get_ts_plugin_client.clone(),
        ),
        vue_template::create(
            TemplateLanguage::Pug,
            get_vue_options.clone(),
            get_ts_plugin_client.clone(),
        ),
        vue_sfc::create(),
        vue_twoslash_queries::create(get_ts_plugin_client.clone()),
        vue_codelens_references::create(),
        vue_document_drop::create(),
        vue_autoinsert_dotvalue::create(get_ts_plugin_client.clone()),
        vue_autoinsert_parentheses::create(),
        vue_autoinsert_space::create(),
        vue_hidden_callback_param::create(),
        vue_directive_comments::create(),
        vue_extract_file::create(get_ts_plugin_client),
        vue_toggle_v_bind::create(),
        emmet::create(),
    ]);

    debug!(
        "Composed {} plugins (hybrid mode: {})",
        plugins.len(),
        hybrid_mode
    );
    plugins
}

/// Wraps the semantic plugin so the instance it creates publishes a
/// component-aware language service.
fn decorate_semantic(
    plugin: LanguageServicePlugin,
    typescript: Arc<dyn ScriptEngine>,
    get_vue_options: GetVueOptions,
) -> LanguageServicePlugin {
    plugin.wrap(move |context: &ServiceContext, original| {
        let created = original(context);
        if context.language().typescript().is_none() {
            return created;
        }
        let Some(language_service) = created.provide().get::<TypeScriptLanguageService>() else {
            return created;
        };
        let vue_options = get_vue_options(context.env());
        let get_file_id = context
            .env()
            .typescript
            .clone()
            .unwrap_or_else(TypeScriptEnvironment::file_urls)
            .file_name_to_uri;
        decorate_language_service_for_vue(
            context.language(),
            &language_service,
            &vue_options,
            &typescript,
            false,
            &get_file_id,
        );
        created
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{
        APP, APP_SOURCE, app_document, engine, session, session_without_typescript, vue_options,
    };
    use pretty_assertions::assert_eq;
    use vuels_language::lsp_types::{HoverContents, Position};
    use vuels_ts_plugin::DECORATION_TAG;
    use vuels_typescript::test_utils::{FakeEngine, FakeLanguageService};
    use vuels_typescript::{QuickInfo, ResolvedType, TextSpan};

    fn names(plugins: &[LanguageServicePlugin]) -> Vec<&str> {
        plugins.iter().map(|p| p.name()).collect()
    }

    const AUXILIARY: &[&str] = &[
        "typescript-twoslash-queries",
        "css",
        "pug-beautify",
        "json",
        "vue-template-html",
        "vue-template-pug",
        "vue-sfc",
        "vue-twoslash-queries",
        "vue-codelens-references",
        "vue-document-drop",
        "vue-autoinsert-dotvalue",
        "vue-autoinsert-parentheses",
        "vue-autoinsert-space",
        "vue-inlay-hints-hidden-callback-param",
        "vue-directive-comments",
        "vue-extract-file",
        "vue-toggle-v-bind-codeaction",
        "emmet",
    ];

    #[test]
    fn test_plugin_order() {
        let plugins = create_vue_service_plugins(
            engine(FakeLanguageService::new()),
            vue_options(),
            None,
            false,
        );
        let mut expected = vec![
            "typescript-semantic",
            "typescript-syntactic",
            "typescript-doc-comment-template",
            "typescript-directive-comment",
        ];
        expected.extend_from_slice(AUXILIARY);
        assert_eq!(names(&plugins), expected);
    }

    #[test]
    fn test_hybrid_mode_installs_reduced_scripting_pair() {
        let fake_engine = Arc::new(FakeEngine::new(FakeLanguageService::new()));
        let plugins = create_vue_service_plugins(fake_engine.clone(), vue_options(), None, true);

        let mut expected = vec!["typescript-syntactic", "typescript-doc-comment-template"];
        expected.extend_from_slice(AUXILIARY);
        assert_eq!(names(&plugins), expected);

        let context = session();
        for plugin in &plugins {
            context.register_provider(plugin.name(), plugin.create(&context).provide().clone());
        }
        assert_eq!(fake_engine.created(), 0);
        assert!(context.inject::<TypeScriptLanguageService>().is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let plugins = create_vue_service_plugins(
            engine(FakeLanguageService::new()),
            vue_options(),
            None,
            false,
        );
        let mut seen = names(&plugins);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), plugins.len());
    }

    #[tokio::test]
    async fn test_semantic_instance_is_decorated_in_place() {
        let fake = FakeLanguageService::new().with_type(
            APP,
            "__VLS_components.MyButton",
            ResolvedType {
                display: "typeof MyButton".to_string(),
                ..Default::default()
            },
        );
        let plugins = create_vue_service_plugins(engine(fake), vue_options(), None, false);
        let context = session();
        let instance = plugins[0].create(&context);

        let service = instance
            .provide()
            .get::<TypeScriptLanguageService>()
            .unwrap();
        assert!(service.is_decorated(DECORATION_TAG));

        let offset = APP_SOURCE.find("<my-button").unwrap() + 3;
        let document = app_document();
        let position = document.position_at(offset).unwrap();
        let hover = instance
            .features()
            .provide_hover(&document, position)
            .await
            .unwrap()
            .unwrap();
        let HoverContents::Markup(content) = hover.contents else {
            panic!("expected markup");
        };
        assert_eq!(content.value, "```typescript\nMyButton\n```\n\ntypeof MyButton");
    }

    #[test]
    fn test_recreated_instance_is_decorated_independently() {
        let plugins = create_vue_service_plugins(
            engine(FakeLanguageService::new()),
            vue_options(),
            None,
            false,
        );
        let context = session();
        let first = plugins[0].create(&context);
        let second = plugins[0].create(&context);

        let first = first.provide().get::<TypeScriptLanguageService>().unwrap();
        let second = second.provide().get::<TypeScriptLanguageService>().unwrap();
        assert!(!first.ptr_eq(&second));
        assert!(first.is_decorated(DECORATION_TAG));
        assert!(second.is_decorated(DECORATION_TAG));
    }

    #[tokio::test]
    async fn test_without_scripting_engine_instance_is_untouched() {
        let fake = FakeLanguageService::new().with_quick_info(
            APP,
            TextSpan::new(0, 200),
            QuickInfo {
                kind: "const".to_string(),
                display: "const count: number".to_string(),
                documentation: String::new(),
                span: TextSpan::new(0, 5),
            },
        );
        let fake_engine = engine(fake);
        let plugins = create_vue_service_plugins(fake_engine.clone(), vue_options(), None, false);
        let context = session_without_typescript();

        let composed = plugins[0].create(&context);
        let bare = semantic::create(fake_engine).create(&context);
        assert!(composed.provide().is_empty());

        let document = app_document();
        let position = Position::new(1, 8);
        let composed_hover = composed.features().provide_hover(&document, position).await.unwrap();
        let bare_hover = bare.features().provide_hover(&document, position).await.unwrap();
        assert_eq!(composed_hover, bare_hover);
    }
}
