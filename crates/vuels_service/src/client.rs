//! Default factory of the embedded client bridge.

use std::sync::Arc;

use vuels_language::{ServiceContext, TypeScriptEnvironment};
use vuels_ts_plugin::{EmbeddedClient, RequestContext, TsPluginClient};
use vuels_typescript::{ScriptEngine, TypeScriptLanguageService};

use crate::GetVueOptions;

/// Produces the client bridge of a session, or `None` when there is nothing
/// to bridge to.
pub type GetTsPluginClient =
    Arc<dyn Fn(&ServiceContext) -> Option<Arc<dyn TsPluginClient>> + Send + Sync>;

/// Client factory answering component requests in-process.
///
/// Each invocation binds a fresh [`RequestContext`] to the session's current
/// language service. Returns `None` when the registry has no scripting
/// engine support.
pub fn create_default_get_ts_plugin_client(
    typescript: Arc<dyn ScriptEngine>,
    get_vue_options: GetVueOptions,
) -> GetTsPluginClient {
    Arc::new(move |context: &ServiceContext| {
        context.language().typescript()?;
        let request_context = RequestContext {
            typescript: typescript.clone(),
            language: context.language().clone(),
            language_service: context.inject::<TypeScriptLanguageService>(),
            vue_options: get_vue_options(context.env()),
            is_ts_plugin: false,
            get_file_id: context
                .env()
                .typescript
                .clone()
                .unwrap_or_else(TypeScriptEnvironment::file_urls)
                .file_name_to_uri,
        };
        Some(Arc::new(EmbeddedClient::new(request_context)) as Arc<dyn TsPluginClient>)
    })
}
