//! Initialize and shutdown handlers.

use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::info;
use vuels_core::{VueCompilerOptions, VueLanguagePlugin};
use vuels_language::{
    LanguageRegistry, ServiceContext, ServiceEnvironment, TypeScriptEnvironment,
    TypeScriptSupport,
};
use vuels_service::{GetVueOptions, create_vue_service_plugins};

use crate::ServerOptions;
use crate::session::Session;
use crate::state::BackendState;

/// Characters that re-trigger completion in templates and scripts.
const TRIGGER_CHARACTERS: &[&str] = &["<", ":", "@", ".", "#", "\"", "'", "/", "!", ">", "*", "+"];

/// Handles the `initialize` LSP request.
///
/// Builds the language service session for the workspace.
pub async fn handle_initialize(
    state: &BackendState,
    options: &ServerOptions,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("Vue language server initializing...");

    let folders: Vec<Url> = match params.workspace_folders {
        Some(folders) if !folders.is_empty() => folders.into_iter().map(|f| f.uri).collect(),
        #[allow(deprecated)]
        _ => params.root_uri.into_iter().collect(),
    };
    let mut env =
        ServiceEnvironment::new(folders).with_typescript(TypeScriptEnvironment::file_urls());
    env.locale = params.locale;

    let session = build_session(state, options, env);
    *state.session.write() = Some(Arc::new(session));

    Ok(InitializeResult {
        capabilities: server_capabilities(),
        server_info: Some(ServerInfo {
            name: "vuels".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Builds the language service session of a workspace.
///
/// Options are read through the cache, so a session built after
/// [`OptionsCache::invalidate`](crate::OptionsCache::invalidate) sees the
/// current project configuration.
pub(crate) fn build_session(
    state: &BackendState,
    options: &ServerOptions,
    env: ServiceEnvironment,
) -> Session {
    let vue_options = state.options.get(&env);
    let config_file_name = env
        .workspace_root()
        .and_then(|root| VueCompilerOptions::discover(&root));
    if let Some(path) = &config_file_name {
        info!("Found project configuration: {}", path.display());
    }
    let registry = LanguageRegistry::new(vec![Arc::new(VueLanguagePlugin::new(vue_options))])
        .with_typescript(TypeScriptSupport {
            config_file_name,
            extensions: vec!["vue".to_string()],
        });

    let cache = state.options.clone();
    let get_vue_options: GetVueOptions = Arc::new(move |env: &ServiceEnvironment| cache.get(env));
    let plugins = create_vue_service_plugins(
        options.engine.clone(),
        get_vue_options,
        options.ts_plugin_client.clone(),
        options.hybrid_mode,
    );
    Session::new(ServiceContext::new(env, Arc::new(registry)), plugins)
}

fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::FULL),
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(false),
                })),
                ..Default::default()
            },
        )),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(TRIGGER_CHARACTERS.iter().map(|c| c.to_string()).collect()),
            ..Default::default()
        }),
        code_action_provider: Some(CodeActionProviderCapability::Options(CodeActionOptions {
            code_action_kinds: Some(vec![
                CodeActionKind::QUICKFIX,
                CodeActionKind::REFACTOR_EXTRACT,
                CodeActionKind::REFACTOR_REWRITE,
            ]),
            resolve_provider: Some(false),
            work_done_progress_options: Default::default(),
        })),
        code_lens_provider: Some(CodeLensOptions {
            resolve_provider: Some(false),
        }),
        inlay_hint_provider: Some(OneOf::Left(true)),
        document_symbol_provider: Some(OneOf::Left(true)),
        folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        definition_provider: Some(OneOf::Left(true)),
        references_provider: Some(OneOf::Left(true)),
        experimental: Some(serde_json::json!({
            "autoInsert": true,
            "documentDrop": true,
        })),
        ..Default::default()
    }
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(client: &tower_lsp::Client, state: &BackendState) {
    let plugins = state
        .session()
        .map(|session| session.plugin_names().len())
        .unwrap_or_default();
    client
        .log_message(
            MessageType::INFO,
            format!("Vue language server initialized with {plugins} plugins"),
        )
        .await;
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown() -> Result<()> {
    info!("Vue language server shutting down...");
    Ok(())
}
