//! Vue LSP Server
//!
//! Language Server Protocol host for the composed Vue language service.
//! Plugins are created lazily per workspace session; requests are answered
//! by the first plugin that responds, or by all plugins in order.

mod config;
mod conversion;
mod debounce;
mod handler;
mod session;
mod state;

use std::fmt;
use std::sync::Arc;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, ClientSocket, LanguageServer, LspService, Server};
use tracing::{debug, info};
use vuels_service::GetTsPluginClient;
use vuels_typescript::ScriptEngine;

pub use config::OptionsCache;
pub use conversion::{
    AutoInsertParams, AutoInsertResponse, DataTransferItem, DocumentDropParams,
    DocumentDropResponse, LastChange, language_id_for,
};
pub use debounce::DEFAULT_DEBOUNCE_MS;
pub use session::{AutoInsert, Session};

use crate::debounce::spawn_debounced_validation;
use crate::handler::*;
use crate::state::{BackendState, SharedState};

/// How the server composes its language service.
#[derive(Clone)]
pub struct ServerOptions {
    /// The scripting engine behind semantic features.
    pub engine: Arc<dyn ScriptEngine>,
    /// Semantic analysis is served by the engine's host process.
    pub hybrid_mode: bool,
    /// Overrides the in-process client bridge.
    pub ts_plugin_client: Option<GetTsPluginClient>,
}

impl ServerOptions {
    pub fn new(engine: Arc<dyn ScriptEngine>) -> Self {
        Self {
            engine,
            hybrid_mode: false,
            ts_plugin_client: None,
        }
    }

    /// Enables hybrid mode with a client bridge to the host process.
    pub fn hybrid(mut self, ts_plugin_client: GetTsPluginClient) -> Self {
        self.hybrid_mode = true;
        self.ts_plugin_client = Some(ts_plugin_client);
        self
    }
}

impl fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerOptions")
            .field("engine", &self.engine.name())
            .field("hybrid_mode", &self.hybrid_mode)
            .field("ts_plugin_client", &self.ts_plugin_client.is_some())
            .finish()
    }
}

/// The LSP backend for Vue.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
    options: ServerOptions,
}

impl Backend {
    /// Creates a new backend with the given client.
    pub fn new(client: Client, options: ServerOptions) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::new()),
            options,
        }
    }

    /// The session created on `initialize`.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.state.session()
    }

    /// Collects diagnostics for a document and publishes them.
    ///
    /// Nothing is published if the document changed in the meantime.
    async fn validate_document(&self, uri: Url, version: i32) {
        debug!("Validating document: {}", uri);

        let (Some(session), Some(document)) = (self.state.session(), self.state.document(&uri))
        else {
            return;
        };
        let diagnostics = session.diagnostics(&document).await;
        if self.state.is_current(&uri, version) {
            self.client
                .publish_diagnostics(uri, diagnostics, Some(version))
                .await;
        }
    }

    async fn auto_insert(&self, params: AutoInsertParams) -> Result<Option<AutoInsertResponse>> {
        handle_auto_insert(&self.state, params).await
    }

    async fn document_drop(
        &self,
        params: DocumentDropParams,
    ) -> Result<Option<DocumentDropResponse>> {
        handle_document_drop(&self.state, params).await
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handle_initialize(&self.state, &self.options, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handle_initialized(&self.client, &self.state).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, version) = handle_did_open(&self.state, params).await;
        self.validate_document(uri, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, version)) = handle_did_change(&self.state, params).await else {
            return;
        };
        let backend = self.clone();
        spawn_debounced_validation(self.state.clone(), uri, version, move |uri, version| {
            async move { backend.validate_document(uri, version).await }
        });
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        debug!("Document saved: {}", params.text_document.uri);

        let uri = params.text_document.uri;
        if let Some(document) = self.state.document(&uri) {
            self.validate_document(uri, document.version).await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let reopened = handle_did_change_watched_files(&self.state, &self.options, params).await;
        for (uri, version) in reopened {
            self.validate_document(uri, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handle_did_close(&self.state, params).await;
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        handle_hover(&self.state, params).await
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        handle_completion(&self.state, params).await
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handle_code_action(&self.state, params).await
    }

    async fn code_lens(&self, params: CodeLensParams) -> Result<Option<Vec<CodeLens>>> {
        handle_code_lens(&self.state, params).await
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        handle_inlay_hint(&self.state, params).await
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        handle_document_symbol(&self.state, params).await
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        handle_folding_range(&self.state, params).await
    }

    async fn formatting(&self, params: DocumentFormattingParams) -> Result<Option<Vec<TextEdit>>> {
        handle_formatting(&self.state, params).await
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        handle_definition(&self.state, params).await
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        handle_references(&self.state, params).await
    }
}

/// Builds the LSP service, including the `vue/*` custom requests.
pub fn build_service(options: ServerOptions) -> (LspService<Backend>, ClientSocket) {
    LspService::build(move |client| Backend::new(client, options.clone()))
        .custom_method("vue/autoInsert", Backend::auto_insert)
        .custom_method("vue/documentDrop", Backend::document_drop)
        .finish()
}

/// Starts the LSP server on stdio.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run(options: ServerOptions) {
    info!("Vue language server starting ({:?})...", options);

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = build_service(options);
    Server::new(stdin, stdout, socket).serve(service).await;
}
