//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tower_lsp::lsp_types::Url;
use vuels_language::TextDocument;

use crate::config::OptionsCache;
use crate::session::Session;

/// Shared backend state.
pub(crate) struct BackendState {
    /// Open documents.
    pub documents: RwLock<HashMap<Url, TextDocument>>,
    /// Language ids the client reported for open documents.
    pub reported_languages: RwLock<HashMap<Url, String>>,
    /// The language service session, created on `initialize`.
    pub session: RwLock<Option<Arc<Session>>>,
    /// Resolved `vueCompilerOptions`, dropped when a config file changes.
    pub options: Arc<OptionsCache>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &self.documents.read().len())
            .field("session", &self.session.read().is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl BackendState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            reported_languages: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
            options: Arc::new(OptionsCache::default()),
        }
    }

    /// The current session, if the server is initialized.
    pub fn session(&self) -> Option<Arc<Session>> {
        self.session.read().clone()
    }

    /// A snapshot of an open document.
    pub fn document(&self, uri: &Url) -> Option<TextDocument> {
        self.documents.read().get(uri).cloned()
    }

    /// Returns `true` if `uri` is open at exactly `version`.
    pub fn is_current(&self, uri: &Url, version: i32) -> bool {
        self.documents
            .read()
            .get(uri)
            .is_some_and(|doc| doc.version == version)
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
