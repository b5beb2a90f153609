//! Service environment handed to every plugin.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use lsp_types::Url;

use crate::{ServiceError, ServiceResult};

/// Maps a script file name to the stable document identifier (URI).
pub type FileIdMapper = Arc<dyn Fn(&str) -> ServiceResult<Url> + Send + Sync>;

/// Scripting-engine specific part of the environment.
#[derive(Clone)]
pub struct TypeScriptEnvironment {
    /// Maps an engine file name to its document URI.
    pub file_name_to_uri: FileIdMapper,
    /// Maps a document URI back to the engine file name.
    pub uri_to_file_name: Arc<dyn Fn(&Url) -> String + Send + Sync>,
}

impl TypeScriptEnvironment {
    /// Mappers for engines that address files by absolute filesystem path.
    pub fn file_urls() -> Self {
        Self {
            file_name_to_uri: Arc::new(|file_name: &str| {
                Url::from_file_path(file_name)
                    .map_err(|_| ServiceError::invalid_document(file_name))
            }),
            uri_to_file_name: Arc::new(|uri: &Url| match uri.to_file_path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(_) => uri.to_string(),
            }),
        }
    }
}

impl fmt::Debug for TypeScriptEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeScriptEnvironment")
            .field("file_name_to_uri", &"<fn>")
            .field("uri_to_file_name", &"<fn>")
            .finish()
    }
}

/// Per-workspace runtime handle owned by the hosting runtime.
#[derive(Debug, Clone, Default)]
pub struct ServiceEnvironment {
    /// Workspace folders, first one is the root.
    pub workspace_folders: Vec<Url>,
    /// Client locale, if reported.
    pub locale: Option<String>,
    /// Present when the scripting engine is configured for this workspace.
    pub typescript: Option<TypeScriptEnvironment>,
}

impl ServiceEnvironment {
    /// Creates an environment rooted at the given folder.
    pub fn new(workspace_folders: Vec<Url>) -> Self {
        Self {
            workspace_folders,
            locale: None,
            typescript: None,
        }
    }

    /// Attaches the scripting-engine mappers.
    pub fn with_typescript(mut self, typescript: TypeScriptEnvironment) -> Self {
        self.typescript = Some(typescript);
        self
    }

    /// Filesystem path of the first workspace folder.
    pub fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_folders
            .first()
            .and_then(|u| u.to_file_path().ok())
    }
}
