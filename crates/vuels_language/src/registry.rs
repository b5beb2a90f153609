//! Language registry: the documents of a workspace and their virtual code.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use lsp_types::Url;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::VirtualCode;

/// Virtual code produced for a source script by a [`LanguagePlugin`].
///
/// The root is what the scripting engine sees; implementations carry their
/// own domain metadata, recovered with [`SourceScript::generated_as`].
pub trait GeneratedCode: Send + Sync + fmt::Debug {
    /// The root virtual code.
    fn root(&self) -> &VirtualCode;

    /// Type-erased access for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Produces virtual code for the source scripts it understands.
pub trait LanguagePlugin: Send + Sync {
    /// Language id this plugin claims for a URI, if any.
    fn language_id(&self, _uri: &Url) -> Option<String> {
        None
    }

    /// Creates virtual code, or `None` if the script is not handled.
    fn create_virtual_code(
        &self,
        uri: &Url,
        language_id: &str,
        snapshot: &Arc<str>,
    ) -> Option<Arc<dyn GeneratedCode>>;
}

/// A document registered with the language registry.
#[derive(Debug, Clone)]
pub struct SourceScript {
    pub id: Url,
    pub language_id: String,
    pub snapshot: Arc<str>,
    pub generated: Option<Arc<dyn GeneratedCode>>,
}

impl SourceScript {
    /// Downcasts the generated code to a concrete type.
    pub fn generated_as<T: 'static>(&self) -> Option<&T> {
        self.generated.as_deref()?.as_any().downcast_ref::<T>()
    }
}

/// Scripting-engine sub-interface of the registry.
///
/// Present only when the scripting engine is active for the workspace.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptSupport {
    /// The project configuration file, if one was found.
    pub config_file_name: Option<PathBuf>,
    /// Extra file extensions the engine should treat as scripts (e.g. `vue`).
    pub extensions: Vec<String>,
}

/// The set of documents and their resolved languages for one workspace.
pub struct LanguageRegistry {
    scripts: RwLock<HashMap<Url, SourceScript>>,
    plugins: Vec<Arc<dyn LanguagePlugin>>,
    typescript: Option<TypeScriptSupport>,
}

impl LanguageRegistry {
    /// Creates a registry without scripting-engine support.
    pub fn new(plugins: Vec<Arc<dyn LanguagePlugin>>) -> Self {
        Self {
            scripts: RwLock::new(HashMap::new()),
            plugins,
            typescript: None,
        }
    }

    /// Enables the scripting-engine sub-interface.
    pub fn with_typescript(mut self, support: TypeScriptSupport) -> Self {
        self.typescript = Some(support);
        self
    }

    /// The scripting-engine sub-interface, when active.
    pub fn typescript(&self) -> Option<&TypeScriptSupport> {
        self.typescript.as_ref()
    }

    /// Looks up a script by its document identifier.
    pub fn get(&self, id: &Url) -> Option<SourceScript> {
        self.scripts.read().get(id).cloned()
    }

    /// Registers or updates a script, regenerating its virtual code.
    pub fn set(&self, id: Url, language_id: &str, snapshot: impl Into<Arc<str>>) -> SourceScript {
        let snapshot = snapshot.into();
        let language_id = self
            .plugins
            .iter()
            .find_map(|p| p.language_id(&id))
            .unwrap_or_else(|| language_id.to_string());
        let generated = self
            .plugins
            .iter()
            .find_map(|p| p.create_virtual_code(&id, &language_id, &snapshot));

        trace!(
            "Registered {} as {} (virtual code: {})",
            id,
            language_id,
            generated.is_some()
        );

        let script = SourceScript {
            id: id.clone(),
            language_id,
            snapshot,
            generated,
        };
        self.scripts.write().insert(id, script.clone());
        script
    }

    /// Inserts a script whose virtual code was produced elsewhere.
    pub fn insert(&self, script: SourceScript) {
        self.scripts.write().insert(script.id.clone(), script);
    }

    /// Removes a script. Returns `true` if it was registered.
    pub fn delete(&self, id: &Url) -> bool {
        let removed = self.scripts.write().remove(id).is_some();
        if removed {
            debug!("Removed script {}", id);
        }
        removed
    }

    /// Number of registered scripts.
    pub fn len(&self) -> usize {
        self.scripts.read().len()
    }

    /// Returns `true` when no script is registered.
    pub fn is_empty(&self) -> bool {
        self.scripts.read().is_empty()
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("scripts", &self.scripts.read().len())
            .field("plugins", &self.plugins.len())
            .field("typescript", &self.typescript)
            .finish()
    }
}
