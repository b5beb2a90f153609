//! Service context shared by all plugin instances of a session.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Capability, CapabilityMap, LanguageRegistry, ServiceEnvironment};

struct ContextInner {
    env: ServiceEnvironment,
    language: Arc<LanguageRegistry>,
    providers: RwLock<Vec<(String, CapabilityMap)>>,
}

/// Environment, registry, and the capabilities published so far.
///
/// Cloning is cheap; all clones observe the same providers.
#[derive(Clone)]
pub struct ServiceContext {
    inner: Arc<ContextInner>,
}

impl ServiceContext {
    /// Creates a context with no providers registered.
    pub fn new(env: ServiceEnvironment, language: Arc<LanguageRegistry>) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                env,
                language,
                providers: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The workspace environment.
    pub fn env(&self) -> &ServiceEnvironment {
        &self.inner.env
    }

    /// The language registry.
    pub fn language(&self) -> &Arc<LanguageRegistry> {
        &self.inner.language
    }

    /// Registers the capability map of a freshly created plugin instance.
    ///
    /// Called by the hosting runtime, in plugin order.
    pub fn register_provider(&self, plugin: impl Into<String>, provide: CapabilityMap) {
        if provide.is_empty() {
            return;
        }
        self.inner.providers.write().push((plugin.into(), provide));
    }

    /// Retrieves the first published value for a capability.
    pub fn inject<C: Capability>(&self) -> Option<C::Value> {
        self.inner
            .providers
            .read()
            .iter()
            .find_map(|(_, provide)| provide.get::<C>())
    }

    /// Names of the plugins that published capabilities, in registration order.
    pub fn providers(&self) -> Vec<String> {
        self.inner
            .providers
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("env", &self.inner.env)
            .field("language", &self.inner.language)
            .field("providers", &self.providers())
            .finish()
    }
}
