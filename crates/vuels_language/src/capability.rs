//! Typed capability registry.
//!
//! Plugin instances publish values to each other through a [`CapabilityMap`].
//! Every value is declared by a [`Capability`] marker type that fixes both the
//! string key and the value type, so retrieval is checked against the declared
//! kind instead of being asserted at the call site.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Declares a capability: its key and the type of value published under it.
pub trait Capability: 'static {
    /// String identifier, e.g. `"typescript/languageService"`.
    const KEY: &'static str;

    /// The published value.
    type Value: Clone + Send + Sync + 'static;
}

/// The set of capabilities a plugin instance provides.
#[derive(Clone, Default)]
pub struct CapabilityMap {
    entries: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl CapabilityMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<C: Capability>(mut self, value: C::Value) -> Self {
        self.insert::<C>(value);
        self
    }

    /// Publishes a value, replacing any previous value under the same key.
    pub fn insert<C: Capability>(&mut self, value: C::Value) {
        self.entries.insert(C::KEY, Arc::new(value));
    }

    /// Retrieves a value if it was published with the declared type.
    pub fn get<C: Capability>(&self) -> Option<C::Value> {
        self.entries
            .get(C::KEY)?
            .downcast_ref::<C::Value>()
            .cloned()
    }

    /// Returns `true` if anything is published under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns `true` if nothing is published.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Published keys, unordered.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

impl fmt::Debug for CapabilityMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("CapabilityMap").field("keys", &keys).finish()
    }
}
