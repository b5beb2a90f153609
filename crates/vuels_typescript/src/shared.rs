//! Decoratable handle to the live language service.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::trace;
use vuels_language::Capability;

use crate::service::{
    CompletionInfo, DefinitionInfo, PropertyAccess, QuickInfo, ReferenceEntry, ResolvedType,
    ScriptDiagnostic, ScriptLanguageService, TypeSegment,
};

/// Capability under which the semantic plugin publishes its language service.
pub struct TypeScriptLanguageService;

impl Capability for TypeScriptLanguageService {
    const KEY: &'static str = "typescript/languageService";
    type Value = SharedLanguageService;
}

struct Slot {
    current: RwLock<Arc<dyn ScriptLanguageService>>,
    decorations: Mutex<Vec<&'static str>>,
}

/// A cloneable handle to one language service slot.
///
/// Every clone sees the same slot. Decorating swaps what the slot holds, so
/// holders of the handle observe the extended behaviour while the handle
/// itself stays the same.
#[derive(Clone)]
pub struct SharedLanguageService {
    slot: Arc<Slot>,
}

impl SharedLanguageService {
    pub fn new(service: Arc<dyn ScriptLanguageService>) -> Self {
        Self {
            slot: Arc::new(Slot {
                current: RwLock::new(service),
                decorations: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The service currently held by the slot.
    pub fn current(&self) -> Arc<dyn ScriptLanguageService> {
        self.slot.current.read().clone()
    }

    /// Replaces the held service with `decorate(current)`.
    ///
    /// Runs at most once per `tag` for a slot. Returns `false` when the slot
    /// was already decorated with `tag`.
    pub fn decorate<F>(&self, tag: &'static str, decorate: F) -> bool
    where
        F: FnOnce(Arc<dyn ScriptLanguageService>) -> Arc<dyn ScriptLanguageService>,
    {
        let mut decorations = self.slot.decorations.lock();
        if decorations.contains(&tag) {
            return false;
        }
        let decorated = decorate(self.current());
        *self.slot.current.write() = decorated;
        decorations.push(tag);
        trace!("Decorated language service with '{}'", tag);
        true
    }

    /// Returns `true` if the slot was decorated with `tag`.
    pub fn is_decorated(&self, tag: &str) -> bool {
        self.slot.decorations.lock().iter().any(|t| *t == tag)
    }

    /// Returns `true` if both handles refer to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for SharedLanguageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedLanguageService")
            .field("decorations", &*self.slot.decorations.lock())
            .finish_non_exhaustive()
    }
}

impl ScriptLanguageService for SharedLanguageService {
    fn quick_info_at_position(&self, file_name: &str, position: u32) -> Option<QuickInfo> {
        self.current().quick_info_at_position(file_name, position)
    }

    fn completions_at_position(&self, file_name: &str, position: u32) -> Option<CompletionInfo> {
        self.current().completions_at_position(file_name, position)
    }

    fn definition_at_position(&self, file_name: &str, position: u32) -> Vec<DefinitionInfo> {
        self.current().definition_at_position(file_name, position)
    }

    fn references(&self, file_name: &str, position: u32) -> Vec<ReferenceEntry> {
        self.current().references(file_name, position)
    }

    fn semantic_diagnostics(&self, file_name: &str) -> Vec<ScriptDiagnostic> {
        self.current().semantic_diagnostics(file_name)
    }

    fn properties_at_position(&self, file_name: &str, position: u32) -> Vec<String> {
        self.current().properties_at_position(file_name, position)
    }

    fn type_at(
        &self,
        file_name: &str,
        root: &str,
        path: &[TypeSegment<'_>],
    ) -> Option<ResolvedType> {
        self.current().type_at(file_name, root, path)
    }

    fn property_accesses(
        &self,
        file_name: &str,
        object: &str,
        start: u32,
        end: u32,
    ) -> Vec<PropertyAccess> {
        self.current().property_accesses(file_name, object, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{QuickInfo, TextSpan};
    use crate::test_utils::FakeLanguageService;

    struct Prefixed(Arc<dyn ScriptLanguageService>);

    impl ScriptLanguageService for Prefixed {
        fn quick_info_at_position(&self, file_name: &str, position: u32) -> Option<QuickInfo> {
            let mut info = self.0.quick_info_at_position(file_name, position)?;
            info.display = format!("decorated {}", info.display);
            Some(info)
        }
        fn completions_at_position(&self, f: &str, p: u32) -> Option<CompletionInfo> {
            self.0.completions_at_position(f, p)
        }
        fn definition_at_position(&self, f: &str, p: u32) -> Vec<DefinitionInfo> {
            self.0.definition_at_position(f, p)
        }
        fn references(&self, f: &str, p: u32) -> Vec<ReferenceEntry> {
            self.0.references(f, p)
        }
        fn semantic_diagnostics(&self, f: &str) -> Vec<ScriptDiagnostic> {
            self.0.semantic_diagnostics(f)
        }
        fn properties_at_position(&self, f: &str, p: u32) -> Vec<String> {
            self.0.properties_at_position(f, p)
        }
        fn type_at(&self, f: &str, r: &str, path: &[TypeSegment<'_>]) -> Option<ResolvedType> {
            self.0.type_at(f, r, path)
        }
        fn property_accesses(&self, f: &str, o: &str, s: u32, e: u32) -> Vec<PropertyAccess> {
            self.0.property_accesses(f, o, s, e)
        }
    }

    fn shared() -> SharedLanguageService {
        let fake = FakeLanguageService::new().with_quick_info(
            "/a.ts",
            TextSpan::new(0, 3),
            QuickInfo {
                kind: "const".to_string(),
                display: "const foo: number".to_string(),
                documentation: String::new(),
                span: TextSpan::new(0, 3),
            },
        );
        SharedLanguageService::new(Arc::new(fake))
    }

    #[test]
    fn test_decorate_extends_behaviour_of_every_clone() {
        let service = shared();
        let held_elsewhere = service.clone();

        assert!(service.decorate("prefix", |inner| Arc::new(Prefixed(inner))));

        let info = held_elsewhere.quick_info_at_position("/a.ts", 1).unwrap();
        assert_eq!(info.display, "decorated const foo: number");
        assert!(held_elsewhere.ptr_eq(&service));
        assert!(held_elsewhere.is_decorated("prefix"));
    }

    #[test]
    fn test_decorate_runs_once_per_tag() {
        let service = shared();
        assert!(service.decorate("prefix", |inner| Arc::new(Prefixed(inner))));
        assert!(!service.decorate("prefix", |inner| Arc::new(Prefixed(inner))));

        let info = service.quick_info_at_position("/a.ts", 0).unwrap();
        assert_eq!(info.display, "decorated const foo: number");
    }

    #[test]
    fn test_separate_slots_are_independent() {
        let a = shared();
        let b = shared();
        a.decorate("prefix", |inner| Arc::new(Prefixed(inner)));
        assert!(!a.ptr_eq(&b));
        assert!(!b.is_decorated("prefix"));
        assert_eq!(
            b.quick_info_at_position("/a.ts", 0).unwrap().display,
            "const foo: number"
        );
    }
}
