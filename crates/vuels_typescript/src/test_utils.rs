//! In-memory scripting engine for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vuels_language::{LanguageRegistry, ServiceEnvironment, ServiceResult};

use crate::service::{
    CompletionEntry, CompletionInfo, DefinitionInfo, PropertyAccess, QuickInfo, ReferenceEntry,
    ResolvedType, ScriptDiagnostic, ScriptEngine, ScriptLanguageService, TextSpan, TypeSegment,
};

/// Key used to register types: the root followed by each segment.
///
/// `__VLS_components`, `[Property("Foo"), Instance, Property("$props")]`
/// becomes `__VLS_components.Foo#instance.$props`.
pub fn type_path(root: &str, path: &[TypeSegment<'_>]) -> String {
    let mut key = root.to_string();
    for segment in path {
        match segment {
            TypeSegment::Property(name) => {
                key.push('.');
                key.push_str(name);
            }
            TypeSegment::Parameter(index) => key.push_str(&format!("#param{index}")),
            TypeSegment::ReturnType => key.push_str("#return"),
            TypeSegment::Instance => key.push_str("#instance"),
        }
    }
    key
}

/// A language service answering from tables filled by the test.
#[derive(Debug, Default)]
pub struct FakeLanguageService {
    quick_infos: Vec<(String, TextSpan, QuickInfo)>,
    completions: HashMap<String, Vec<CompletionEntry>>,
    definitions: Vec<(String, TextSpan, DefinitionInfo)>,
    references: Vec<(String, TextSpan, ReferenceEntry)>,
    diagnostics: HashMap<String, Vec<ScriptDiagnostic>>,
    properties: Vec<(String, TextSpan, Vec<String>)>,
    types: HashMap<(String, String), ResolvedType>,
    accesses: HashMap<(String, String), Vec<(u32, PropertyAccess)>>,
    calls: AtomicUsize,
}

impl FakeLanguageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quick_info(mut self, file_name: &str, at: TextSpan, info: QuickInfo) -> Self {
        self.quick_infos.push((file_name.to_string(), at, info));
        self
    }

    pub fn with_completions(mut self, file_name: &str, entries: Vec<CompletionEntry>) -> Self {
        self.completions.insert(file_name.to_string(), entries);
        self
    }

    pub fn with_definition(mut self, file_name: &str, at: TextSpan, info: DefinitionInfo) -> Self {
        self.definitions.push((file_name.to_string(), at, info));
        self
    }

    pub fn with_reference(mut self, file_name: &str, at: TextSpan, entry: ReferenceEntry) -> Self {
        self.references.push((file_name.to_string(), at, entry));
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: ScriptDiagnostic) -> Self {
        self.diagnostics
            .entry(diagnostic.file_name.clone())
            .or_default()
            .push(diagnostic);
        self
    }

    pub fn with_properties(mut self, file_name: &str, at: TextSpan, names: &[&str]) -> Self {
        let names = names.iter().map(|n| n.to_string()).collect();
        self.properties.push((file_name.to_string(), at, names));
        self
    }

    /// Registers the type reached by a member path; see [`type_path`].
    pub fn with_type(mut self, file_name: &str, path: &str, ty: ResolvedType) -> Self {
        self.types.insert((file_name.to_string(), path.to_string()), ty);
        self
    }

    pub fn with_access(
        mut self,
        file_name: &str,
        object: &str,
        offset: u32,
        access: PropertyAccess,
    ) -> Self {
        self.accesses
            .entry((file_name.to_string(), object.to_string()))
            .or_default()
            .push((offset, access));
        self
    }

    /// Number of requests answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn at<'a, T>(
    table: &'a [(String, TextSpan, T)],
    file_name: &'a str,
    position: u32,
) -> impl Iterator<Item = &'a T> {
    table
        .iter()
        .filter(move |(f, span, _)| f == file_name && span.contains(position))
        .map(|(_, _, value)| value)
}

impl ScriptLanguageService for FakeLanguageService {
    fn quick_info_at_position(&self, file_name: &str, position: u32) -> Option<QuickInfo> {
        self.hit();
        at(&self.quick_infos, file_name, position).next().cloned()
    }

    fn completions_at_position(&self, file_name: &str, _position: u32) -> Option<CompletionInfo> {
        self.hit();
        self.completions.get(file_name).map(|entries| CompletionInfo {
            entries: entries.clone(),
            is_incomplete: false,
        })
    }

    fn definition_at_position(&self, file_name: &str, position: u32) -> Vec<DefinitionInfo> {
        self.hit();
        at(&self.definitions, file_name, position).cloned().collect()
    }

    fn references(&self, file_name: &str, position: u32) -> Vec<ReferenceEntry> {
        self.hit();
        at(&self.references, file_name, position).cloned().collect()
    }

    fn semantic_diagnostics(&self, file_name: &str) -> Vec<ScriptDiagnostic> {
        self.hit();
        self.diagnostics.get(file_name).cloned().unwrap_or_default()
    }

    fn properties_at_position(&self, file_name: &str, position: u32) -> Vec<String> {
        self.hit();
        at(&self.properties, file_name, position)
            .next()
            .cloned()
            .unwrap_or_default()
    }

    fn type_at(
        &self,
        file_name: &str,
        root: &str,
        path: &[TypeSegment<'_>],
    ) -> Option<ResolvedType> {
        self.hit();
        self.types
            .get(&(file_name.to_string(), type_path(root, path)))
            .cloned()
    }

    fn property_accesses(
        &self,
        file_name: &str,
        object: &str,
        start: u32,
        end: u32,
    ) -> Vec<PropertyAccess> {
        self.hit();
        self.accesses
            .get(&(file_name.to_string(), object.to_string()))
            .map(|list| {
                list.iter()
                    .filter(|(offset, _)| *offset >= start && *offset <= end)
                    .map(|(_, access)| access.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An engine handing out one shared [`FakeLanguageService`].
#[derive(Debug)]
pub struct FakeEngine {
    service: Arc<FakeLanguageService>,
    created: AtomicUsize,
}

impl FakeEngine {
    pub fn new(service: FakeLanguageService) -> Self {
        Self {
            service: Arc::new(service),
            created: AtomicUsize::new(0),
        }
    }

    /// The service every created language service delegates to.
    pub fn service(&self) -> &Arc<FakeLanguageService> {
        &self.service
    }

    /// Number of language services created.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ScriptEngine for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn version(&self) -> &str {
        "0.0.0"
    }

    fn create_language_service(
        &self,
        _language: &Arc<LanguageRegistry>,
        _env: &ServiceEnvironment,
    ) -> ServiceResult<Arc<dyn ScriptLanguageService>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.service.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_path() {
        assert_eq!(
            type_path(
                "__VLS_components",
                &[
                    TypeSegment::Property("Foo"),
                    TypeSegment::Instance,
                    TypeSegment::Property("$props"),
                ]
            ),
            "__VLS_components.Foo#instance.$props"
        );
        assert_eq!(
            type_path("f", &[TypeSegment::Parameter(0), TypeSegment::ReturnType]),
            "f#param0#return"
        );
    }

    #[test]
    fn test_fake_counts_calls() {
        let fake = FakeLanguageService::new().with_properties("/a.ts", TextSpan::new(0, 5), &["x"]);
        assert_eq!(fake.properties_at_position("/a.ts", 2), vec!["x".to_string()]);
        assert!(fake.properties_at_position("/a.ts", 9).is_empty());
        assert_eq!(fake.calls(), 2);
    }
}
