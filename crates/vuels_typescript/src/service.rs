//! Scripting engine request interface.
//!
//! Offsets are byte offsets into the engine's view of a file. For component
//! files that is the generated script code, not the component source.

use std::sync::Arc;

use vuels_language::{LanguageRegistry, ServiceEnvironment, ServiceResult};

/// A span of text in an engine file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Returns `true` if `offset` lies within the span (end inclusive).
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end()
    }
}

/// Summary shown on hover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickInfo {
    /// Symbol kind, e.g. `const`, `property`, `component`.
    pub kind: String,
    /// Type or signature text.
    pub display: String,
    pub documentation: String,
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub name: String,
    pub kind: String,
    pub sort_text: Option<String>,
    pub insert_text: Option<String>,
}

impl CompletionEntry {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            sort_text: None,
            insert_text: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionInfo {
    pub entries: Vec<CompletionEntry>,
    pub is_incomplete: bool,
}

/// Where a symbol is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    pub file_name: String,
    pub span: TextSpan,
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub file_name: String,
    pub span: TextSpan,
    pub is_write: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDiagnostic {
    pub file_name: String,
    pub span: TextSpan,
    pub message: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

/// One step of a member path walked by [`ScriptLanguageService::type_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSegment<'a> {
    /// A named member of the current type.
    Property(&'a str),
    /// The n-th parameter of the current type's first call signature.
    Parameter(usize),
    /// The return type of the current type's first call signature.
    ReturnType,
    /// The instance type of the current constructor type.
    Instance,
}

/// A member of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub documentation: String,
}

impl TypeMember {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_text: type_text.into(),
            optional: false,
            documentation: String::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A type found at the end of a member path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedType {
    /// The type as the engine would print it.
    pub display: String,
    pub members: Vec<TypeMember>,
    /// Whether the type has a call signature.
    pub callable: bool,
    /// Members of a string literal union, in declaration order.
    pub string_literals: Vec<String>,
}

/// A property read or written on a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccess {
    pub name: String,
    pub type_text: String,
    /// `true` when the property is assigned to.
    pub written: bool,
}

/// The language service of a scripting engine.
///
/// Calls are synchronous; an engine living in another process is reached
/// through its own transport, not through this trait.
pub trait ScriptLanguageService: Send + Sync {
    fn quick_info_at_position(&self, file_name: &str, position: u32) -> Option<QuickInfo>;

    fn completions_at_position(&self, file_name: &str, position: u32) -> Option<CompletionInfo>;

    fn definition_at_position(&self, file_name: &str, position: u32) -> Vec<DefinitionInfo>;

    fn references(&self, file_name: &str, position: u32) -> Vec<ReferenceEntry>;

    fn semantic_diagnostics(&self, file_name: &str) -> Vec<ScriptDiagnostic>;

    /// Names of the properties available on the value at `position`.
    fn properties_at_position(&self, file_name: &str, position: u32) -> Vec<String>;

    /// Resolves the type reached by walking `path` from the binding `root`.
    fn type_at(
        &self,
        file_name: &str,
        root: &str,
        path: &[TypeSegment<'_>],
    ) -> Option<ResolvedType>;

    /// Property accesses on `object` within `start..end`, in source order.
    fn property_accesses(
        &self,
        file_name: &str,
        object: &str,
        start: u32,
        end: u32,
    ) -> Vec<PropertyAccess>;
}

/// A scripting engine that can create language services.
pub trait ScriptEngine: Send + Sync {
    /// Engine name, e.g. `typescript`.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Creates a language service over the registry's scripts.
    ///
    /// Fails with [`ServiceError::Unavailable`](vuels_language::ServiceError)
    /// when semantic analysis is not served by this process.
    fn create_language_service(
        &self,
        language: &Arc<LanguageRegistry>,
        env: &ServiceEnvironment,
    ) -> ServiceResult<Arc<dyn ScriptLanguageService>>;
}
