//! Language service plugin contract.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::{
    CodeAction, CodeLens, CompletionList, Diagnostic, DocumentSymbol, FoldingRange,
    FormattingOptions, Hover, InlayHint, InsertTextFormat, Location, Position, Range, TextEdit,
    WorkspaceEdit,
};

use crate::{CapabilityMap, ServiceContext, ServiceResult, TextDocument};

/// Creates a plugin instance for a session.
pub type PluginFactory = Arc<dyn Fn(&ServiceContext) -> PluginInstance + Send + Sync>;

/// A named, stateless factory of plugin instances.
#[derive(Clone)]
pub struct LanguageServicePlugin {
    name: Cow<'static, str>,
    create: PluginFactory,
}

impl LanguageServicePlugin {
    /// Creates a plugin from a name and a factory.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, create: F) -> Self
    where
        F: Fn(&ServiceContext) -> PluginInstance + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            create: Arc::new(create),
        }
    }

    /// The plugin name. Unique within a composed list.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates an instance for the given session context.
    pub fn create(&self, context: &ServiceContext) -> PluginInstance {
        (self.create)(context)
    }

    /// Replaces the factory while keeping the name.
    ///
    /// The wrapper receives the original factory and decides whether and how
    /// to call it.
    pub fn wrap<F>(self, wrapper: F) -> Self
    where
        F: Fn(&ServiceContext, &PluginFactory) -> PluginInstance + Send + Sync + 'static,
    {
        let original = self.create;
        Self {
            name: self.name,
            create: Arc::new(move |context: &ServiceContext| wrapper(context, &original)),
        }
    }
}

impl fmt::Debug for LanguageServicePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageServicePlugin")
            .field("name", &self.name)
            .finish()
    }
}

/// A plugin created for one session: its published capabilities and hooks.
#[derive(Clone)]
pub struct PluginInstance {
    provide: CapabilityMap,
    features: Arc<dyn PluginFeatures>,
}

impl PluginInstance {
    /// Creates an instance with the given hooks and no capabilities.
    pub fn new(features: impl PluginFeatures + 'static) -> Self {
        Self {
            provide: CapabilityMap::new(),
            features: Arc::new(features),
        }
    }

    /// An instance that answers nothing.
    pub fn empty() -> Self {
        Self::new(NoFeatures)
    }

    /// Attaches the published capabilities.
    pub fn with_provide(mut self, provide: CapabilityMap) -> Self {
        self.provide = provide;
        self
    }

    /// Published capabilities.
    pub fn provide(&self) -> &CapabilityMap {
        &self.provide
    }

    /// Feature hooks.
    pub fn features(&self) -> &Arc<dyn PluginFeatures> {
        &self.features
    }
}

impl fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginInstance")
            .field("provide", &self.provide)
            .finish_non_exhaustive()
    }
}

struct NoFeatures;

impl PluginFeatures for NoFeatures {}

/// The text change that triggered an auto-insert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoInsertChange {
    /// Byte offset where the change starts.
    pub range_offset: usize,
    /// Byte length of the replaced text.
    pub range_length: usize,
    /// The inserted text.
    pub text: String,
}

/// One item dropped onto a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropItem {
    pub mime_type: String,
    pub value: String,
}

/// Edit produced for a document drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDropEdit {
    pub insert_text: String,
    pub insert_text_format: InsertTextFormat,
    pub additional_edit: Option<WorkspaceEdit>,
}

/// Feature hooks of a plugin instance.
///
/// Every hook defaults to "no answer"; plugins override only what they serve.
#[async_trait]
pub trait PluginFeatures: Send + Sync {
    async fn provide_hover(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> ServiceResult<Option<Hover>> {
        Ok(None)
    }

    async fn provide_completion_items(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        Ok(None)
    }

    async fn provide_diagnostics(
        &self,
        _document: &TextDocument,
    ) -> ServiceResult<Vec<Diagnostic>> {
        Ok(Vec::new())
    }

    async fn provide_code_actions(
        &self,
        _document: &TextDocument,
        _range: Range,
    ) -> ServiceResult<Vec<CodeAction>> {
        Ok(Vec::new())
    }

    async fn provide_code_lenses(&self, _document: &TextDocument) -> ServiceResult<Vec<CodeLens>> {
        Ok(Vec::new())
    }

    async fn provide_inlay_hints(
        &self,
        _document: &TextDocument,
        _range: Range,
    ) -> ServiceResult<Vec<InlayHint>> {
        Ok(Vec::new())
    }

    async fn provide_document_symbols(
        &self,
        _document: &TextDocument,
    ) -> ServiceResult<Vec<DocumentSymbol>> {
        Ok(Vec::new())
    }

    async fn provide_folding_ranges(
        &self,
        _document: &TextDocument,
    ) -> ServiceResult<Vec<FoldingRange>> {
        Ok(Vec::new())
    }

    async fn provide_document_formatting_edits(
        &self,
        _document: &TextDocument,
        _options: &FormattingOptions,
    ) -> ServiceResult<Option<Vec<TextEdit>>> {
        Ok(None)
    }

    async fn provide_definition(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> ServiceResult<Vec<Location>> {
        Ok(Vec::new())
    }

    async fn provide_references(
        &self,
        _document: &TextDocument,
        _position: Position,
    ) -> ServiceResult<Vec<Location>> {
        Ok(Vec::new())
    }

    async fn provide_auto_insert_snippet(
        &self,
        _document: &TextDocument,
        _position: Position,
        _change: &AutoInsertChange,
    ) -> ServiceResult<Option<String>> {
        Ok(None)
    }

    /// Like [`provide_auto_insert_snippet`](Self::provide_auto_insert_snippet),
    /// for insertions that rewrite text before the cursor.
    async fn provide_auto_insert_edit(
        &self,
        _document: &TextDocument,
        _position: Position,
        _change: &AutoInsertChange,
    ) -> ServiceResult<Option<TextEdit>> {
        Ok(None)
    }

    async fn provide_document_drop_edits(
        &self,
        _document: &TextDocument,
        _position: Position,
        _items: &[DropItem],
    ) -> ServiceResult<Option<DocumentDropEdit>> {
        Ok(None)
    }
}
