//! Plugin instances of one workspace and the dispatch of feature requests.

use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;

use tracing::{debug, warn};
use vuels_language::lsp_types::{
    CodeAction, CodeLens, CompletionList, Diagnostic, DocumentSymbol, FoldingRange,
    FormattingOptions, Hover, InlayHint, Location, Position, Range, TextEdit,
};
use vuels_language::{
    AutoInsertChange, DocumentDropEdit, DropItem, LanguageServicePlugin, PluginFeatures,
    PluginInstance, ServiceContext, ServiceResult, TextDocument,
};

/// The future returned by a feature hook.
type HookFuture<'a, T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'a>>;

/// The answer to an auto-insert request.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoInsert {
    Snippet(String),
    Edit(TextEdit),
}

/// A composed language service bound to one [`ServiceContext`].
///
/// Plugin instances are created on first use, in plugin order. Each
/// instance's capabilities are registered before the next one is created,
/// so later plugins can inject what earlier ones publish.
pub struct Session {
    context: ServiceContext,
    plugins: Vec<LanguageServicePlugin>,
    instances: OnceLock<Vec<(String, PluginInstance)>>,
}

impl Session {
    pub fn new(context: ServiceContext, plugins: Vec<LanguageServicePlugin>) -> Self {
        Self {
            context,
            plugins,
            instances: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Plugin names in order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    fn instances(&self) -> &[(String, PluginInstance)] {
        self.instances.get_or_init(|| {
            let instances: Vec<(String, PluginInstance)> = self
                .plugins
                .iter()
                .map(|plugin| {
                    let instance = plugin.create(&self.context);
                    self.context
                        .register_provider(plugin.name(), instance.provide().clone());
                    (plugin.name().to_string(), instance)
                })
                .collect();
            debug!("Created {} plugin instances", instances.len());
            instances
        })
    }

    /// Asks each plugin in turn and returns the first answer.
    async fn first<'a, T>(
        &'a self,
        hook: &str,
        call: impl Fn(&'a dyn PluginFeatures) -> HookFuture<'a, Option<T>>,
    ) -> Option<T> {
        for (name, instance) in self.instances() {
            match call(instance.features().as_ref()).await {
                Ok(Some(answer)) => return Some(answer),
                Ok(None) => {}
                Err(e) => warn!("Plugin {} failed in {}: {}", name, hook, e),
            }
        }
        None
    }

    /// Asks every plugin and returns the answers in plugin order.
    async fn all<'a, T>(
        &'a self,
        hook: &str,
        call: impl Fn(&'a dyn PluginFeatures) -> HookFuture<'a, T>,
    ) -> Vec<T> {
        let mut answers = Vec::new();
        for (name, instance) in self.instances() {
            match call(instance.features().as_ref()).await {
                Ok(answer) => answers.push(answer),
                Err(e) => warn!("Plugin {} failed in {}: {}", name, hook, e),
            }
        }
        answers
    }

    pub async fn hover(&self, document: &TextDocument, position: Position) -> Option<Hover> {
        self.first("hover", |f| f.provide_hover(document, position)).await
    }

    pub async fn completion(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> Option<CompletionList> {
        let lists = self
            .all("completion", |f| f.provide_completion_items(document, position))
            .await;
        lists
            .into_iter()
            .flatten()
            .reduce(|mut merged, list| {
                merged.is_incomplete |= list.is_incomplete;
                merged.items.extend(list.items);
                merged
            })
    }

    pub async fn diagnostics(&self, document: &TextDocument) -> Vec<Diagnostic> {
        self.all("diagnostics", |f| f.provide_diagnostics(document))
            .await
            .concat()
    }

    pub async fn code_actions(&self, document: &TextDocument, range: Range) -> Vec<CodeAction> {
        self.all("code actions", |f| f.provide_code_actions(document, range))
            .await
            .concat()
    }

    pub async fn code_lenses(&self, document: &TextDocument) -> Vec<CodeLens> {
        self.all("code lenses", |f| f.provide_code_lenses(document))
            .await
            .concat()
    }

    pub async fn inlay_hints(&self, document: &TextDocument, range: Range) -> Vec<InlayHint> {
        self.all("inlay hints", |f| f.provide_inlay_hints(document, range))
            .await
            .concat()
    }

    pub async fn document_symbols(&self, document: &TextDocument) -> Vec<DocumentSymbol> {
        self.all("document symbols", |f| f.provide_document_symbols(document))
            .await
            .concat()
    }

    pub async fn folding_ranges(&self, document: &TextDocument) -> Vec<FoldingRange> {
        self.all("folding ranges", |f| f.provide_folding_ranges(document))
            .await
            .concat()
    }

    pub async fn formatting(
        &self,
        document: &TextDocument,
        options: &FormattingOptions,
    ) -> Option<Vec<TextEdit>> {
        self.first("formatting", |f| {
            f.provide_document_formatting_edits(document, options)
        })
        .await
    }

    pub async fn definition(&self, document: &TextDocument, position: Position) -> Vec<Location> {
        self.all("definition", |f| f.provide_definition(document, position))
            .await
            .concat()
    }

    pub async fn references(&self, document: &TextDocument, position: Position) -> Vec<Location> {
        self.all("references", |f| f.provide_references(document, position))
            .await
            .concat()
    }

    /// Snippets take precedence over rewriting edits.
    pub async fn auto_insert(
        &self,
        document: &TextDocument,
        position: Position,
        change: &AutoInsertChange,
    ) -> Option<AutoInsert> {
        if let Some(snippet) = self
            .first("auto insert", |f| {
                f.provide_auto_insert_snippet(document, position, change)
            })
            .await
        {
            return Some(AutoInsert::Snippet(snippet));
        }
        self.first("auto insert", |f| {
            f.provide_auto_insert_edit(document, position, change)
        })
        .await
        .map(AutoInsert::Edit)
    }

    pub async fn document_drop(
        &self,
        document: &TextDocument,
        position: Position,
        items: &[DropItem],
    ) -> Option<DocumentDropEdit> {
        self.first("document drop", |f| {
            f.provide_document_drop_edits(document, position, items)
        })
        .await
    }
}
