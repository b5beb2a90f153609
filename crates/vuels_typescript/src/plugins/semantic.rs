//! Semantic analysis backed by the scripting engine.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use vuels_language::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionList, Diagnostic, Hover, HoverContents,
    Location, MarkupContent, MarkupKind, NumberOrString, Position,
};
use vuels_language::{
    CapabilityMap, LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext,
    ServiceResult, TextDocument,
};

use crate::convert::{ScriptTarget, is_script_document, severity, uri_of};
use crate::service::{ScriptEngine, ScriptLanguageService, TextSpan};
use crate::shared::{SharedLanguageService, TypeScriptLanguageService};

pub const NAME: &str = "typescript-semantic";

/// Creates the semantic plugin.
///
/// Instances publish their language service under
/// [`TypeScriptLanguageService`]. When the registry has no scripting support
/// the instance provides nothing.
pub fn create(engine: Arc<dyn ScriptEngine>) -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, move |context: &ServiceContext| {
        if context.language().typescript().is_none() {
            debug!("Scripting engine is not active; {} provides nothing", NAME);
            return PluginInstance::empty();
        }

        match engine.create_language_service(context.language(), context.env()) {
            Ok(service) => {
                debug!(
                    "Created {} {} language service",
                    engine.name(),
                    engine.version()
                );
                let shared = SharedLanguageService::new(service);
                PluginInstance::new(SemanticFeatures {
                    context: context.clone(),
                    service: shared.clone(),
                })
                .with_provide(CapabilityMap::new().with::<TypeScriptLanguageService>(shared))
            }
            Err(e) => {
                warn!("{} language service unavailable: {}", engine.name(), e);
                PluginInstance::empty()
            }
        }
    })
}

struct SemanticFeatures {
    context: ServiceContext,
    service: SharedLanguageService,
}

impl SemanticFeatures {
    fn target(&self, document: &TextDocument) -> Option<ScriptTarget> {
        let target = ScriptTarget::resolve(&self.context, document);
        (target.is_generated() || is_script_document(document)).then_some(target)
    }

    fn locations(
        &self,
        targets: impl Iterator<Item = (String, TextSpan)>,
    ) -> ServiceResult<Vec<Location>> {
        let mut locations = Vec::new();
        for (file_name, span) in targets {
            let uri = uri_of(&self.context, &file_name)?;
            let Some(script) = self.context.language().get(&uri) else {
                trace!("Skipping location in unregistered file {}", file_name);
                continue;
            };
            let target = ScriptTarget { file_name, script };
            if let Some(range) = target.to_source_range(span, |d| d.navigation) {
                locations.push(Location::new(uri, range));
            }
        }
        Ok(locations)
    }
}

fn completion_kind(kind: &str) -> CompletionItemKind {
    match kind {
        "method" => CompletionItemKind::METHOD,
        "function" | "local function" => CompletionItemKind::FUNCTION,
        "property" | "getter" | "setter" => CompletionItemKind::PROPERTY,
        "var" | "let" | "local var" | "parameter" => CompletionItemKind::VARIABLE,
        "const" => CompletionItemKind::CONSTANT,
        "class" | "component" => CompletionItemKind::CLASS,
        "interface" | "type" => CompletionItemKind::INTERFACE,
        "enum" => CompletionItemKind::ENUM,
        "module" => CompletionItemKind::MODULE,
        "keyword" => CompletionItemKind::KEYWORD,
        _ => CompletionItemKind::TEXT,
    }
}

#[async_trait]
impl PluginFeatures for SemanticFeatures {
    async fn provide_hover(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<Hover>> {
        let Some(target) = self.target(document) else {
            return Ok(None);
        };
        let offset = document.offset_at(position) as u32;
        let Some(generated) = target.to_generated(offset, |d| d.semantic) else {
            return Ok(None);
        };
        let Some(info) = self
            .service
            .quick_info_at_position(&target.file_name, generated)
        else {
            return Ok(None);
        };

        let mut value = format!("```typescript\n{}\n```", info.display);
        if !info.documentation.is_empty() {
            value.push_str("\n\n");
            value.push_str(&info.documentation);
        }
        Ok(Some(Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: target.to_source_range(info.span, |_| true),
        }))
    }

    async fn provide_completion_items(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Option<CompletionList>> {
        let Some(target) = self.target(document) else {
            return Ok(None);
        };
        let offset = document.offset_at(position) as u32;
        let Some(generated) = target.to_generated(offset, |d| d.completion) else {
            return Ok(None);
        };
        let Some(info) = self
            .service
            .completions_at_position(&target.file_name, generated)
        else {
            return Ok(None);
        };

        let items = info
            .entries
            .into_iter()
            .map(|entry| CompletionItem {
                kind: Some(completion_kind(&entry.kind)),
                sort_text: entry.sort_text,
                insert_text: entry.insert_text,
                label: entry.name,
                ..Default::default()
            })
            .collect();
        Ok(Some(CompletionList {
            is_incomplete: info.is_incomplete,
            items,
        }))
    }

    async fn provide_diagnostics(&self, document: &TextDocument) -> ServiceResult<Vec<Diagnostic>> {
        let Some(target) = self.target(document) else {
            return Ok(Vec::new());
        };
        let diagnostics = self
            .service
            .semantic_diagnostics(&target.file_name)
            .into_iter()
            .filter(|d| d.file_name == target.file_name)
            .filter_map(|d| {
                let range = target.to_source_range(d.span, |info| info.verification)?;
                Some(Diagnostic {
                    range,
                    severity: Some(severity(d.category)),
                    code: Some(NumberOrString::Number(d.code as i32)),
                    source: Some("ts".to_string()),
                    message: d.message,
                    ..Default::default()
                })
            })
            .collect();
        Ok(diagnostics)
    }

    async fn provide_definition(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Vec<Location>> {
        let Some(target) = self.target(document) else {
            return Ok(Vec::new());
        };
        let offset = document.offset_at(position) as u32;
        let Some(generated) = target.to_generated(offset, |d| d.navigation) else {
            return Ok(Vec::new());
        };
        let definitions = self
            .service
            .definition_at_position(&target.file_name, generated);
        self.locations(definitions.into_iter().map(|d| (d.file_name, d.span)))
    }

    async fn provide_references(
        &self,
        document: &TextDocument,
        position: Position,
    ) -> ServiceResult<Vec<Location>> {
        let Some(target) = self.target(document) else {
            return Ok(Vec::new());
        };
        let offset = document.offset_at(position) as u32;
        let Some(generated) = target.to_generated(offset, |d| d.navigation) else {
            return Ok(Vec::new());
        };
        let references = self.service.references(&target.file_name, generated);
        self.locations(references.into_iter().map(|r| (r.file_name, r.span)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{CompletionEntry, DiagnosticCategory, QuickInfo, ScriptDiagnostic};
    use crate::test_utils::{FakeEngine, FakeLanguageService};
    use pretty_assertions::assert_eq;
    use vuels_language::lsp_types::{Range, Url};
    use vuels_language::{
        LanguageRegistry, ServiceEnvironment, TypeScriptEnvironment, TypeScriptSupport,
    };

    const SOURCE: &str = "const foo = 1\nfoo.toFixed()\n";

    fn context(typescript: bool) -> ServiceContext {
        let mut registry = LanguageRegistry::new(vec![]);
        if typescript {
            registry = registry.with_typescript(TypeScriptSupport::default());
        }
        let env = ServiceEnvironment::default().with_typescript(TypeScriptEnvironment::file_urls());
        ServiceContext::new(env, Arc::new(registry))
    }

    fn document() -> TextDocument {
        TextDocument::new(Url::parse("file:///work/a.ts").unwrap(), "typescript", 1, SOURCE)
    }

    fn engine() -> Arc<FakeEngine> {
        let fake = FakeLanguageService::new()
            .with_quick_info(
                "/work/a.ts",
                TextSpan::new(6, 3),
                QuickInfo {
                    kind: "const".to_string(),
                    display: "const foo: 1".to_string(),
                    documentation: "The answer.".to_string(),
                    span: TextSpan::new(6, 3),
                },
            )
            .with_completions(
                "/work/a.ts",
                vec![CompletionEntry::new("toFixed", "method")],
            )
            .with_diagnostic(ScriptDiagnostic {
                file_name: "/work/a.ts".to_string(),
                span: TextSpan::new(14, 3),
                message: "Unused expression.".to_string(),
                code: 6133,
                category: DiagnosticCategory::Warning,
            });
        Arc::new(FakeEngine::new(fake))
    }

    #[test]
    fn test_inactive_engine_provides_nothing() {
        let engine = engine();
        let instance = create(engine.clone()).create(&context(false));
        assert!(instance.provide().is_empty());
        assert_eq!(engine.created(), 0);
    }

    #[test]
    fn test_publishes_language_service() {
        let instance = create(engine()).create(&context(true));
        assert!(instance.provide().get::<TypeScriptLanguageService>().is_some());
    }

    #[tokio::test]
    async fn test_hover() {
        let instance = create(engine()).create(&context(true));
        let hover = instance
            .features()
            .provide_hover(&document(), Position::new(0, 7))
            .await
            .unwrap()
            .unwrap();

        let HoverContents::Markup(content) = hover.contents else {
            panic!("expected markup");
        };
        assert_eq!(content.value, "```typescript\nconst foo: 1\n```\n\nThe answer.");
        assert_eq!(
            hover.range,
            Some(Range::new(Position::new(0, 6), Position::new(0, 9)))
        );
    }

    #[tokio::test]
    async fn test_completion_and_diagnostics() {
        let instance = create(engine()).create(&context(true));
        let doc = document();

        let list = instance
            .features()
            .provide_completion_items(&doc, Position::new(1, 4))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(list.items[0].label, "toFixed");
        assert_eq!(list.items[0].kind, Some(CompletionItemKind::METHOD));

        let diagnostics = instance.features().provide_diagnostics(&doc).await.unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range.start, Position::new(1, 0));
        assert_eq!(diagnostics[0].code, Some(NumberOrString::Number(6133)));
    }

    #[tokio::test]
    async fn test_non_script_documents_are_ignored() {
        let instance = create(engine()).create(&context(true));
        let doc = TextDocument::new(Url::parse("file:///work/a.css").unwrap(), "css", 1, "a {}");
        let hover = instance
            .features()
            .provide_hover(&doc, Position::new(0, 0))
            .await
            .unwrap();
        assert!(hover.is_none());
    }
}
