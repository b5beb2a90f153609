//! The scripting-language plugin bundle.

pub mod directive_comment;
pub mod doc_comment;
pub mod semantic;
pub mod syntactic;
pub mod twoslash;

use std::sync::Arc;

use vuels_language::LanguageServicePlugin;

use crate::service::ScriptEngine;

/// The full scripting bundle, semantic analysis first.
pub fn create_typescript_plugins(engine: Arc<dyn ScriptEngine>) -> Vec<LanguageServicePlugin> {
    vec![
        semantic::create(engine),
        syntactic::create(),
        doc_comment::create(),
        directive_comment::create(),
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_utils::{FakeEngine, FakeLanguageService};
    use vuels_language::{LanguageRegistry, ServiceContext, ServiceEnvironment, TypeScriptSupport};

    pub(crate) fn context() -> ServiceContext {
        ServiceContext::new(
            ServiceEnvironment::default(),
            Arc::new(LanguageRegistry::new(vec![]).with_typescript(TypeScriptSupport::default())),
        )
    }

    #[test]
    fn test_bundle_names_in_order() {
        let engine = Arc::new(FakeEngine::new(FakeLanguageService::new()));
        let names: Vec<String> = create_typescript_plugins(engine)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                semantic::NAME,
                syntactic::NAME,
                doc_comment::NAME,
                directive_comment::NAME,
            ]
        );
    }
}
