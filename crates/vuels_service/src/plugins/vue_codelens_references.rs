//! Reference count lens over a component's script block.

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{CodeLens, Command};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};
use vuels_typescript::convert::ScriptTarget;
use vuels_typescript::{ScriptLanguageService, TypeScriptLanguageService};

use super::is_vue_document;

pub const NAME: &str = "vue-codelens-references";

const SHOW_REFERENCES: &str = "editor.action.showReferences";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |context: &ServiceContext| {
        PluginInstance::new(CodeLensFeatures {
            context: context.clone(),
        })
    })
}

struct CodeLensFeatures {
    context: ServiceContext,
}

fn title(count: usize) -> String {
    match count {
        1 => "1 reference".to_string(),
        n => format!("{n} references"),
    }
}

#[async_trait]
impl PluginFeatures for CodeLensFeatures {
    async fn provide_code_lenses(&self, document: &TextDocument) -> ServiceResult<Vec<CodeLens>> {
        if !is_vue_document(document) {
            return Ok(Vec::new());
        }
        let Some(service) = self.context.inject::<TypeScriptLanguageService>() else {
            return Ok(Vec::new());
        };
        let sfc = parse_sfc(&document.text);
        let Some(script) = sfc.script_setup.as_ref().or(sfc.script.as_ref()) else {
            return Ok(Vec::new());
        };

        let target = ScriptTarget::resolve(&self.context, document);
        let Some(generated) = target.to_generated(script.start, |d| d.navigation) else {
            return Ok(Vec::new());
        };
        let count = service
            .references(&target.file_name, generated)
            .iter()
            .filter(|r| r.file_name != target.file_name)
            .count();
        let Some(range) = document.range_of(script.loc_start as usize, script.start as usize)
        else {
            return Ok(Vec::new());
        };

        Ok(vec![CodeLens {
            range,
            command: Some(Command {
                title: title(count),
                command: SHOW_REFERENCES.to_string(),
                arguments: None,
            }),
            data: None,
        }])
    }
}
