//! Dropping a component file into a template inserts the tag and its import.

use std::collections::HashMap;
use std::path::{Component, Path};

use async_trait::async_trait;
use vuels_core::casing::component_name_from_path;
use vuels_language::lsp_types::{InsertTextFormat, Position, Url, WorkspaceEdit};
use vuels_language::{
    DocumentDropEdit, DropItem, LanguageServicePlugin, PluginFeatures, PluginInstance,
    ServiceContext, ServiceResult, TextDocument,
};

use super::{import_edit, template_at};

pub const NAME: &str = "vue-document-drop";

const URI_LIST: &str = "text/uri-list";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| PluginInstance::new(DropFeatures))
}

struct DropFeatures;

/// Import specifier of `target` relative to the directory of `from`.
pub fn relative_import(from: &Path, target: &Path) -> Option<String> {
    let from_dir: Vec<Component<'_>> = from.parent()?.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = from_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec![".".to_string()];
    if common < from_dir.len() {
        parts = vec!["..".to_string(); from_dir.len() - common];
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_str()?.to_string());
    }
    Some(parts.join("/"))
}

#[async_trait]
impl PluginFeatures for DropFeatures {
    async fn provide_document_drop_edits(
        &self,
        document: &TextDocument,
        position: Position,
        items: &[DropItem],
    ) -> ServiceResult<Option<DocumentDropEdit>> {
        if template_at(document, position).is_none() {
            return Ok(None);
        }
        let Some(dropped) = items
            .iter()
            .filter(|item| item.mime_type == URI_LIST)
            .flat_map(|item| item.value.lines())
            .filter_map(|line| Url::parse(line.trim()).ok())
            .find(|uri| uri.path().ends_with(".vue"))
        else {
            return Ok(None);
        };
        let (Ok(from), Ok(target)) = (document.uri.to_file_path(), dropped.to_file_path()) else {
            return Ok(None);
        };
        let Some(specifier) = relative_import(&from, &target) else {
            return Ok(None);
        };

        let name = component_name_from_path(&target.to_string_lossy());
        let import = format!("import {name} from '{specifier}'");
        let Some(edit) = import_edit(document, &import) else {
            return Ok(None);
        };

        Ok(Some(DocumentDropEdit {
            insert_text: format!("<{name}$0 />"),
            insert_text_format: InsertTextFormat::SNIPPET,
            additional_edit: Some(WorkspaceEdit {
                changes: Some(HashMap::from([(document.uri.clone(), vec![edit])])),
                ..Default::default()
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{app_document, document, position_of, session};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/work/App.vue", "/work/Button.vue", "./Button.vue")]
    #[case("/work/App.vue", "/work/components/Button.vue", "./components/Button.vue")]
    #[case("/work/pages/Home.vue", "/work/components/Button.vue", "../components/Button.vue")]
    fn test_relative_import(#[case] from: &str, #[case] target: &str, #[case] expected: &str) {
        assert_eq!(
            relative_import(Path::new(from), Path::new(target)).as_deref(),
            Some(expected)
        );
    }

    fn drop_item(path: &str) -> DropItem {
        DropItem {
            mime_type: URI_LIST.to_string(),
            value: Url::from_file_path(path).unwrap().to_string(),
        }
    }

    #[tokio::test]
    async fn test_drop_into_script_setup_component() {
        let instance = create().create(&session());
        let doc = app_document();
        let edit = instance
            .features()
            .provide_document_drop_edits(
                &doc,
                position_of("<input", 0),
                &[drop_item("/work/components/my-card.vue")],
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(edit.insert_text, "<MyCard$0 />");
        let changes = edit.additional_edit.unwrap().changes.unwrap();
        let edits = &changes[&doc.uri];
        assert_eq!(edits[0].new_text, "\nimport MyCard from './components/my-card.vue'");
        assert_eq!(edits[0].range.start, Position::new(0, 24));
    }

    #[tokio::test]
    async fn test_drop_creates_script_setup() {
        let instance = create().create(&session());
        let doc = document("vue", "<template>\n  \n</template>\n");
        let edit = instance
            .features()
            .provide_document_drop_edits(
                &doc,
                Position::new(1, 2),
                &[drop_item("/work/Button.vue")],
            )
            .await
            .unwrap()
            .unwrap();
        let changes = edit.additional_edit.unwrap().changes.unwrap();
        assert_eq!(
            changes[&doc.uri][0].new_text,
            "<script setup lang=\"ts\">\nimport Button from './Button.vue'\n</script>\n\n"
        );
    }

    #[tokio::test]
    async fn test_ignores_other_files_and_positions() {
        let instance = create().create(&session());
        let doc = app_document();
        let features = instance.features();
        let not_component = features
            .provide_document_drop_edits(&doc, position_of("<input", 0), &[drop_item("/work/a.ts")])
            .await
            .unwrap();
        assert!(not_component.is_none());

        let in_script = features
            .provide_document_drop_edits(
                &doc,
                position_of("const", 0),
                &[drop_item("/work/Button.vue")],
            )
            .await
            .unwrap();
        assert!(in_script.is_none());
    }
}
