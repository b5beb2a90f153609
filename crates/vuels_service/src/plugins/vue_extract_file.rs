//! Refactor moving a template fragment into a new component file.

use std::sync::Arc;

use async_trait::async_trait;
use vuels_language::lsp_types::{
    CodeAction, CodeActionKind, CreateFile, DocumentChangeOperation, DocumentChanges, OneOf,
    OptionalVersionedTextDocumentIdentifier, Position, Range, ResourceOp, TextDocumentEdit,
    TextEdit, Url, WorkspaceEdit,
};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};
use vuels_ts_plugin::{ExtractPropCandidate, TsPluginClient};
use vuels_typescript::convert::file_name_of;

use super::{import_edit, request_error, template_at};
use crate::GetTsPluginClient;

pub const NAME: &str = "vue-extract-file";

const COMPONENT_NAME: &str = "NewComponent";

pub fn create(get_ts_plugin_client: GetTsPluginClient) -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, move |context: &ServiceContext| {
        PluginInstance::new(ExtractFileFeatures {
            context: context.clone(),
            client: get_ts_plugin_client(context),
        })
    })
}

struct ExtractFileFeatures {
    context: ServiceContext,
    client: Option<Arc<dyn TsPluginClient>>,
}

/// Source of the extracted component.
pub fn component_source(template: &str, props: &[ExtractPropCandidate]) -> String {
    let mut script = String::new();
    let plain: Vec<&ExtractPropCandidate> = props.iter().filter(|p| !p.model).collect();
    if !plain.is_empty() {
        script.push_str("defineProps<{\n");
        for prop in plain {
            script.push_str(&format!("  {}: {};\n", prop.name, prop.type_text));
        }
        script.push_str("}>();\n");
    }
    for prop in props.iter().filter(|p| p.model) {
        script.push_str(&format!(
            "const {0} = defineModel<{1}>('{0}', {{ required: true }});\n",
            prop.name, prop.type_text
        ));
    }
    format!(
        "<script setup lang=\"ts\">\n{script}</script>\n\n<template>\n{template}\n</template>\n"
    )
}

/// The tag replacing the extracted fragment.
pub fn component_tag(props: &[ExtractPropCandidate]) -> String {
    let mut tag = format!("<{COMPONENT_NAME}");
    for prop in props {
        let directive = if prop.model { "v-model:" } else { ":" };
        tag.push_str(&format!(" {directive}{0}=\"{0}\"", prop.name));
    }
    tag.push_str(" />");
    tag
}

fn text_document_edit(uri: Url, edits: Vec<TextEdit>) -> DocumentChangeOperation {
    DocumentChangeOperation::Edit(TextDocumentEdit {
        text_document: OptionalVersionedTextDocumentIdentifier { uri, version: None },
        edits: edits.into_iter().map(OneOf::Left).collect(),
    })
}

#[async_trait]
impl PluginFeatures for ExtractFileFeatures {
    async fn provide_code_actions(
        &self,
        document: &TextDocument,
        range: Range,
    ) -> ServiceResult<Vec<CodeAction>> {
        let Some(client) = &self.client else {
            return Ok(Vec::new());
        };
        let Some((template, start)) = template_at(document, range.start) else {
            return Ok(Vec::new());
        };
        let end = document.offset_at(range.end);
        if end <= start || !template.contains(end as u32) {
            return Ok(Vec::new());
        }
        let selection = &document.text[start..end];
        let trimmed = selection.trim();
        if !trimmed.starts_with('<') || !trimmed.ends_with('>') {
            return Ok(Vec::new());
        }

        let file_name = file_name_of(&self.context, &document.uri);
        let props = client
            .collect_extract_props(&file_name, (start as u32, end as u32))
            .await
            .map_err(request_error(NAME))?
            .unwrap_or_default();

        let Ok(new_uri) = document.uri.join(&format!("{COMPONENT_NAME}.vue")) else {
            return Ok(Vec::new());
        };
        let import = format!("import {COMPONENT_NAME} from './{COMPONENT_NAME}.vue'");
        let Some(import) = import_edit(document, &import) else {
            return Ok(Vec::new());
        };

        let origin = Position::new(0, 0);
        let operations = vec![
            DocumentChangeOperation::Op(ResourceOp::Create(CreateFile {
                uri: new_uri.clone(),
                options: None,
                annotation_id: None,
            })),
            text_document_edit(
                new_uri,
                vec![TextEdit {
                    range: Range::new(origin, origin),
                    new_text: component_source(trimmed, &props),
                }],
            ),
            text_document_edit(
                document.uri.clone(),
                vec![
                    import,
                    TextEdit {
                        range,
                        new_text: component_tag(&props),
                    },
                ],
            ),
        ];

        Ok(vec![CodeAction {
            title: "Extract into new dumb component".to_string(),
            kind: Some(CodeActionKind::REFACTOR_EXTRACT),
            edit: Some(WorkspaceEdit {
                document_changes: Some(DocumentChanges::Operations(operations)),
                ..Default::default()
            }),
            ..Default::default()
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{
        StubClient, app_document, client_factory, no_client, position_of, session,
    };
    use pretty_assertions::assert_eq;

    fn candidate(name: &str, type_text: &str, model: bool) -> ExtractPropCandidate {
        ExtractPropCandidate {
            name: name.to_string(),
            type_text: type_text.to_string(),
            model,
        }
    }

    fn selection() -> Range {
        let end = "</my-button>";
        Range::new(position_of("<my-button", 0), position_of(end, end.len()))
    }

    #[test]
    fn test_component_source_and_tag() {
        let props = [candidate("count", "number", false), candidate("open", "boolean", true)];
        assert_eq!(
            component_source("<p>{{ count }}</p>", &props),
            concat!(
                "<script setup lang=\"ts\">\n",
                "defineProps<{\n  count: number;\n}>();\n",
                "const open = defineModel<boolean>('open', { required: true });\n",
                "</script>\n\n<template>\n<p>{{ count }}</p>\n</template>\n",
            )
        );
        assert_eq!(
            component_tag(&props),
            "<NewComponent :count=\"count\" v-model:open=\"open\" />"
        );
    }

    #[tokio::test]
    async fn test_extracts_selected_element() {
        let stub = StubClient {
            extract: vec![candidate("count", "number", false)],
            ..Default::default()
        };
        let instance = create(client_factory(stub)).create(&session());
        let doc = app_document();
        let actions = instance
            .features()
            .provide_code_actions(&doc, selection())
            .await
            .unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, Some(CodeActionKind::REFACTOR_EXTRACT));

        let Some(DocumentChanges::Operations(operations)) =
            actions[0].edit.as_ref().unwrap().document_changes.clone()
        else {
            panic!("expected document operations");
        };
        assert_eq!(operations.len(), 3);
        let DocumentChangeOperation::Op(ResourceOp::Create(created)) = &operations[0] else {
            panic!("expected a file creation");
        };
        assert_eq!(created.uri.as_str(), "file:///work/NewComponent.vue");

        let DocumentChangeOperation::Edit(own) = &operations[2] else {
            panic!("expected an edit of the current document");
        };
        let texts: Vec<String> = own
            .edits
            .iter()
            .map(|edit| match edit {
                OneOf::Left(edit) => edit.new_text.clone(),
                OneOf::Right(edit) => edit.text_edit.new_text.clone(),
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "\nimport NewComponent from './NewComponent.vue'".to_string(),
                "<NewComponent :count=\"count\" />".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_requires_markup_selection_and_client() {
        let stub = StubClient::default();
        let instance = create(client_factory(stub)).create(&session());
        let doc = app_document();
        let partial = Range::new(position_of("{{ count", 0), position_of("{{ count", 8));
        let actions = instance
            .features()
            .provide_code_actions(&doc, partial)
            .await
            .unwrap();
        assert!(actions.is_empty());

        let without_client = create(no_client()).create(&session());
        let actions = without_client
            .features()
            .provide_code_actions(&doc, selection())
            .await
            .unwrap();
        assert!(actions.is_empty());
    }
}
