//! Expands `/**` into a documentation comment block.

use async_trait::async_trait;
use vuels_language::lsp_types::Position;
use vuels_language::{
    AutoInsertChange, LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext,
    ServiceResult, TextDocument,
};

use crate::convert::{is_script_document, line_prefix, line_suffix};

pub const NAME: &str = "typescript-doc-comment-template";

const TEMPLATE: &str = "\n * $0\n */";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(DocCommentFeatures)
    })
}

struct DocCommentFeatures;

#[async_trait]
impl PluginFeatures for DocCommentFeatures {
    async fn provide_auto_insert_snippet(
        &self,
        document: &TextDocument,
        position: Position,
        change: &AutoInsertChange,
    ) -> ServiceResult<Option<String>> {
        if !is_script_document(document) || !change.text.ends_with('*') {
            return Ok(None);
        }
        let opens_comment = line_prefix(document, position).trim() == "/**";
        let rest_is_empty = line_suffix(document, position).trim().is_empty();
        Ok((opens_comment && rest_is_empty).then(|| TEMPLATE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vuels_language::lsp_types::Url;

    #[rstest]
    #[case("  /**\nfunction f() {}", Position::new(0, 5), "*", true)]
    #[case("/**", Position::new(0, 3), "*", true)]
    #[case("a /**", Position::new(0, 5), "*", false)]
    #[case("/** x", Position::new(0, 3), "*", false)]
    #[case("/**", Position::new(0, 3), "a", false)]
    #[tokio::test]
    async fn test_template(
        #[case] text: &str,
        #[case] position: Position,
        #[case] typed: &str,
        #[case] expected: bool,
    ) {
        let doc = TextDocument::new(Url::parse("file:///a.ts").unwrap(), "typescript", 1, text);
        let change = AutoInsertChange {
            range_offset: doc.offset_at(position) - 1,
            range_length: 0,
            text: typed.to_string(),
        };
        let instance = create().create(&crate::plugins::tests::context());
        let snippet = instance
            .features()
            .provide_auto_insert_snippet(&doc, position, &change)
            .await
            .unwrap();
        assert_eq!(snippet.is_some(), expected);
        if expected {
            assert_eq!(snippet.as_deref(), Some(TEMPLATE));
        }
    }
}
