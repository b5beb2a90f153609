//! Pug formatting: indentation normalisation and trailing whitespace.

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{FormattingOptions, TextEdit};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::is_vue_document;

pub const NAME: &str = "pug-beautify";

const PUG_LANGS: &[&str] = &["pug", "jade"];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(PugBeautifyFeatures)
    })
}

struct PugBeautifyFeatures;

/// Re-indents pug source with the editor's indentation unit.
///
/// Leading whitespace is measured in columns (a tab counts as `tab_size`),
/// so mixed indentation collapses to one style. Trailing whitespace is
/// removed.
pub fn beautify(source: &str, options: &FormattingOptions) -> String {
    let tab_size = options.tab_size.max(1) as usize;
    let unit = if options.insert_spaces {
        " ".repeat(tab_size)
    } else {
        "\t".to_string()
    };

    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body.strip_suffix('\r').unwrap_or(body), "\n"),
            None => (line, ""),
        };
        let content = body.trim_start_matches([' ', '\t']);
        let indent = &body[..body.len() - content.len()];
        let columns: usize = indent
            .chars()
            .map(|c| if c == '\t' { tab_size } else { 1 })
            .sum();

        let content = content.trim_end();
        if !content.is_empty() {
            out.push_str(&unit.repeat(columns / tab_size));
            out.push_str(&" ".repeat(columns % tab_size));
            out.push_str(content);
        }
        out.push_str(newline);
    }
    out
}

#[async_trait]
impl PluginFeatures for PugBeautifyFeatures {
    async fn provide_document_formatting_edits(
        &self,
        document: &TextDocument,
        options: &FormattingOptions,
    ) -> ServiceResult<Option<Vec<TextEdit>>> {
        let (start, source) = if PUG_LANGS.contains(&document.language_id.as_str()) {
            (0, document.text.clone())
        } else if is_vue_document(document)
            && let Some(template) = parse_sfc(&document.text).template
            && template.lang.as_deref().is_some_and(|l| PUG_LANGS.contains(&l))
        {
            (template.start as usize, template.content)
        } else {
            return Ok(None);
        };

        let formatted = beautify(&source, options);
        if formatted == source {
            return Ok(Some(Vec::new()));
        }
        let Some(range) = document.range_of(start, start + source.len()) else {
            return Ok(None);
        };
        Ok(Some(vec![TextEdit {
            range,
            new_text: formatted,
        }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::tests::{app_document, document, session};
    use pretty_assertions::assert_eq;

    fn spaces(tab_size: u32) -> FormattingOptions {
        FormattingOptions {
            tab_size,
            insert_spaces: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_beautify_normalises_indentation() {
        let source = "div\n\tspan hello  \n\t\ta(href='#')\n";
        assert_eq!(
            beautify(source, &spaces(2)),
            "div\n  span hello\n    a(href='#')\n"
        );
    }

    #[test]
    fn test_beautify_to_tabs_keeps_odd_columns() {
        let options = FormattingOptions {
            tab_size: 2,
            insert_spaces: false,
            ..Default::default()
        };
        assert_eq!(beautify("div\n   span\n", &options), "div\n\t span\n");
    }

    #[tokio::test]
    async fn test_formats_pug_template_block() {
        let instance = create().create(&session());
        let doc = document(
            "vue",
            "<template lang=\"pug\">\ndiv\n\tspan  \n</template>\n",
        );
        let edits = instance
            .features()
            .provide_document_formatting_edits(&doc, &spaces(2))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_text, "\ndiv\n  span\n");
    }

    #[tokio::test]
    async fn test_ignores_html_templates() {
        let instance = create().create(&session());
        let edits = instance
            .features()
            .provide_document_formatting_edits(&app_document(), &spaces(2))
            .await
            .unwrap();
        assert!(edits.is_none());
    }
}
