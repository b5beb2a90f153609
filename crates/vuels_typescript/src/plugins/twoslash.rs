//! Inline type queries: `// ^?` under an expression shows its type.

use async_trait::async_trait;
use vuels_language::lsp_types::{InlayHint, InlayHintKind, InlayHintLabel, Position, Range};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use crate::convert::{ScriptTarget, is_script_document};
use crate::service::ScriptLanguageService;
use crate::shared::TypeScriptLanguageService;

pub const NAME: &str = "typescript-twoslash-queries";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |context: &ServiceContext| {
        PluginInstance::new(TwoslashFeatures {
            context: context.clone(),
        })
    })
}

struct TwoslashFeatures {
    context: ServiceContext,
}

/// A `// ^?` query: the line it sits on and the column of the caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoslashQuery {
    pub line: u32,
    pub column: u32,
}

impl TwoslashQuery {
    /// Position the query asks about: same column, one line up.
    pub fn target(&self) -> Position {
        Position::new(self.line.saturating_sub(1), self.column)
    }
}

/// Finds the queries on lines within `range`.
pub fn find_queries(text: &str, range: Range) -> Vec<TwoslashQuery> {
    text.lines()
        .enumerate()
        .map(|(line, content)| (line as u32, content))
        .filter(|(line, _)| *line >= range.start.line && *line <= range.end.line && *line > 0)
        .filter_map(|(line, content)| {
            let body = content.trim_start().strip_prefix("//")?;
            let caret = body.find("^?")?;
            body[..caret].trim().is_empty().then(|| {
                let column = content.len() - body.len() + caret;
                TwoslashQuery {
                    line,
                    column: content[..column].encode_utf16().count() as u32,
                }
            })
        })
        .collect()
}

#[async_trait]
impl PluginFeatures for TwoslashFeatures {
    async fn provide_inlay_hints(
        &self,
        document: &TextDocument,
        range: Range,
    ) -> ServiceResult<Vec<InlayHint>> {
        if !is_script_document(document) {
            return Ok(Vec::new());
        }
        let Some(service) = self.context.inject::<TypeScriptLanguageService>() else {
            return Ok(Vec::new());
        };
        let target = ScriptTarget::resolve(&self.context, document);

        let mut hints = Vec::new();
        for query in find_queries(&document.text, range) {
            let offset = document.offset_at(query.target()) as u32;
            let Some(info) = service.quick_info_at_position(&target.file_name, offset) else {
                continue;
            };
            let line_len = document
                .text
                .lines()
                .nth(query.line as usize)
                .map_or(0, |l| l.encode_utf16().count() as u32);
            hints.push(InlayHint {
                position: Position::new(query.line, line_len),
                label: InlayHintLabel::String(info.display.replace(['\r', '\n'], " ")),
                kind: Some(InlayHintKind::TYPE),
                text_edits: None,
                tooltip: None,
                padding_left: Some(true),
                padding_right: None,
                data: None,
            });
        }
        Ok(hints)
    }
}
