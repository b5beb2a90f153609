//! Style sheet checks: unbalanced braces and rule folding.

use async_trait::async_trait;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{Diagnostic, DiagnosticSeverity, FoldingRange, FoldingRangeKind};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::is_vue_document;

pub const NAME: &str = "css";

const STYLE_LANGUAGE_IDS: &[&str] = &["css", "scss", "less"];

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| PluginInstance::new(CssFeatures))
}

struct CssFeatures;

/// Brace structure of a style sheet, in byte offsets.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BraceScan {
    /// Matched `{`/`}` pairs.
    pub blocks: Vec<(usize, usize)>,
    /// `}` without an opening brace.
    pub unopened: Vec<usize>,
    /// `{` never closed.
    pub unclosed: Vec<usize>,
}

/// Scans braces, skipping comments and string literals.
pub fn scan_braces(source: &str) -> BraceScan {
    let bytes = source.as_bytes();
    let mut scan = BraceScan::default();
    let mut stack = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = source[i + 2..].find("*/").map_or(bytes.len(), |end| i + 2 + end + 2);
                continue;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
            }
            b'{' => stack.push(i),
            b'}' => match stack.pop() {
                Some(open) => scan.blocks.push((open, i)),
                None => scan.unopened.push(i),
            },
            _ => {}
        }
        i += 1;
    }

    scan.unclosed = stack;
    scan.blocks.sort_unstable();
    scan
}

/// Style sources of a document with their starting offsets.
fn style_sources(document: &TextDocument) -> Vec<(usize, String)> {
    if STYLE_LANGUAGE_IDS.contains(&document.language_id.as_str()) {
        return vec![(0, document.text.clone())];
    }
    if !is_vue_document(document) {
        return Vec::new();
    }
    parse_sfc(&document.text)
        .styles
        .into_iter()
        .map(|block| (block.start as usize, block.content))
        .collect()
}

#[async_trait]
impl PluginFeatures for CssFeatures {
    async fn provide_diagnostics(&self, document: &TextDocument) -> ServiceResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for (base, source) in style_sources(document) {
            let scan = scan_braces(&source);
            let problems = scan
                .unopened
                .iter()
                .map(|&o| (o, "Unexpected '}'"))
                .chain(scan.unclosed.iter().map(|&o| (o, "'{' is never closed")));
            for (offset, message) in problems {
                let Some(range) = document.range_of(base + offset, base + offset + 1) else {
                    continue;
                };
                diagnostics.push(Diagnostic {
                    range,
                    severity: Some(DiagnosticSeverity::ERROR),
                    source: Some(NAME.to_string()),
                    message: message.to_string(),
                    ..Default::default()
                });
            }
        }
        Ok(diagnostics)
    }

    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
    ) -> ServiceResult<Vec<FoldingRange>> {
        let mut ranges = Vec::new();
        for (base, source) in style_sources(document) {
            for (open, close) in scan_braces(&source).blocks {
                let (Some(start), Some(end)) = (
                    document.position_at(base + open),
                    document.position_at(base + close),
                ) else {
                    continue;
                };
                if end.line > start.line {
                    ranges.push(FoldingRange {
                        start_line: start.line,
                        end_line: end.line - 1,
                        kind: Some(FoldingRangeKind::Region),
                        ..Default::default()
                    });
                }
            }
        }
        Ok(ranges)
    }
}
