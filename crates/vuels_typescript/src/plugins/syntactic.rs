//! Syntax-only features: folding ranges.

use async_trait::async_trait;
use vuels_language::lsp_types::{FoldingRange, FoldingRangeKind};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use crate::convert::is_script_document;

pub const NAME: &str = "typescript-syntactic";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| {
        PluginInstance::new(SyntacticFeatures)
    })
}

struct SyntacticFeatures;

#[async_trait]
impl PluginFeatures for SyntacticFeatures {
    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
    ) -> ServiceResult<Vec<FoldingRange>> {
        if !is_script_document(document) {
            return Ok(Vec::new());
        }
        Ok(folding_ranges(&document.text))
    }
}

fn fold(start_line: u32, end_line: u32, kind: Option<FoldingRangeKind>) -> FoldingRange {
    FoldingRange {
        start_line,
        end_line,
        kind,
        ..Default::default()
    }
}

/// Folding ranges for braces, block comments and `#region` markers.
///
/// Only spans of more than one line fold; a brace range ends on the line
/// before its closing brace.
pub(crate) fn folding_ranges(text: &str) -> Vec<FoldingRange> {
    let mut ranges = Vec::new();
    let mut braces: Vec<u32> = Vec::new();
    let mut regions: Vec<u32> = Vec::new();
    let mut block_comment: Option<u32> = None;
    let mut quote: Option<char> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no as u32;
        let trimmed = line.trim_start();
        if block_comment.is_none() && quote.is_none() {
            if trimmed.starts_with("// #region") {
                regions.push(line_no);
                continue;
            }
            if trimmed.starts_with("// #endregion") {
                if let Some(start) = regions.pop() {
                    ranges.push(fold(start, line_no, Some(FoldingRangeKind::Region)));
                }
                continue;
            }
        }

        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if let Some(start) = block_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    block_comment = None;
                    if line_no > start {
                        ranges.push(fold(start, line_no, Some(FoldingRangeKind::Comment)));
                    }
                }
                continue;
            }
            if let Some(q) = quote {
                if ch == '\\' {
                    chars.next();
                } else if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    block_comment = Some(line_no);
                }
                '"' | '\'' | '`' => quote = Some(ch),
                '{' => braces.push(line_no),
                '}' => {
                    if let Some(start) = braces.pop()
                        && line_no > start + 1
                    {
                        ranges.push(fold(start, line_no - 1, None));
                    }
                }
                _ => {}
            }
        }
        // Only template literals span lines.
        if quote != Some('`') {
            quote = None;
        }
    }

    ranges.sort_by_key(|r| (r.start_line, r.end_line));
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(ranges: &[FoldingRange]) -> Vec<(u32, u32)> {
        ranges.iter().map(|r| (r.start_line, r.end_line)).collect()
    }

    #[test]
    fn test_brace_blocks() {
        let text = "function a() {\n  if (x) {\n    y()\n  }\n}\n";
        assert_eq!(lines(&folding_ranges(text)), vec![(0, 3), (1, 2)]);
    }

    #[test]
    fn test_single_line_blocks_do_not_fold() {
        assert!(folding_ranges("const a = { b: 1 }\n").is_empty());
    }

    #[test]
    fn test_braces_in_strings_and_comments_are_ignored() {
        let text = "const s = '{'\n// {\nfunction f() {\n  return `}\n`\n}\n";
        assert_eq!(lines(&folding_ranges(text)), vec![(2, 4)]);
    }

    #[test]
    fn test_comments_and_regions() {
        let text = "// #region setup\n/*\n * doc\n */\nconst a = 1\n// #endregion\n";
        let ranges = folding_ranges(text);
        assert_eq!(lines(&ranges), vec![(0, 5), (1, 3)]);
        assert_eq!(ranges[0].kind, Some(FoldingRangeKind::Region));
        assert_eq!(ranges[1].kind, Some(FoldingRangeKind::Comment));
    }
}
