//! Text documents and LSP position conversion.

use lsp_types::{Position, Range, Url};

/// A snapshot of an open document as seen by the plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    pub uri: Url,
    pub language_id: String,
    pub version: i32,
    pub text: String,
}

impl TextDocument {
    /// Creates a new document snapshot.
    pub fn new(
        uri: Url,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri,
            language_id: language_id.into(),
            version,
            text: text.into(),
        }
    }

    /// Converts a byte offset to an LSP position.
    pub fn position_at(&self, offset: usize) -> Option<Position> {
        offset_to_position(offset, &self.text)
    }

    /// Converts an LSP position to a byte offset.
    ///
    /// Characters past the end of a line clamp to the line end, and lines
    /// past the end of the document clamp to the document end.
    pub fn offset_at(&self, position: Position) -> usize {
        let mut line = 0u32;
        let mut line_start = 0usize;

        if position.line > 0 {
            for (i, b) in self.text.bytes().enumerate() {
                if b == b'\n' {
                    line += 1;
                    if line == position.line {
                        line_start = i + 1;
                        break;
                    }
                }
            }
            if line < position.line {
                return self.text.len();
            }
        }

        let mut col = 0u32;
        let mut offset = line_start;
        for ch in self.text[line_start..].chars() {
            if ch == '\n' || col >= position.character {
                break;
            }
            col += ch.len_utf16() as u32;
            offset += ch.len_utf8();
        }
        offset
    }

    /// Converts a byte range to an LSP range.
    pub fn range_of(&self, start: usize, end: usize) -> Option<Range> {
        offset_to_range(start, end, &self.text)
    }

    /// Returns the file extension of the document URI, lowercased.
    pub fn extension(&self) -> Option<String> {
        let path = self.uri.path();
        let name = path.rsplit('/').next()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }
}

/// Converts byte offsets to an LSP range.
pub fn offset_to_range(start: usize, end: usize, text: &str) -> Option<Range> {
    let start_pos = offset_to_position(start, text)?;
    let end_pos = offset_to_position(end, text)?;
    Some(Range::new(start_pos, end_pos))
}

/// Converts a byte offset to an LSP position.
pub fn offset_to_position(offset: usize, text: &str) -> Option<Position> {
    if offset > text.len() {
        return None;
    }

    let mut line = 0u32;
    let mut col = 0u32;
    let mut current_offset = 0;

    for ch in text.chars() {
        if current_offset >= offset {
            break;
        }

        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += ch.len_utf16() as u32;
        }

        current_offset += ch.len_utf8();
    }

    Some(Position::new(line, col))
}

/// Helper to compare Positions (p1 <= p2)
pub fn positions_le(p1: Position, p2: Position) -> bool {
    p1.line < p2.line || (p1.line == p2.line && p1.character <= p2.character)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new(
            Url::parse("file:///tmp/App.vue").unwrap(),
            "vue",
            1,
            text,
        )
    }

    #[rstest]
    #[case("Hello World", 0, Some((0, 0)))]
    #[case("Hello World", 5, Some((0, 5)))]
    #[case("Hello World", 11, Some((0, 11)))]
    #[case("Hello World", 12, None)]
    #[case("Line 1\nLine 2\nLine 3", 7, Some((1, 0)))]
    #[case("Line 1\nLine 2\nLine 3", 20, Some((2, 6)))]
    // 4 bytes in UTF-8, 2 code units in UTF-16
    #[case("a\u{1F389}b", 1, Some((0, 1)))]
    #[case("a\u{1F389}b", 5, Some((0, 3)))]
    fn test_offset_to_position(
        #[case] text: &str,
        #[case] offset: usize,
        #[case] expected: Option<(u32, u32)>,
    ) {
        let expected = expected.map(|(line, character)| Position::new(line, character));
        assert_eq!(offset_to_position(offset, text), expected);
    }

    #[test]
    fn test_offset_at_inverts_position_at() {
        let d = doc("<template>\n  <Foo />\n</template>");
        for offset in [0usize, 5, 11, 14, 21, d.text.len()] {
            let pos = d.position_at(offset).unwrap();
            assert_eq!(d.offset_at(pos), offset, "offset {offset}");
        }
    }

    #[test]
    fn test_offset_at_clamps() {
        let d = doc("ab\ncd");
        assert_eq!(d.offset_at(Position::new(0, 99)), 2);
        assert_eq!(d.offset_at(Position::new(9, 0)), 5);
    }

    #[test]
    fn test_offset_at_utf16() {
        let d = doc("\u{3042}\u{3044}x");
        assert_eq!(d.offset_at(Position::new(0, 2)), 6);
    }

    #[test]
    fn test_extension() {
        assert_eq!(doc("").extension().as_deref(), Some("vue"));
    }

    #[test]
    fn test_positions_le() {
        assert!(positions_le(Position::new(0, 5), Position::new(0, 10)));
        assert!(!positions_le(Position::new(2, 5), Position::new(1, 0)));
        assert!(positions_le(Position::new(0, 5), Position::new(0, 5)));
    }
}
