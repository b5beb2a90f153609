//! Virtual code and source mappings.
//!
//! A component file is split into per-language virtual documents. Each
//! [`VirtualCode`] carries the mappings that relate its generated text back to
//! the source file, so positions can travel in both directions.

use std::sync::Arc;

/// Which features a mapped range participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeInformation {
    pub verification: bool,
    pub completion: bool,
    pub semantic: bool,
    pub navigation: bool,
}

impl CodeInformation {
    /// Every feature enabled.
    pub const ALL: Self = Self {
        verification: true,
        completion: true,
        semantic: true,
        navigation: true,
    };

    /// Every feature disabled; used for ranges that exist only for type checking.
    pub const NONE: Self = Self {
        verification: false,
        completion: false,
        semantic: false,
        navigation: false,
    };
}

impl Default for CodeInformation {
    fn default() -> Self {
        Self::ALL
    }
}

/// A contiguous range shared by the source and the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub source_offset: u32,
    pub generated_offset: u32,
    pub length: u32,
    pub data: CodeInformation,
}

impl Mapping {
    /// Creates a mapping with every feature enabled.
    pub fn new(source_offset: u32, generated_offset: u32, length: u32) -> Self {
        Self {
            source_offset,
            generated_offset,
            length,
            data: CodeInformation::ALL,
        }
    }

    /// Overrides the feature flags.
    pub fn with_data(mut self, data: CodeInformation) -> Self {
        self.data = data;
        self
    }

    fn contains_source(&self, offset: u32) -> bool {
        offset >= self.source_offset && offset <= self.source_offset + self.length
    }

    fn contains_generated(&self, offset: u32) -> bool {
        offset >= self.generated_offset && offset <= self.generated_offset + self.length
    }
}

/// A generated document derived from a source script.
#[derive(Debug, Clone)]
pub struct VirtualCode {
    pub id: String,
    pub language_id: String,
    pub snapshot: Arc<str>,
    pub mappings: Vec<Mapping>,
}

impl VirtualCode {
    /// Creates a virtual code.
    pub fn new(
        id: impl Into<String>,
        language_id: impl Into<String>,
        snapshot: impl Into<Arc<str>>,
        mappings: Vec<Mapping>,
    ) -> Self {
        Self {
            id: id.into(),
            language_id: language_id.into(),
            snapshot: snapshot.into(),
            mappings,
        }
    }

    /// All generated offsets for a source offset, with the mapping that produced each.
    pub fn to_generated_offsets(
        &self,
        source_offset: u32,
    ) -> impl Iterator<Item = (u32, &Mapping)> {
        self.mappings
            .iter()
            .filter(move |m| m.contains_source(source_offset))
            .map(move |m| (m.generated_offset + (source_offset - m.source_offset), m))
    }

    /// The first source offset for a generated offset.
    pub fn to_source_offset(&self, generated_offset: u32) -> Option<(u32, &Mapping)> {
        self.mappings
            .iter()
            .find(|m| m.contains_generated(generated_offset))
            .map(|m| (m.source_offset + (generated_offset - m.generated_offset), m))
    }

    /// Maps a generated span to a source span; both ends must map through
    /// the same mapping.
    pub fn to_source_span(&self, start: u32, length: u32) -> Option<(u32, u32, CodeInformation)> {
        let end = start + length;
        self.mappings
            .iter()
            .find(|m| m.contains_generated(start) && m.contains_generated(end))
            .map(|m| {
                (
                    m.source_offset + (start - m.generated_offset),
                    length,
                    m.data,
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code() -> VirtualCode {
        VirtualCode::new(
            "script_ts",
            "typescript",
            "const __VLS_ctx = {}; foo; bar.baz",
            vec![
                Mapping::new(10, 22, 3),
                Mapping::new(20, 27, 7).with_data(CodeInformation::NONE),
            ],
        )
    }

    #[test]
    fn test_to_generated_offsets() {
        let code = code();
        let hits: Vec<u32> = code.to_generated_offsets(11).map(|(o, _)| o).collect();
        assert_eq!(hits, vec![23]);
        assert_eq!(code.to_generated_offsets(15).count(), 0);
    }

    #[test]
    fn test_end_of_mapping_is_inside() {
        let code = code();
        assert_eq!(code.to_generated_offsets(13).next().map(|(o, _)| o), Some(25));
        assert_eq!(code.to_source_offset(25).map(|(o, _)| o), Some(13));
    }

    #[test]
    fn test_to_source_span_requires_single_mapping() {
        let code = code();
        assert_eq!(code.to_source_span(22, 3), Some((10, 3, CodeInformation::ALL)));
        assert_eq!(code.to_source_span(22, 6), None);
        assert_eq!(code.to_source_span(0, 5), None);
    }
}
