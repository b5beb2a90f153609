//! Translation between documents and the engine's view of them.

use vuels_language::lsp_types::{DiagnosticSeverity, Position, Range, Url};
use vuels_language::{
    CodeInformation, ServiceContext, ServiceResult, SourceScript, TextDocument,
    TypeScriptEnvironment, offset_to_range,
};

use crate::service::{DiagnosticCategory, TextSpan};

/// Language ids the engine analyses directly.
pub const SCRIPT_LANGUAGE_IDS: &[&str] = &[
    "typescript",
    "javascript",
    "typescriptreact",
    "javascriptreact",
];

/// Returns `true` if the engine analyses the document as a script.
pub fn is_script_document(document: &TextDocument) -> bool {
    SCRIPT_LANGUAGE_IDS.contains(&document.language_id.as_str())
}

/// Text of the line containing `position`, up to `position`.
pub fn line_prefix(document: &TextDocument, position: Position) -> &str {
    let offset = document.offset_at(position);
    let line_start = document.text[..offset].rfind('\n').map_or(0, |i| i + 1);
    &document.text[line_start..offset]
}

/// Text of the line containing `position`, from `position` on.
pub fn line_suffix(document: &TextDocument, position: Position) -> &str {
    let offset = document.offset_at(position);
    let line_end = document.text[offset..]
        .find('\n')
        .map_or(document.text.len(), |i| offset + i);
    &document.text[offset..line_end]
}

fn typescript_env(context: &ServiceContext) -> TypeScriptEnvironment {
    context
        .env()
        .typescript
        .clone()
        .unwrap_or_else(TypeScriptEnvironment::file_urls)
}

/// Engine file name of a document.
pub fn file_name_of(context: &ServiceContext, uri: &Url) -> String {
    (typescript_env(context).uri_to_file_name)(uri)
}

/// Document identifier of an engine file name.
pub fn uri_of(context: &ServiceContext, file_name: &str) -> ServiceResult<Url> {
    (typescript_env(context).file_name_to_uri)(file_name)
}

/// A document resolved against the language registry.
#[derive(Debug, Clone)]
pub struct ScriptTarget {
    pub file_name: String,
    pub script: SourceScript,
}

impl ScriptTarget {
    /// Resolves the document, falling back to its own text when it is not
    /// registered.
    pub fn resolve(context: &ServiceContext, document: &TextDocument) -> Self {
        let script = context
            .language()
            .get(&document.uri)
            .unwrap_or_else(|| SourceScript {
                id: document.uri.clone(),
                language_id: document.language_id.clone(),
                snapshot: document.text.as_str().into(),
                generated: None,
            });
        Self {
            file_name: file_name_of(context, &document.uri),
            script,
        }
    }

    /// Returns `true` if the engine sees generated code for this document.
    pub fn is_generated(&self) -> bool {
        self.script.generated.is_some()
    }

    /// Maps a source offset into the engine's coordinates.
    pub fn to_generated(
        &self,
        offset: u32,
        filter: impl Fn(&CodeInformation) -> bool,
    ) -> Option<u32> {
        to_generated_offset(&self.script, offset, filter)
    }

    /// Maps an engine span back to a source range.
    pub fn to_source_range(
        &self,
        span: TextSpan,
        filter: impl Fn(&CodeInformation) -> bool,
    ) -> Option<Range> {
        to_source_range(&self.script, span, filter)
    }
}

/// Maps a source offset into generated coordinates; identity for plain scripts.
pub fn to_generated_offset(
    script: &SourceScript,
    offset: u32,
    filter: impl Fn(&CodeInformation) -> bool,
) -> Option<u32> {
    match &script.generated {
        Some(generated) => generated
            .root()
            .to_generated_offsets(offset)
            .find(|(_, mapping)| filter(&mapping.data))
            .map(|(generated, _)| generated),
        None => Some(offset),
    }
}

/// Maps an engine span to a source range; `None` when it has no source.
pub fn to_source_range(
    script: &SourceScript,
    span: TextSpan,
    filter: impl Fn(&CodeInformation) -> bool,
) -> Option<Range> {
    let (start, length) = match &script.generated {
        Some(generated) => {
            let (start, length, data) = generated.root().to_source_span(span.start, span.length)?;
            if !filter(&data) {
                return None;
            }
            (start, length)
        }
        None => (span.start, span.length),
    };
    offset_to_range(start as usize, (start + length) as usize, &script.snapshot)
}

pub fn severity(category: DiagnosticCategory) -> DiagnosticSeverity {
    match category {
        DiagnosticCategory::Error => DiagnosticSeverity::ERROR,
        DiagnosticCategory::Warning => DiagnosticSeverity::WARNING,
        DiagnosticCategory::Suggestion => DiagnosticSeverity::HINT,
        DiagnosticCategory::Message => DiagnosticSeverity::INFORMATION,
    }
}
