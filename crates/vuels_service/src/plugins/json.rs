//! JSON validation for data documents and JSON custom blocks.

use async_trait::async_trait;
use jsonc_parser::ParseOptions;
use vuels_core::parse_sfc;
use vuels_language::lsp_types::{Diagnostic, DiagnosticSeverity};
use vuels_language::{
    LanguageServicePlugin, PluginFeatures, PluginInstance, ServiceContext, ServiceResult,
    TextDocument,
};

use super::is_vue_document;

pub const NAME: &str = "json";

pub fn create() -> LanguageServicePlugin {
    LanguageServicePlugin::new(NAME, |_context: &ServiceContext| PluginInstance::new(JsonFeatures))
}

struct JsonFeatures;

/// Which JSON dialect a source is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Json,
    /// Comments and trailing commas allowed.
    Jsonc,
}

impl Dialect {
    fn from_language(language: &str) -> Option<Self> {
        match language {
            "json" => Some(Self::Json),
            "jsonc" | "json5" => Some(Self::Jsonc),
            _ => None,
        }
    }
}

/// A syntax error: byte range within the source and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

/// Validates `source`, returning the first syntax error.
pub fn validate(source: &str, dialect: Dialect) -> Option<SyntaxError> {
    match dialect {
        Dialect::Json => {
            let e = serde_json::from_str::<serde_json::Value>(source).err()?;
            let line_start: usize = source
                .split_inclusive('\n')
                .take(e.line().saturating_sub(1))
                .map(str::len)
                .sum();
            let start = (line_start + e.column().saturating_sub(1)).min(source.len());
            Some(SyntaxError {
                start,
                end: (start + 1).min(source.len()),
                message: e.to_string(),
            })
        }
        Dialect::Jsonc => {
            let e = jsonc_parser::parse_to_serde_value(source, &ParseOptions::default()).err()?;
            let range = e.range();
            Some(SyntaxError {
                start: range.start,
                end: range.end.max(range.start),
                message: e.to_string(),
            })
        }
    }
}

/// JSON sources of a document: offset, text and dialect.
fn json_sources(document: &TextDocument) -> Vec<(usize, String, Dialect)> {
    if let Some(dialect) = Dialect::from_language(&document.language_id) {
        return vec![(0, document.text.clone(), dialect)];
    }
    if !is_vue_document(document) {
        return Vec::new();
    }
    parse_sfc(&document.text)
        .custom_blocks
        .into_iter()
        .filter_map(|block| {
            let dialect = Dialect::from_language(block.lang.as_deref()?)?;
            Some((block.start as usize, block.content, dialect))
        })
        .collect()
}

#[async_trait]
impl PluginFeatures for JsonFeatures {
    async fn provide_diagnostics(&self, document: &TextDocument) -> ServiceResult<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        for (base, source, dialect) in json_sources(document) {
            if source.trim().is_empty() {
                continue;
            }
            let Some(error) = validate(&source, dialect) else {
                continue;
            };
            let Some(range) = document.range_of(base + error.start, base + error.end) else {
                continue;
            };
            diagnostics.push(Diagnostic {
                range,
                severity: Some(DiagnosticSeverity::ERROR),
                source: Some(NAME.to_string()),
                message: error.message,
                ..Default::default()
            });
        }
        Ok(diagnostics)
    }
}
