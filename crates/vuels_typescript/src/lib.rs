//! # vuels_typescript
//!
//! Scripting engine integration for vuels.
//!
//! This crate provides:
//! - The engine request interface ([`ScriptLanguageService`], [`ScriptEngine`])
//! - [`SharedLanguageService`], the decoratable handle published under the
//!   `typescript/languageService` capability
//! - The scripting plugin bundle (semantic, syntactic, doc-comment template,
//!   directive comments) and inline type queries
//!
//! ## Decoration
//!
//! The semantic plugin wraps the engine's service in a
//! [`SharedLanguageService`] before publishing it. Other crates extend the
//! service through [`SharedLanguageService::decorate`]; every holder of the
//! handle then sees the extended behaviour.

pub mod convert;
pub mod plugins;
mod service;
mod shared;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use plugins::create_typescript_plugins;
pub use service::{
    CompletionEntry, CompletionInfo, DefinitionInfo, DiagnosticCategory, PropertyAccess,
    QuickInfo, ReferenceEntry, ResolvedType, ScriptDiagnostic, ScriptEngine,
    ScriptLanguageService, TextSpan, TypeMember, TypeSegment,
};
pub use shared::{SharedLanguageService, TypeScriptLanguageService};
