//! # vuels_core
//!
//! Component file domain model for vuels.
//!
//! This crate provides:
//! - `VueCompilerOptions` and its discovery from `tsconfig.json`/`jsconfig.json`
//! - A scanner for the top-level blocks of a single-file component
//! - `VueVirtualCode`, the generated code of a component file together with
//!   its template tags
//! - Name casing helpers shared by the template-aware plugins

pub mod casing;
mod config;
mod error;
mod sfc;
mod virtual_code;

pub use config::VueCompilerOptions;
pub use error::ConfigError;
pub use sfc::{Sfc, SfcBlock, parse_sfc};
pub use virtual_code::{
    COMPONENTS_BINDING, CONTEXT_BINDING, ELEMENTS_BINDING, INTERNAL_PREFIX, TemplateTag,
    VueLanguagePlugin, VueVirtualCode,
};
