//! # vuels_language
//!
//! Language service plugin contract for vuels.
//!
//! This crate provides:
//! - Text documents with UTF-16 position conversion
//! - The service environment and its document-identifier mappers
//! - The language registry (source scripts, virtual code, source mappings)
//! - A typed capability registry for values plugins provide to each other
//! - The `LanguageServicePlugin` factory contract and its feature hooks
//!
//! ## Architecture
//!
//! A hosting runtime owns an ordered list of [`LanguageServicePlugin`]s.
//! Each plugin is a named factory; the runtime creates one [`PluginInstance`]
//! per session and registers the instance's capability map with the
//! [`ServiceContext`], so later plugins can [`ServiceContext::inject`] what
//! earlier plugins provide.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vuels_language::{LanguageServicePlugin, PluginInstance, ServiceContext};
//!
//! let plugin = LanguageServicePlugin::new("my-plugin", |_ctx: &ServiceContext| {
//!     PluginInstance::new(MyFeatures)
//! });
//! let instance = plugin.create(&context);
//! ```

mod capability;
mod context;
mod document;
mod environment;
mod error;
mod mapping;
mod plugin;
mod registry;

pub use capability::{Capability, CapabilityMap};
pub use context::ServiceContext;
pub use document::{TextDocument, offset_to_position, offset_to_range, positions_le};
pub use environment::{FileIdMapper, ServiceEnvironment, TypeScriptEnvironment};
pub use error::{ServiceError, ServiceResult};
pub use mapping::{CodeInformation, Mapping, VirtualCode};
pub use plugin::{
    AutoInsertChange, DocumentDropEdit, DropItem, LanguageServicePlugin, PluginFactory,
    PluginFeatures, PluginInstance,
};
pub use registry::{
    GeneratedCode, LanguagePlugin, LanguageRegistry, SourceScript, TypeScriptSupport,
};

/// Re-exported LSP data types used throughout the feature hooks.
pub use lsp_types;
