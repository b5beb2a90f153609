//! # vuels_service
//!
//! The composed language service for Vue single-file components.
//!
//! [`create_vue_service_plugins`] assembles the ordered plugin list a hosting
//! runtime serves: the scripting bundle (with its semantic plugin extended
//! for component files), followed by the style, data, template and
//! component-specific plugins. Template-aware plugins ask component questions
//! through a [`TsPluginClient`](vuels_ts_plugin::TsPluginClient), obtained
//! from [`create_default_get_ts_plugin_client`] or supplied by the caller in
//! hybrid mode.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vuels_core::VueCompilerOptions;
//! use vuels_service::create_vue_service_plugins;
//!
//! let plugins = create_vue_service_plugins(
//!     engine,
//!     Arc::new(VueCompilerOptions::resolve),
//!     None,
//!     false,
//! );
//! ```

mod client;
mod compose;
pub mod plugins;

pub use client::{GetTsPluginClient, create_default_get_ts_plugin_client};
pub use compose::{GetVueOptions, create_vue_service_plugins};
