//! # vuels_ts_plugin
//!
//! Component-aware extension of the scripting engine.
//!
//! This crate provides:
//! - [`decorate_language_service_for_vue`], which adds component knowledge to
//!   a live language service exactly once
//! - The component request handlers in [`requests`]
//! - [`TsPluginClient`], the async facade the language-service plugins use,
//!   with an in-process [`EmbeddedClient`] and a [`remote::RemoteClient`]
//!   for hybrid mode
//!
//! ## Example
//!
//! ```rust,ignore
//! use vuels_ts_plugin::{EmbeddedClient, TsPluginClient};
//!
//! let client = EmbeddedClient::new(context);
//! let names = client.get_component_names("/work/App.vue").await?;
//! ```

mod client;
mod component;
mod context;
mod decorate;
mod error;
pub mod remote;
pub mod requests;

pub use client::{EmbeddedClient, Handler, Handlers, TsPluginClient, dispatch};
pub use context::RequestContext;
pub use decorate::{DECORATION_TAG, VueLanguageService, decorate_language_service_for_vue};
pub use error::{RequestError, RequestResult};
pub use requests::{ComponentProp, ExtractPropCandidate};
