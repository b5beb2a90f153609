//! LSP request/notification handlers.

mod custom;
mod documents;
mod features;
mod files;
pub(crate) mod initialize;

pub use custom::{handle_auto_insert, handle_document_drop};
pub use documents::{handle_did_change, handle_did_close, handle_did_open};
pub use features::{
    handle_code_action, handle_code_lens, handle_completion, handle_definition,
    handle_document_symbol, handle_folding_range, handle_formatting, handle_hover,
    handle_inlay_hint, handle_references,
};
pub use files::handle_did_change_watched_files;
pub use initialize::{handle_initialize, handle_initialized, handle_shutdown};
