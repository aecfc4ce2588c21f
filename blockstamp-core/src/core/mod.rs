//! Internal domain modules for the Blockstamp core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod block;
pub mod change_log;
pub mod error;
pub mod event;
pub mod format_tokens;
pub mod host;
pub mod outline;
pub mod pattern;
pub mod plugin;
pub mod rewriter;
pub mod settings;
pub mod storage;
pub mod time_format;
