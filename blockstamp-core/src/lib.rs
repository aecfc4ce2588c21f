//! Core library for Blockstamp, which prefixes outline blocks with timestamps.
//!
//! The stamping rule lives in [`rewrite`], built on the format-to-regex
//! compiler [`compile_matcher`]. [`TimestampPlugin`] drives that rule against
//! any editor implementing [`Host`]; [`OutlineStore`] is a SQLite-backed host
//! for embedding and testing.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    block::{Block, PropertyValue, TEMPLATE_PROPERTY},
    change_log::ChangeLog,
    error::{BlockstampError, Result},
    event::{ChangeEvent, ChangeKind},
    format_tokens::{tokenize, FormatPiece, Token},
    host::Host,
    outline::OutlineStore,
    pattern::{compile_matcher, matcher_source, TimestampMatcher},
    plugin::{Command, CommandDescriptor, TimestampPlugin, Trigger},
    rewriter::{analyze, resolve_format, rewrite, BlockAnalysis, DEFAULT_FORMAT},
    settings::{
        load_settings, save_settings, settings_file_path, PluginSettings, DEFAULT_KEYBINDING,
    },
    storage::Storage,
    time_format::{render, Clock, FixedClock, SystemClock},
};
