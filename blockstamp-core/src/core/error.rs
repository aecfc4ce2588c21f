//! Error types for the Blockstamp core library.

use thiserror::Error;

/// All errors that can occur within the Blockstamp core library.
#[derive(Debug, Error)]
pub enum BlockstampError {
    /// The host has not loaded plugin settings yet.
    #[error("Settings unavailable: host has not finished initialising")]
    SettingsUnavailable,

    /// A block ID was requested that the host cannot resolve.
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    /// A host editing call failed.
    #[error("Host error: {0}")]
    Host(String),

    /// A move would place a block inside its own subtree.
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    /// A SQLite operation in the outline store failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The opened file is not a valid Blockstamp outline store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings or stored block data could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`BlockstampError`].
pub type Result<T> = std::result::Result<T, BlockstampError>;

impl BlockstampError {
    /// Returns a short, human-readable message suitable for the host's
    /// diagnostic channel.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::SettingsUnavailable => "Timestamp settings are not loaded yet".to_string(),
            Self::BlockNotFound(_) => "Block no longer exists".to_string(),
            Self::Host(msg) => format!("Editor error: {msg}"),
            Self::InvalidMove(msg) => msg.clone(),
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::InvalidStore(_) => "Could not open outline file".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
