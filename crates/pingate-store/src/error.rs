//! Error types for the storage layer.

use pingate_protocol::ProtocolError;

/// Errors that can occur while loading or saving persisted state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading, writing, or renaming a file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A file exists but doesn't parse (hand-edit gone wrong, or a
    /// partial write from before atomic writes were used).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
