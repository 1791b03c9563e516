use std::io;

use thiserror::Error;

/// Errors of [`SpillBuffer`](crate::SpillBuffer).
#[derive(Debug, Error)]
pub enum SpillError {
    /// The buffer was finalized and accepts no further writes.
    #[error("spill buffer is finalized")]
    Finalized,
    /// The temporary file could not be created, written or reopened.
    #[error("spill file error: {0}")]
    Io(#[from] io::Error),
}

/// Errors decoding a cached entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// The entry ends before the empty line that closes the header block.
    #[error("cached entry is truncated")]
    Truncated,
    /// The first line is not `<version> <code> [reason]`.
    #[error("malformed status line: {0:?}")]
    StatusLine(String),
    /// A header line is not `name: value`.
    #[error("malformed header line: {0:?}")]
    Header(String),
}
