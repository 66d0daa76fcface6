//! Error types for the huff crate.

use std::io;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, HuffError>;

/// Errors that can occur while compressing or decompressing.
#[derive(Debug, thiserror::Error)]
pub enum HuffError {
    /// Bad magic number or a malformed tree header.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The stream ended before the terminator symbol was decoded.
    #[error("Truncated input: no PSEUDO_EOF before end of stream")]
    TruncatedInput,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HuffError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        HuffError::InvalidFormat(msg.into())
    }
}
