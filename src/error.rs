use std::io;
use thiserror::Error;

/// Error type for encoding detection operations.
#[derive(Error, Debug)]
pub enum CharlockError {
    /// IO error while reading a sample.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed call or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The given name does not resolve to a supported encoding.
    #[error("Unsupported encoding name: {0}")]
    UnsupportedEncodingName(String),
}

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, CharlockError>;
