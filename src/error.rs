//! Error types for log compression.

use thiserror::Error;

/// Errors surfaced by the compressor.
///
/// The compression itself is total over text input; the only failures are
/// reading the input and constructing a compressor from a bad [`Config`].
///
/// [`Config`]: crate::Config
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input source could not be read.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CompressError>;
