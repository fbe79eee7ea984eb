//! Error types for pixmorph-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] pixmorph_core::Error),

    /// Unsupported pixel depth for this operation
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A derived representation was requested before its source exists
    #[error("missing data: {0} not generated")]
    MissingData(&'static str),

    /// Malformed serialized border data
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// I/O error while reading or writing serialized data
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
