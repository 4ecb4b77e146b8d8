//! Error types.

use thiserror::Error;

/// Errors produced while configuring a predictor.
///
/// These only occur before any table is allocated. A predictor is never
/// returned in a partially-initialized state.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown predictor strategy '{0}'")]
    UnknownStrategy(String),

    #[error("{name} must be between 1 and {max} bits (got {bits})")]
    InvalidWidth { name: &'static str, bits: usize, max: usize },

    #[error("{name} must be a non-zero power of two (got {value})")]
    NotPowerOfTwo { name: &'static str, value: usize },

    #[error("{name} must be at most {max} (got {value})")]
    TooLarge { name: &'static str, value: usize, max: usize },

    #[error("perceptron threshold must be non-negative (got {0})")]
    InvalidThreshold(i32),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced while reading a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}
