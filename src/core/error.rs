//! Error types for the SMO solver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Numerical failure: {0}")]
    NumericalFailure(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SvmError>;
