use std::path::PathBuf;

use thiserror::Error;

/// Every failure the library can surface. Nothing is recovered locally; the
/// caller decides whether the run is over.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("weights file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed weights file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },
}

impl ClassifierError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClassifierError::InvalidArgument(msg.into())
    }

    pub(crate) fn shape(expected: impl ToString, found: impl ToString) -> Self {
        ClassifierError::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
