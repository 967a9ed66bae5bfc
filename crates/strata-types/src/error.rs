use thiserror::Error;

/// Errors produced by foundation type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}
