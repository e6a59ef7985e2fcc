use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("list key must not be empty")]
    EmptyKey,

    #[error("invalid list id: {0}")]
    InvalidId(String),
}
