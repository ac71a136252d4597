//! Crate-wide error hierarchy for `repo-core`.

use thiserror::Error;

/// Transport-agnostic error classification shared across every gateway.
///
/// Gateways (HTTP, stdio) map this enum to their own wire shape; no crate
/// above `repo-core` should invent its own classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Unsupported,
    RefUnresolvable,
    ProviderUnavailable,
    ProviderRefused,
    EmptyResponse,
    PromptTooLarge,
    Internal,
}

pub type Result<T> = std::result::Result<T, RepoCoreError>;

/// Root error type for repository handle, search, and chunking operations.
#[derive(Debug, Error)]
pub enum RepoCoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("Path traversal outside repository root")]
    PathEscape,

    #[error("unable to resolve ref: {0}")]
    RefUnresolvable(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RepoCoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoCoreError::Io(_) => ErrorKind::Internal,
            RepoCoreError::NotFound(_) => ErrorKind::NotFound,
            RepoCoreError::PathEscape => ErrorKind::InvalidInput,
            RepoCoreError::RefUnresolvable(_) => ErrorKind::RefUnresolvable,
            RepoCoreError::Unsupported(_) => ErrorKind::Unsupported,
            RepoCoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            RepoCoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}
