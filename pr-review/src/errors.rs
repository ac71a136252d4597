//! Crate-wide error hierarchy for `pr-review`.

use repo_core::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrReviewError>;

/// §4.10 PRReviewPipeline / §4.11 failure modes.
#[derive(Debug, Error)]
pub enum PrReviewError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error(transparent)]
    Llm(#[from] llm_client::LlmError),

    #[error(transparent)]
    RepoCore(#[from] repo_core::RepoCoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl PrReviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrReviewError::InvalidInput(_) => ErrorKind::InvalidInput,
            PrReviewError::NotFound(_) => ErrorKind::NotFound,
            PrReviewError::Unsupported(_) => ErrorKind::Unsupported,
            PrReviewError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            PrReviewError::Llm(e) => e.kind(),
            PrReviewError::RepoCore(e) => e.kind(),
            PrReviewError::Io(_) => ErrorKind::Internal,
            PrReviewError::Yaml(_) => ErrorKind::Internal,
            PrReviewError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<reqwest::Error> for PrReviewError {
    fn from(e: reqwest::Error) -> Self {
        PrReviewError::ProviderUnavailable(e.to_string())
    }
}
