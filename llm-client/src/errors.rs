//! Crate-wide error hierarchy for `llm-client`.

use repo_core::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

/// §4.3 LLMClient / §4.4 Summarizer failure modes.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("provider refused: {0}")]
    Blocked(String),

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("estimated input tokens ({estimated}) exceed ceiling ({ceiling})")]
    PromptTooLarge { estimated: usize, ceiling: usize },

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    RepoCore(#[from] repo_core::RepoCoreError),

    #[error(transparent)]
    SymbolIndex(#[from] symbol_index::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            LlmError::Blocked(_) => ErrorKind::ProviderRefused,
            LlmError::EmptyResponse => ErrorKind::EmptyResponse,
            LlmError::PromptTooLarge { .. } => ErrorKind::PromptTooLarge,
            LlmError::SymbolNotFound(_) => ErrorKind::NotFound,
            LlmError::InvalidInput(_) => ErrorKind::InvalidInput,
            LlmError::RepoCore(e) => e.kind(),
            LlmError::SymbolIndex(e) => e.kind(),
            LlmError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::ProviderUnavailable(e.to_string())
    }
}
