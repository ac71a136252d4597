//! Crate-wide error hierarchy for `toolcall`.
//!
//! Every inner crate error is translated to `ToolError` at this boundary
//! only, mirroring `api::error_handler` (§4.8) for the stdio front end
//! (§4.9): unknown tools and schema violations are `InvalidParams`, any
//! other exception is `InternalError` — everything else keeps its `kind()`
//! and rides back on the tool-result channel as `{code, message}` so the
//! calling LLM can see and react to it.

use repo_core::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    RepoCore(#[from] repo_core::RepoCoreError),

    #[error(transparent)]
    SymbolIndex(#[from] symbol_index::Error),

    #[error(transparent)]
    HandleRegistry(#[from] handle_registry::Error),

    #[error(transparent)]
    Llm(#[from] llm_client::LlmError),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::RepoCore(e) => e.kind(),
            ToolError::SymbolIndex(e) => e.kind(),
            ToolError::HandleRegistry(e) => e.kind(),
            ToolError::Llm(e) => e.kind(),
            ToolError::Unsupported(_) => ErrorKind::Unsupported,
            ToolError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidInput => "INVALID_PARAMS",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unsupported => "UNSUPPORTED",
            ErrorKind::RefUnresolvable => "REF_UNRESOLVABLE",
            ErrorKind::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorKind::ProviderRefused => "PROVIDER_REFUSED",
            ErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            ErrorKind::PromptTooLarge => "PROMPT_TOO_LARGE",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}
