//! §4.8 Gateway-HTTP error mapping — every inner crate error is translated
//! to `AppError` at this boundary only; handlers never match on HTTP status
//! themselves.

use axum::{http::StatusCode, response::Response};
use repo_core::ErrorKind;

use crate::core::http::response_envelope::ApiResponse;

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unsupported => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::RefUnresolvable => StatusCode::BAD_REQUEST,
            ErrorKind::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::ProviderRefused => StatusCode::BAD_GATEWAY,
            ErrorKind::EmptyResponse => StatusCode::BAD_GATEWAY,
            ErrorKind::PromptTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unsupported => "UNSUPPORTED",
            ErrorKind::RefUnresolvable => "REF_UNRESOLVABLE",
            ErrorKind::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorKind::ProviderRefused => "PROVIDER_REFUSED",
            ErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            ErrorKind::PromptTooLarge => "PROMPT_TOO_LARGE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.kind == ErrorKind::Internal {
            tracing::error!(message = %self.message, "internal error");
        }
        let status = self.status();
        let envelope = ApiResponse::<()>::error(self.code(), self.message.clone(), Vec::new());
        envelope.into_response_with_status(status)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<repo_core::RepoCoreError> for AppError {
    fn from(e: repo_core::RepoCoreError) -> Self {
        AppError::new(e.kind(), e.to_string())
    }
}

impl From<symbol_index::Error> for AppError {
    fn from(e: symbol_index::Error) -> Self {
        AppError::new(e.kind(), e.to_string())
    }
}

impl From<handle_registry::Error> for AppError {
    fn from(e: handle_registry::Error) -> Self {
        AppError::new(e.kind(), e.to_string())
    }
}

impl From<llm_client::LlmError> for AppError {
    fn from(e: llm_client::LlmError) -> Self {
        AppError::new(e.kind(), e.to_string())
    }
}
