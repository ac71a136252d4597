//! POST /repository, DELETE /repository/{id}.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct OpenRepositoryRequest {
    pub path_or_url: String,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    #[allow(dead_code)]
    pub github_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenRepositoryResponse {
    pub id: String,
}

pub async fn open_repository(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenRepositoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OpenRepositoryResponse>>)> {
    if req.path_or_url.trim().is_empty() {
        return Err(AppError::bad_request("path_or_url must not be empty"));
    }
    let id = state.registry.add(&req.path_or_url, req.git_ref.as_deref());
    // Touch the handle now so a malformed source fails at open time, not on
    // the first use of the id.
    state.registry.get(&id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(OpenRepositoryResponse { id })),
    ))
}

pub async fn delete_repository(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.registry.contains(&id) {
        return Err(AppError::new(repo_core::ErrorKind::NotFound, "repository not found"));
    }
    state.registry.delete(&id);
    Ok(StatusCode::NO_CONTENT)
}
