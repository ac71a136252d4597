//! GET /repository/{id}/files/{path}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

pub async fn file_content(
    State(state): State<Arc<AppState>>,
    Path((id, path)): Path<(String, String)>,
) -> AppResult<Response> {
    let handle = state.registry.get(&id).await?;
    let bytes = handle.file_content(&path)?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response())
}
