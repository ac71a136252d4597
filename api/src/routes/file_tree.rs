//! GET /repository/{id}/file-tree

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use repo_core::FileTreeEntry;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

pub async fn file_tree(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FileTreeEntry>>> {
    let handle = state.registry.get(&id).await?;
    Ok(Json(handle.file_tree()?))
}
