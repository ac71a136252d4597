//! GET /repository/{id}/index

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use symbol_index::IndexResult;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

pub async fn index(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<IndexResult>> {
    let handle = state.registry.get(&id).await?;
    Ok(Json(state.symbols.index(&handle)?))
}
