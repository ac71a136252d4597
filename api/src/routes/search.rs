//! GET /repository/{id}/search?q=&pattern=

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use repo_core::{SearchEngine, SearchHit, SearchOptions};
use serde::Deserialize;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub pattern: Option<String>,
    pub regex: Option<bool>,
    pub case_sensitive: Option<bool>,
    pub max_results: Option<usize>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let handle = state.registry.get(&id).await?;
    let opts = SearchOptions {
        regex: params.regex.unwrap_or(false),
        case_sensitive: params.case_sensitive.unwrap_or(true),
        include_globs: params.pattern.into_iter().collect(),
        max_results: params.max_results.unwrap_or(1000),
    };
    let hits = SearchEngine::search(&handle, &params.q, &opts)?;
    Ok(Json(hits))
}
