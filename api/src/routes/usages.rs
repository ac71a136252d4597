//! GET /repository/{id}/usages?symbol_name=&symbol_type=&file_path=

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use symbol_index::SymbolUsage;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;
use crate::routes::symbols::parse_symbol_type;

#[derive(Debug, Deserialize)]
pub struct UsagesParams {
    pub symbol_name: String,
    pub symbol_type: Option<String>,
    pub file_path: Option<String>,
}

pub async fn usages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<UsagesParams>,
) -> AppResult<Json<Vec<SymbolUsage>>> {
    let handle = state.registry.get(&id).await?;
    let wanted = params.symbol_type.as_deref().map(parse_symbol_type).transpose()?;

    let mut usages = state.symbols.find_usages(&handle, &params.symbol_name, wanted)?;
    if let Some(path) = &params.file_path {
        usages.retain(|u| &u.file == path);
    }
    Ok(Json(usages))
}
