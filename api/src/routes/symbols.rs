//! GET /repository/{id}/symbols?file_path=&symbol_type=

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use symbol_index::{Symbol, SymbolType};

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SymbolsParams {
    pub file_path: Option<String>,
    pub symbol_type: Option<String>,
}

pub async fn symbols(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SymbolsParams>,
) -> AppResult<Json<Vec<Symbol>>> {
    let handle = state.registry.get(&id).await?;
    let wanted = params.symbol_type.as_deref().map(parse_symbol_type).transpose()?;

    let mut symbols = match &params.file_path {
        Some(path) => state.symbols.extract(&handle, path)?,
        None => state.symbols.extract_all(&handle)?,
    };
    if let Some(t) = wanted {
        symbols.retain(|s| s.symbol_type == t);
    }
    Ok(Json(symbols))
}

pub(crate) fn parse_symbol_type(s: &str) -> Result<SymbolType, AppError> {
    match s {
        "function" => Ok(SymbolType::Function),
        "method" => Ok(SymbolType::Method),
        "class" => Ok(SymbolType::Class),
        "variable" => Ok(SymbolType::Variable),
        "constant" => Ok(SymbolType::Constant),
        "interface" => Ok(SymbolType::Interface),
        "other" => Ok(SymbolType::Other),
        other => Err(AppError::bad_request(format!("unknown symbol_type: {other}"))),
    }
}
