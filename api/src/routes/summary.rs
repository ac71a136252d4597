//! GET /repository/{id}/summary?file_path=&symbol_name=
//!
//! 501 when no LLM client is configured; 503 when the configured provider is
//! unreachable (surfaced through `ErrorKind::ProviderUnavailable`).

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use llm_client::Summarizer;
use repo_core::ErrorKind;
use serde::{Deserialize, Serialize};
use symbol_index::SymbolType;

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub file_path: String,
    pub symbol_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<SummaryResponse>> {
    let Some(client) = state.llm.as_ref() else {
        return Err(AppError::new(ErrorKind::Unsupported, "no LLM provider configured"));
    };
    let handle = state.registry.get(&id).await?;
    let summarizer = Summarizer::new(&handle, &state.symbols, client, state.ceiling);

    let text = match &params.symbol_name {
        None => summarizer.summarize_file(&params.file_path, &state.call_params).await?,
        Some(name) => {
            let symbols = state.symbols.extract(&handle, &params.file_path)?;
            let symbol_type = symbols
                .iter()
                .find(|s| &s.name == name || &s.node_path == name)
                .map(|s| s.symbol_type);
            match symbol_type {
                Some(SymbolType::Class) => {
                    summarizer.summarize_class(&params.file_path, name, &state.call_params).await?
                }
                _ => summarizer.summarize_function(&params.file_path, name, &state.call_params).await?,
            }
        }
    };

    Ok(Json(SummaryResponse { summary: text }))
}
