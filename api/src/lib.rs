//! §6 HTTP gateway — a thin axum surface over the same read-only repository
//! operations `toolcall` and `cli` expose through their own front ends.
//!
//! No handler owns state beyond what it receives through axum's `State`
//! extractor (§9 "no process-global state"); `AppState::from_env` is the one
//! place environment variables are read.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use core::app_state::AppState;
use middleware_layer::json_extractor::json_error_mapper;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/repository", post(routes::repository::open_repository))
        .route("/repository/{id}", delete(routes::repository::delete_repository))
        .route("/repository/{id}/file-tree", get(routes::file_tree::file_tree))
        .route("/repository/{id}/files/{*path}", get(routes::files::file_content))
        .route("/repository/{id}/search", get(routes::search::search))
        .route("/repository/{id}/symbols", get(routes::symbols::symbols))
        .route("/repository/{id}/usages", get(routes::usages::usages))
        .route("/repository/{id}/index", get(routes::index::index))
        .route("/repository/{id}/summary", get(routes::summary::summary))
        .route("/repository/{id}/dependencies", get(routes::dependencies::dependencies))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Binds and serves the gateway on `KIT_HTTP_ADDR` (default `127.0.0.1:8080`).
pub async fn start() -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_env()?;
    let addr = std::env::var("KIT_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr, "repokit HTTP gateway listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
