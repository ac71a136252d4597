//! Explicit, owned application state (§9 "no process-global state").
//!
//! Every handler receives this through axum's `State` extractor; nothing in
//! this crate reaches into a process-global registry or client.

use handle_registry::HandleRegistry;
use llm_client::{route_model, CallParams, EndpointConfig, LlmClient, DEFAULT_CEILING};
use repo_cache::RepoCache;
use std::sync::Arc;
use symbol_index::SymbolIndex;
use thiserror::Error;

pub struct AppState {
    pub registry: HandleRegistry,
    pub symbols: SymbolIndex,
    pub llm: Option<LlmClient>,
    pub call_params: CallParams,
    pub ceiling: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid cache TTL in KIT_CACHE_TTL_HOURS: {0}")]
    InvalidTtl(String),
}

impl AppState {
    /// Builds state from the environment, following the `must_env`/
    /// `env_opt_u32` helper pattern used throughout the workspace. Missing
    /// LLM configuration is not fatal — the summary endpoint reports 501
    /// when no client is configured, per §4.8.
    pub fn from_env() -> Result<Arc<Self>, ConfigError> {
        let cache_root = std::env::var("KIT_CACHE_DIR")
            .map(std::path::PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("repokit-cache"));
        let ttl_hours = match std::env::var("KIT_CACHE_TTL_HOURS") {
            Ok(v) => v.parse().map_err(|_| ConfigError::InvalidTtl(v))?,
            Err(_) => 24,
        };
        let cache = RepoCache::new(cache_root, ttl_hours);
        let registry = HandleRegistry::new(cache);

        let model = std::env::var("KIT_REVIEW_MODEL").unwrap_or_else(|_| "claude-sonnet-4".into());
        let llm = build_llm_client(&model);

        Ok(Arc::new(Self {
            registry,
            symbols: SymbolIndex::new(),
            llm,
            call_params: CallParams { model, ..Default::default() },
            ceiling: DEFAULT_CEILING,
        }))
    }
}

fn build_llm_client(model: &str) -> Option<LlmClient> {
    use llm_client::ProviderTag::*;
    let provider = route_model(model);
    let (base_url_var, default_url, key_vars): (&str, &str, &[&str]) = match provider {
        CloudChat => ("KIT_OPENAI_BASE_URL", "https://api.openai.com", &["KIT_OPENAI_TOKEN", "OPENAI_API_KEY"]),
        CloudMessages => ("KIT_ANTHROPIC_BASE_URL", "https://api.anthropic.com", &["KIT_ANTHROPIC_TOKEN", "ANTHROPIC_API_KEY"]),
        CloudGenerate => ("KIT_GOOGLE_BASE_URL", "https://generativelanguage.googleapis.com", &["GOOGLE_API_KEY"]),
        LocalGenerate => ("KIT_LOCAL_BASE_URL", "http://localhost:11434", &[]),
    };
    let base_url = std::env::var(base_url_var).unwrap_or_else(|_| default_url.to_string());
    let api_key = key_vars.iter().find_map(|k| std::env::var(k).ok());
    let endpoint = EndpointConfig::new(base_url, api_key);

    let client = match provider {
        CloudChat => LlmClient::cloud_chat(endpoint),
        CloudMessages => LlmClient::cloud_messages(endpoint),
        CloudGenerate => LlmClient::cloud_generate(endpoint),
        LocalGenerate => LlmClient::local_generate(endpoint),
    };
    client.ok()
}
