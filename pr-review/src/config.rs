//! [AMBIENT] `ReviewConfig::from_env` — environment-driven pipeline config,
//! following the `must_env`/`env_opt_u32` helper pattern used across the
//! other crates' config modules.

use crate::errors::{PrReviewError, Result};
use crate::prioritize::PrioritizationMode;
use llm_client::{CallParams, EndpointConfig, DEFAULT_CEILING};

const DEFAULT_MAX_TURNS: u32 = 15;
const DEFAULT_FINALIZE_THRESHOLD: u32 = 15;
const DEFAULT_PRIORITIZE_N: usize = 8;

#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub model: String,
    pub call_params: CallParams,
    pub ceiling: usize,
    pub prioritization: PrioritizationMode,
    pub prioritize_n: usize,
    pub max_turns: u32,
    pub finalize_threshold: u32,
    pub post_as_comment: bool,
    pub github_token: Option<String>,
}

impl ReviewConfig {
    /// Recognizes `KIT_GITHUB_TOKEN`, `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`,
    /// `GOOGLE_API_KEY`, `KIT_ANTHROPIC_TOKEN`, `KIT_OPENAI_TOKEN` per §6
    /// "Environment". Missing vars fall back to permissive defaults rather
    /// than failing, since not every field is required for every command.
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("KIT_REVIEW_MODEL").unwrap_or_else(|_| "claude-sonnet-4".into());
        let github_token = first_present(&["KIT_GITHUB_TOKEN", "GITHUB_TOKEN"]);
        let max_turns = env_opt_u32("KIT_REVIEW_MAX_TURNS").unwrap_or(DEFAULT_MAX_TURNS);
        let finalize_threshold = env_opt_u32("KIT_REVIEW_FINALIZE_THRESHOLD").unwrap_or(DEFAULT_FINALIZE_THRESHOLD);
        let prioritize_n = env_opt_u32("KIT_REVIEW_PRIORITIZE_N").map(|n| n as usize).unwrap_or(DEFAULT_PRIORITIZE_N);
        let prioritization = match std::env::var("KIT_REVIEW_MODE").as_deref() {
            Ok("basic") => PrioritizationMode::Basic,
            _ => PrioritizationMode::Smart,
        };
        let post_as_comment = std::env::var("KIT_REVIEW_POST").map(|v| v == "1" || v == "true").unwrap_or(false);

        Ok(Self {
            call_params: CallParams { model: model.clone(), ..Default::default() },
            model,
            ceiling: DEFAULT_CEILING,
            prioritization,
            prioritize_n,
            max_turns,
            finalize_threshold,
            post_as_comment,
            github_token,
        })
    }

    /// Builds the endpoint config for whichever provider `model` routes to.
    /// Each provider's base URL and key come from a documented env var; an
    /// absent key is not fatal here — the provider call itself will surface
    /// `ProviderUnavailable` if the endpoint rejects the request.
    pub fn endpoint_for(&self, provider: llm_client::ProviderTag) -> EndpointConfig {
        use llm_client::ProviderTag::*;
        match provider {
            CloudChat => EndpointConfig::new(
                std::env::var("KIT_OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".into()),
                first_present(&["KIT_OPENAI_TOKEN", "OPENAI_API_KEY"]),
            ),
            CloudMessages => EndpointConfig::new(
                std::env::var("KIT_ANTHROPIC_BASE_URL").unwrap_or_else(|_| "https://api.anthropic.com".into()),
                first_present(&["KIT_ANTHROPIC_TOKEN", "ANTHROPIC_API_KEY"]),
            ),
            CloudGenerate => EndpointConfig::new(
                std::env::var("KIT_GOOGLE_BASE_URL").unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
                first_present(&["GOOGLE_API_KEY"]),
            ),
            LocalGenerate => EndpointConfig::new(
                std::env::var("KIT_LOCAL_BASE_URL").unwrap_or_else(|_| "http://localhost:11434".into()),
                None,
            ),
        }
    }
}

fn first_present(names: &[&str]) -> Option<String> {
    names.iter().find_map(|n| std::env::var(n).ok())
}

fn env_opt_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[allow(dead_code)]
fn must_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| PrReviewError::InvalidInput(format!("missing required env var: {name}")))
}
