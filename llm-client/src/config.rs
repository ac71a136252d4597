//! §4.3 provider configuration and §6 model-name routing table.

use serde::{Deserialize, Serialize};

/// Which of the four provider shapes a model name routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    CloudChat,
    CloudMessages,
    CloudGenerate,
    LocalGenerate,
}

/// Per-call tuning parameters, shared across every provider variant.
#[derive(Debug, Clone)]
pub struct CallParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CallParams {
    fn default() -> Self {
        Self { model: String::new(), temperature: 0.2, max_tokens: 2048 }
    }
}

/// Fixed per-provider input-token ceiling (§4.3 default: 15,000 for chat
/// providers). Local providers use the same default absent a reason to
/// differ; callers may override via `ClientConfig::ceiling_override`.
pub const DEFAULT_CEILING: usize = 15_000;

/// Connection details for one provider endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { base_url: base_url.into(), api_key, timeout_secs: 60 }
    }
}

/// Routes a model name to a provider tag per `spec.md` §6 "Environment".
///
/// Pure function: no I/O, no config lookup — the caller is responsible for
/// having an `EndpointConfig` on hand for whichever tag this returns.
pub fn route_model(model: &str) -> ProviderTag {
    let lower = model.to_ascii_lowercase();
    if lower.starts_with("gpt-") || lower.starts_with("o1") || lower.starts_with("o3") {
        return ProviderTag::CloudChat;
    }
    if lower.starts_with("claude-") {
        return ProviderTag::CloudMessages;
    }
    if lower.starts_with("gemini-") {
        return ProviderTag::CloudGenerate;
    }
    const LOCAL_PREFIXES: &[&str] = &[
        "llama", "codellama", "mistral", "deepseek", "qwen", "phi", "gemma", "starcoder",
        "wizardcoder", "devstral",
    ];
    if LOCAL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return ProviderTag::LocalGenerate;
    }
    // Unknown model names default to the local generate shape: a locally
    // hosted Ollama-style server is the safest no-surprise-cost fallback.
    ProviderTag::LocalGenerate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_known_prefixes() {
        assert_eq!(route_model("gpt-4o-mini"), ProviderTag::CloudChat);
        assert_eq!(route_model("claude-opus-4"), ProviderTag::CloudMessages);
        assert_eq!(route_model("gemini-1.5-pro"), ProviderTag::CloudGenerate);
        assert_eq!(route_model("qwen2.5-coder"), ProviderTag::LocalGenerate);
        assert_eq!(route_model("deepseek-coder-v2"), ProviderTag::LocalGenerate);
    }

    #[test]
    fn unknown_model_falls_back_to_local() {
        assert_eq!(route_model("some-custom-model"), ProviderTag::LocalGenerate);
    }
}
