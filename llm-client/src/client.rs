//! §4.3 LLMClient — a single `summarize` capability over four tagged
//! provider variants. Enum-dispatch, no `Box<dyn>`, following the same
//! shape the reference backend's Ollama client uses for its HTTP calls.

use crate::config::{CallParams, EndpointConfig};
use crate::errors::{LlmError, Result};
use crate::estimate::{Estimator, default_estimator};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Result of a single `summarize` call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// One of the four provider shapes the system speaks.
#[derive(Clone)]
pub enum LlmClient {
    /// OpenAI-compatible `/v1/chat/completions`.
    CloudChat { http: HttpClient, endpoint: EndpointConfig },
    /// Anthropic-style `/v1/messages` (system + messages array).
    CloudMessages { http: HttpClient, endpoint: EndpointConfig },
    /// Google-style single-turn `generateContent`.
    CloudGenerate { http: HttpClient, endpoint: EndpointConfig },
    /// Local model server (Ollama-shaped) `/api/generate`.
    LocalGenerate { http: HttpClient, endpoint: EndpointConfig },
}

impl LlmClient {
    pub fn cloud_chat(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self::CloudChat { http: build_http(&endpoint)?, endpoint })
    }

    pub fn cloud_messages(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self::CloudMessages { http: build_http(&endpoint)?, endpoint })
    }

    pub fn cloud_generate(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self::CloudGenerate { http: build_http(&endpoint)?, endpoint })
    }

    pub fn local_generate(endpoint: EndpointConfig) -> Result<Self> {
        Ok(Self::LocalGenerate { http: build_http(&endpoint)?, endpoint })
    }

    /// §4.3 `summarize` — the one call surface every variant exposes.
    ///
    /// Invariant 7 (§8): token estimation happens *before* any HTTP request
    /// is built, and `PromptTooLarge` short-circuits the call entirely.
    #[instrument(skip_all, fields(model = %params.model))]
    pub async fn summarize(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: &CallParams,
        ceiling: usize,
    ) -> Result<LlmResponse> {
        self.summarize_with(default_estimator, system_prompt, user_prompt, params, ceiling).await
    }

    /// Same as [`Self::summarize`] but with a caller-supplied estimator.
    pub async fn summarize_with(
        &self,
        estimator: Estimator,
        system_prompt: &str,
        user_prompt: &str,
        params: &CallParams,
        ceiling: usize,
    ) -> Result<LlmResponse> {
        let estimated = estimator(system_prompt) + estimator(user_prompt);
        if estimated > ceiling {
            return Err(LlmError::PromptTooLarge { estimated, ceiling });
        }

        match self {
            Self::CloudChat { http, endpoint } => {
                chat_completions(http, endpoint, system_prompt, user_prompt, params, estimated)
                    .await
            }
            Self::CloudMessages { http, endpoint } => {
                messages(http, endpoint, system_prompt, user_prompt, params, estimated).await
            }
            Self::CloudGenerate { http, endpoint } => {
                generate_content(http, endpoint, system_prompt, user_prompt, params, estimated)
                    .await
            }
            Self::LocalGenerate { http, endpoint } => {
                local_generate(http, endpoint, system_prompt, user_prompt, params, estimated).await
            }
        }
    }
}

fn build_http(endpoint: &EndpointConfig) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(Duration::from_secs(endpoint.timeout_secs))
        .build()
        .map_err(|e| LlmError::Internal(e.to_string()))
}

fn auth_header(endpoint: &EndpointConfig) -> Option<String> {
    endpoint.api_key.as_ref().map(|k| format!("Bearer {k}"))
}

// ---------------------------------------------------------------------
// CloudChat — OpenAI-compatible chat completions.
// ---------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

async fn chat_completions(
    http: &HttpClient,
    endpoint: &EndpointConfig,
    system_prompt: &str,
    user_prompt: &str,
    params: &CallParams,
    estimated: usize,
) -> Result<LlmResponse> {
    let url = format!("{}/v1/chat/completions", endpoint.base_url.trim_end_matches('/'));
    let body = ChatRequest {
        model: &params.model,
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        messages: vec![
            ChatMessage { role: "system", content: system_prompt },
            ChatMessage { role: "user", content: user_prompt },
        ],
    };

    let mut req = http.post(&url).json(&body);
    if let Some(auth) = auth_header(endpoint) {
        req = req.header("Authorization", auth);
    }

    debug!(url, "POST cloud chat completions");
    let resp = req.send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::ProviderUnavailable(format!("{status}: {text}")));
    }
    let parsed: ChatResponse = resp.json().await?;

    let choice = parsed.choices.into_iter().next();
    if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.clone()) {
        if reason == "content_filter" {
            return Err(LlmError::Blocked("content_filter".into()));
        }
    }
    let text = choice.and_then(|c| c.message.content).unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(LlmResponse {
        input_tokens: parsed.usage.as_ref().and_then(|u| u.prompt_tokens).unwrap_or(estimated as u32),
        output_tokens: parsed
            .usage
            .as_ref()
            .and_then(|u| u.completion_tokens)
            .unwrap_or_else(|| default_estimator(&text) as u32),
        text,
    })
}

// ---------------------------------------------------------------------
// CloudMessages — Anthropic-style system + messages.
// ---------------------------------------------------------------------

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    usage: Option<MessagesUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct MessagesUsage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

async fn messages(
    http: &HttpClient,
    endpoint: &EndpointConfig,
    system_prompt: &str,
    user_prompt: &str,
    params: &CallParams,
    estimated: usize,
) -> Result<LlmResponse> {
    let url = format!("{}/v1/messages", endpoint.base_url.trim_end_matches('/'));
    let body = MessagesRequest {
        model: &params.model,
        system: system_prompt,
        max_tokens: params.max_tokens,
        temperature: params.temperature,
        messages: vec![ChatMessage { role: "user", content: user_prompt }],
    };

    let mut req = http.post(&url).json(&body);
    if let Some(key) = &endpoint.api_key {
        req = req.header("x-api-key", key).header("anthropic-version", "2023-06-01");
    }

    debug!(url, "POST cloud messages");
    let resp = req.send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::ProviderUnavailable(format!("{status}: {text}")));
    }
    let parsed: MessagesResponse = resp.json().await?;

    if parsed.stop_reason.as_deref() == Some("refusal") {
        return Err(LlmError::Blocked("refusal".into()));
    }
    let text = parsed.content.into_iter().map(|b| b.text).collect::<String>();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(LlmResponse {
        input_tokens: parsed.usage.as_ref().and_then(|u| u.input_tokens).unwrap_or(estimated as u32),
        output_tokens: parsed
            .usage
            .as_ref()
            .and_then(|u| u.output_tokens)
            .unwrap_or_else(|| default_estimator(&text) as u32),
        text,
    })
}

// ---------------------------------------------------------------------
// CloudGenerate — Google single-turn `generateContent`.
// ---------------------------------------------------------------------

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
}

async fn generate_content(
    http: &HttpClient,
    endpoint: &EndpointConfig,
    system_prompt: &str,
    user_prompt: &str,
    params: &CallParams,
    estimated: usize,
) -> Result<LlmResponse> {
    let key = endpoint.api_key.as_deref().unwrap_or_default();
    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={key}",
        endpoint.base_url.trim_end_matches('/'),
        params.model,
    );
    let combined = format!("{system_prompt}\n\n{user_prompt}");
    let body = json!({
        "contents": [{ "parts": [{ "text": combined }] }],
        "generationConfig": {
            "temperature": params.temperature,
            "maxOutputTokens": params.max_tokens,
        },
    });

    debug!(url = %endpoint.base_url, "POST cloud generateContent");
    let resp = http.post(&url).json(&body).send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::ProviderUnavailable(format!("{status}: {text}")));
    }
    let parsed: GenerateContentResponse = resp.json().await?;

    let candidate = parsed.candidates.into_iter().next();
    if let Some(reason) = candidate.as_ref().and_then(|c| c.finish_reason.clone()) {
        if reason == "SAFETY" {
            return Err(LlmError::Blocked("SAFETY".into()));
        }
    }
    let text = candidate.map(|c| c.content.parts.into_iter().map(|p| p.text).collect::<String>()).unwrap_or_default();
    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(LlmResponse {
        input_tokens: parsed
            .usage_metadata
            .as_ref()
            .and_then(|u| u.prompt_token_count)
            .unwrap_or(estimated as u32),
        output_tokens: parsed
            .usage_metadata
            .as_ref()
            .and_then(|u| u.candidates_token_count)
            .unwrap_or_else(|| default_estimator(&text) as u32),
        text,
    })
}

// ---------------------------------------------------------------------
// LocalGenerate — Ollama-shaped `/api/generate`.
// ---------------------------------------------------------------------

#[derive(Serialize)]
struct LocalGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: LocalGenerateOptions,
}

#[derive(Serialize)]
struct LocalGenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct LocalGenerateResponse {
    response: String,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

async fn local_generate(
    http: &HttpClient,
    endpoint: &EndpointConfig,
    system_prompt: &str,
    user_prompt: &str,
    params: &CallParams,
    estimated: usize,
) -> Result<LlmResponse> {
    let url = format!("{}/api/generate", endpoint.base_url.trim_end_matches('/'));
    let prompt = format!("{system_prompt}\n\n{user_prompt}");
    let body = LocalGenerateRequest {
        model: &params.model,
        prompt: &prompt,
        stream: false,
        options: LocalGenerateOptions { temperature: params.temperature, num_predict: params.max_tokens },
    };

    debug!(url, "POST local generate");
    let resp = http.post(&url).json(&body).send().await.map_err(|e| {
        warn!(error = %e, "local model server unreachable");
        LlmError::ProviderUnavailable(e.to_string())
    })?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(LlmError::ProviderUnavailable(format!("{status}: {text}")));
    }
    let parsed: LocalGenerateResponse = resp.json().await?;

    if parsed.response.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(LlmResponse {
        input_tokens: parsed.prompt_eval_count.unwrap_or(estimated as u32),
        output_tokens: parsed.eval_count.unwrap_or_else(|| default_estimator(&parsed.response) as u32),
        text: parsed.response,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prompt_too_large_short_circuits_before_any_request() {
        let client = LlmClient::local_generate(EndpointConfig::new(
            "http://127.0.0.1:1", // unreachable on purpose
            None,
        ))
        .unwrap();
        let params = CallParams { model: "qwen2.5-coder".into(), ..Default::default() };
        let huge = "x".repeat(100_000);
        let err = client.summarize("sys", &huge, &params, 100).await.unwrap_err();
        assert!(matches!(err, LlmError::PromptTooLarge { .. }));
    }
}
