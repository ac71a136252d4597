//! §4.3 LLMClient, §4.4 Summarizer, §4.11 CostTracker.
//!
//! Four provider variants dispatched through one enum (`LlmClient`), routed
//! from a model name via a pure function (`route_model`). No process-global
//! registries here — callers own whichever `LlmClient`/`CostTracker` they
//! construct (§9 "global mutable registries").

pub mod client;
pub mod config;
pub mod cost;
pub mod errors;
pub mod estimate;
pub mod summarizer;

pub use client::{LlmClient, LlmResponse};
pub use config::{CallParams, EndpointConfig, ProviderTag, DEFAULT_CEILING, route_model};
pub use cost::{CostTracker, Price, UsageRecord};
pub use errors::{LlmError, Result};
pub use estimate::{Estimator, default_estimator};
pub use summarizer::Summarizer;
