//! §4.10 PRReviewPipeline, git host providers, and the §4.11 Profile store.
//!
//! Fetches a PR, prioritizes its changed files, assembles a bounded prompt,
//! drives an `llm_client::LlmClient`, validates output quality, and either
//! posts the result as a comment or returns it.

pub mod config;
pub mod errors;
pub mod host;
pub mod pipeline;
pub mod prioritize;
pub mod profile;
pub mod prompt;
pub mod quality;
pub mod types;

pub use config::ReviewConfig;
pub use errors::{PrReviewError, Result};
pub use host::{HostClient, HostConfig, PrRef};
pub use pipeline::{AgenticContext, PrReviewPipeline, ReviewRequest};
pub use prioritize::PrioritizationMode;
pub use profile::{Profile, ProfileStore};
pub use quality::QualityReport;
pub use types::{PrContext, PrFile, PriorityFinding, ReviewOutput, RunState, Severity};
