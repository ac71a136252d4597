//! §3 PR Context / Review Output entities.

use serde::{Deserialize, Serialize};

/// One file entry in a PR's file list, as returned by the git host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrFile {
    pub filename: String,
    pub additions: u32,
    pub deletions: u32,
    pub status: String,
    pub patch: Option<String>,
}

/// Immutable per-run PR snapshot (§3 "PR Context").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrContext {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub base_sha: String,
    pub head_sha: String,
    pub title: String,
    pub author: String,
    pub files: Vec<PrFile>,
    pub diff: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityFinding {
    pub severity: Severity,
    pub file: String,
    pub line: Option<u32>,
    pub message: String,
}

/// §3 "Review Output".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutput {
    pub markdown: String,
    pub priority_findings: Vec<PriorityFinding>,
    pub quality_score: f64,
    pub issues: Vec<String>,
    pub cost_usd: f64,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Terminal state of a single pipeline run (§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunState {
    Posted,
    Returned,
    Failed,
}
