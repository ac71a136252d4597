//! §4.10 PRReviewPipeline — the full
//! `PARSE_URL -> FETCH_META -> FETCH_FILES -> FETCH_DIFF -> PRIORITIZE ->
//! PROMPT -> LLM -> VALIDATE -> EMIT` state machine.

use crate::config::ReviewConfig;
use crate::errors::{PrReviewError, Result};
use crate::host::{parse_pr_url, HostClient};
use crate::prioritize::{prioritize, PrioritizationMode};
use crate::profile::ProfileStore;
use crate::prompt::{build_user_prompt, finalize_nudge, system_prompt};
use crate::quality::validate;
use crate::types::{PriorityFinding, ReviewOutput, RunState, Severity};
use llm_client::{route_model, CostTracker, LlmClient};
use regex::Regex;
use repo_core::RepoHandle;
use symbol_index::SymbolIndex;
use tracing::{info, instrument, warn};

/// Optional repository context for the agentic tool-calling loop. Review
/// runs that only need the diff (no agentic mode) can omit this.
pub struct AgenticContext<'a> {
    pub handle: &'a RepoHandle,
    pub symbols: &'a SymbolIndex,
}

/// Per-invocation options, distinct from the process-wide [`ReviewConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReviewRequest {
    pub pr_url: String,
    pub severity_filter: Option<Vec<Severity>>,
    pub profile_name: Option<String>,
    pub agentic: bool,
    pub return_only: bool,
    pub dry_run: bool,
}

pub struct PrReviewPipeline<'a> {
    host: HostClient,
    llm: LlmClient,
    config: ReviewConfig,
    profiles: Option<&'a ProfileStore>,
}

impl<'a> PrReviewPipeline<'a> {
    pub fn new(host: HostClient, llm: LlmClient, config: ReviewConfig, profiles: Option<&'a ProfileStore>) -> Self {
        Self { host, llm, config, profiles }
    }

    #[instrument(skip(self, agentic), fields(pr_url = %request.pr_url))]
    pub async fn run(
        &self,
        request: ReviewRequest,
        agentic: Option<AgenticContext<'_>>,
    ) -> Result<(RunState, ReviewOutput)> {
        // PARSE_URL
        let pr_ref = parse_pr_url(&request.pr_url)?;

        // FETCH_META / FETCH_FILES / FETCH_DIFF are one host round-trip here.
        let ctx = self.host.fetch_pr_context(&pr_ref).await?;
        info!(owner = %ctx.owner, repo = %ctx.repo, pr = ctx.pr_number, files = ctx.files.len(), "fetched pr context");

        let profile_context = match &request.profile_name {
            Some(name) => {
                let store = self.profiles.ok_or_else(|| {
                    PrReviewError::InvalidInput("profile requested but no profile store configured".into())
                })?;
                Some(store.show(name)?.context)
            }
            None => None,
        };

        // PRIORITIZE, with the PromptTooLarge downgrade Smart->Basic (once).
        let mut mode = self.config.prioritization;
        let mut cost = CostTracker::new();
        let provider = route_model(&self.config.model);

        let mut attempt = 0;
        let (markdown, input_tokens, output_tokens) = loop {
            let prioritized = prioritize(&ctx.files, mode, Some(self.config.prioritize_n));
            let user_prompt = build_user_prompt(
                &ctx,
                &prioritized,
                request.severity_filter.as_deref(),
                profile_context.as_deref(),
            );

            let result = if request.agentic {
                self.run_agentic(&user_prompt, &agentic).await
            } else {
                self.llm
                    .summarize(system_prompt(), &user_prompt, &self.config.call_params, self.config.ceiling)
                    .await
                    .map(|r| (r.text, r.input_tokens, r.output_tokens))
                    .map_err(PrReviewError::from)
            };

            match result {
                Ok(r) => break r,
                Err(PrReviewError::Llm(llm_client::LlmError::PromptTooLarge { .. }))
                    if mode == PrioritizationMode::Smart && attempt == 0 =>
                {
                    warn!("prompt too large under Smart prioritization, downgrading to Basic");
                    mode = PrioritizationMode::Basic;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        cost.track(provider_name(provider), &self.config.model, input_tokens, output_tokens);

        // VALIDATE
        let report = validate(&markdown, &ctx.files);
        let priority_findings = extract_priority_findings(&markdown);
        let mut issues = report.warnings;
        if priority_findings.is_empty() {
            issues.push("no priority findings were extracted from the review body".into());
        }

        let output = ReviewOutput {
            markdown: markdown.clone(),
            priority_findings,
            quality_score: report.score,
            issues,
            cost_usd: cost.total(),
            input_tokens,
            output_tokens,
        };

        // EMIT
        if request.dry_run || request.return_only {
            return Ok((RunState::Returned, output));
        }

        match self.host.post_comment(&pr_ref, &markdown).await {
            Ok(()) => Ok((RunState::Posted, output)),
            Err(e) => {
                warn!(error = %e, "failed to post review comment, returning instead");
                Ok((RunState::Returned, output))
            }
        }
    }

    /// Bounded agentic tool-calling loop (§4.10 "agentic mode"). The model's
    /// response is scanned for a `TOOL_CALL: <name> <json-args>` line; when
    /// present the named operation runs against the agentic context and its
    /// result is fed back as the next user turn. Absent that line, the
    /// response is treated as the final review.
    async fn run_agentic(
        &self,
        initial_user_prompt: &str,
        agentic: &Option<AgenticContext<'_>>,
    ) -> Result<(String, u32, u32)> {
        let mut turn = 0u32;
        let mut user_prompt = initial_user_prompt.to_string();
        let mut total_input = 0u32;
        let mut total_output = 0u32;

        loop {
            turn += 1;
            let system = if turn >= self.config.finalize_threshold {
                format!("{}\n\n{}", system_prompt(), finalize_nudge())
            } else {
                system_prompt().to_string()
            };

            let resp = self
                .llm
                .summarize(&system, &user_prompt, &self.config.call_params, self.config.ceiling)
                .await?;
            total_input += resp.input_tokens;
            total_output += resp.output_tokens;

            match parse_tool_call(&resp.text) {
                Some((name, arg)) if turn < self.config.max_turns => {
                    let tool_result = match agentic {
                        Some(ctx) => run_tool(ctx, &name, &arg),
                        None => format!("tool `{name}` is unavailable: no repository context attached to this run"),
                    };
                    user_prompt = format!("Tool `{name}` returned:\n{tool_result}\n\nContinue the review.");
                }
                _ => return Ok((resp.text, total_input, total_output)),
            }
        }
    }
}

fn parse_tool_call(text: &str) -> Option<(String, String)> {
    let line = text.lines().find(|l| l.trim_start().starts_with("TOOL_CALL:"))?;
    let rest = line.trim_start().strip_prefix("TOOL_CALL:")?.trim();
    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    Some((name.to_string(), arg.to_string()))
}

/// Executes one of §4.1-4.4's operations by name, mirroring the tool
/// catalog exposed through the stdio gateway (§4.9).
fn run_tool(ctx: &AgenticContext<'_>, name: &str, arg: &str) -> String {
    match name {
        "get_file_content" => match ctx.handle.file_content(arg.trim()) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => format!("error: {e}"),
        },
        "get_file_tree" => match ctx.handle.file_tree() {
            Ok(entries) => entries.into_iter().map(|e| e.path).collect::<Vec<_>>().join("\n"),
            Err(e) => format!("error: {e}"),
        },
        "extract_symbols" => match ctx.symbols.extract(ctx.handle, arg.trim()) {
            Ok(symbols) => symbols.into_iter().map(|s| format!("{} ({:?}) {}:{}", s.name, s.symbol_type, s.start_line, s.end_line)).collect::<Vec<_>>().join("\n"),
            Err(e) => format!("error: {e}"),
        },
        "find_symbol_usages" => match ctx.symbols.find_usages(ctx.handle, arg.trim(), None) {
            Ok(usages) => usages.into_iter().map(|u| format!("{}:{}: {}", u.file, u.line_number, u.line_content)).collect::<Vec<_>>().join("\n"),
            Err(e) => format!("error: {e}"),
        },
        "search_code" => match ctx.handle.file_tree() {
            Ok(_) => format!("search_code is served by the SearchEngine in the gateway surface; not invoked here with argument `{arg}`"),
            Err(e) => format!("error: {e}"),
        },
        _ => format!("unknown tool: {name}"),
    }
}

fn provider_name(tag: llm_client::ProviderTag) -> &'static str {
    use llm_client::ProviderTag::*;
    match tag {
        CloudChat => "openai",
        CloudMessages => "anthropic",
        CloudGenerate => "google",
        LocalGenerate => "local",
    }
}

/// Extracts `ANCHOR`/`SEVERITY`/`TITLE`/`BODY` style blocks, deduped by
/// `(title, anchor)`, generalizing the reference policy layer's inline-
/// comment parser to this system's whole-review markdown output.
fn extract_priority_findings(markdown: &str) -> Vec<PriorityFinding> {
    let re = Regex::new(
        r"(?m)^[-*]\s*\**\s*(?i:(high|medium|low))\**[:\s-]+(?:`?([\w./-]+\.\w+)(?::(\d+)(?:-\d+)?)?`?[:\s-]*)?(.+)$",
    )
    .unwrap();

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for cap in re.captures_iter(markdown) {
        let Some(severity) = cap.get(1).and_then(|m| Severity::parse(m.as_str())) else { continue };
        let file = cap.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        let line = cap.get(3).and_then(|m| m.as_str().parse().ok());
        let message = cap.get(4).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        if message.is_empty() {
            continue;
        }
        let key = (file.clone(), message.clone());
        if !seen.insert(key) {
            continue;
        }
        out.push(PriorityFinding { severity, file, line, message });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_findings_with_file_and_line() {
        let md = "## Priority Findings\n- High: `src/main.rs:42` missing bounds check\n- low: general style nit\n";
        let findings = extract_priority_findings(md);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].file, "src/main.rs");
        assert_eq!(findings[0].line, Some(42));
    }

    #[test]
    fn dedups_identical_findings() {
        let md = "- High: `a.rs:1` same issue\n- High: `a.rs:1` same issue\n";
        let findings = extract_priority_findings(md);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn tool_call_line_is_detected() {
        let text = "Some preamble\nTOOL_CALL: get_file_content src/main.rs\n";
        let parsed = parse_tool_call(text);
        assert_eq!(parsed, Some(("get_file_content".to_string(), "src/main.rs".to_string())));
    }

    #[test]
    fn no_tool_call_returns_none() {
        assert!(parse_tool_call("## Summary\nAll good.\n").is_none());
    }
}
