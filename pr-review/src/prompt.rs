//! §4.10 "Prompt assembly" — builds the system/user prompt pair handed to
//! the LLM client.

use crate::prioritize::PrioritizedFiles;
use crate::types::{PrContext, Severity};

const SYSTEM_PROMPT: &str = "You are a meticulous senior engineer reviewing a pull request. \
Produce a markdown review with a `## Summary` section, a `## Priority Findings` section whose \
entries each cite a `file:line` reference and a severity (high, medium, or low), and a \
`## Recommendations` section. Ground every finding in the diff provided; do not invent files \
or line numbers that are not present in it.";

/// Assembles the user-facing prompt: PR metadata, a prioritization summary
/// (for transparency), the unified diff, and an optional severity hint.
pub fn build_user_prompt(
    ctx: &PrContext,
    prioritized: &PrioritizedFiles<'_>,
    severity_filter: Option<&[Severity]>,
    profile_context: Option<&str>,
) -> String {
    let mut out = String::new();

    if let Some(context) = profile_context {
        out.push_str("## Reviewer guidance\n");
        out.push_str(context);
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "## Pull request\n{}/{} #{}: \"{}\" by {}\nbase {} -> head {}\n\n",
        ctx.owner, ctx.repo, ctx.pr_number, ctx.title, ctx.author, ctx.base_sha, ctx.head_sha
    ));

    out.push_str(&format!(
        "## Files under review\n{} of {} changed files selected for review ({} skipped):\n",
        prioritized.selected.len(),
        ctx.files.len(),
        prioritized.skipped_count
    ));
    for file in &prioritized.selected {
        out.push_str(&format!("- {} (+{}/-{}, {})\n", file.filename, file.additions, file.deletions, file.status));
    }
    out.push('\n');

    if let Some(filter) = severity_filter {
        let names: Vec<&str> = filter.iter().map(severity_name).collect();
        out.push_str(&format!("Only report findings at severity: {}.\n\n", names.join(", ")));
    }

    out.push_str("## Diff\n```diff\n");
    out.push_str(&ctx.diff);
    out.push_str("\n```\n");

    out
}

pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

fn severity_name(s: &Severity) -> &'static str {
    match s {
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
    }
}

/// The nudge appended once the agentic loop reaches `finalize_threshold`
/// turns, asking the model to stop issuing tool calls and emit its review.
pub fn finalize_nudge() -> &'static str {
    "You are near the turn limit for this review. Stop requesting additional repository data \
and emit your final markdown review now."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prioritize::{prioritize, PrioritizationMode};
    use crate::types::PrFile;

    fn ctx() -> PrContext {
        PrContext {
            owner: "acme".into(),
            repo: "widgets".into(),
            pr_number: 1,
            base_sha: "aaa".into(),
            head_sha: "bbb".into(),
            title: "Fix bug".into(),
            author: "dev".into(),
            files: vec![PrFile { filename: "src/main.rs".into(), additions: 3, deletions: 1, status: "modified".into(), patch: None }],
            diff: "--- a/src/main.rs\n+++ b/src/main.rs\n".into(),
        }
    }

    #[test]
    fn user_prompt_embeds_diff_and_metadata() {
        let c = ctx();
        let prioritized = prioritize(&c.files, PrioritizationMode::Basic, None);
        let prompt = build_user_prompt(&c, &prioritized, None, None);
        assert!(prompt.contains("acme/widgets #1"));
        assert!(prompt.contains("src/main.rs"));
        assert!(prompt.contains("```diff"));
    }

    #[test]
    fn severity_filter_is_mentioned_when_given() {
        let c = ctx();
        let prioritized = prioritize(&c.files, PrioritizationMode::Basic, None);
        let prompt = build_user_prompt(&c, &prioritized, Some(&[Severity::High]), None);
        assert!(prompt.contains("Only report findings at severity: high"));
    }
}
