//! §4.10 "Validate" — quality scoring of the generated markdown review.
//!
//! Parsing strategy adapted from the reference crate's policy layer (block
//! scanning with regex, never failing the pipeline — only ever warning).

use crate::types::PrFile;
use regex::Regex;
use std::collections::HashSet;

const EXPECTED_SECTIONS: &[&str] = &["summary", "priority", "recommendation"];
const MIN_LENGTH: usize = 80;
const MAX_LENGTH: usize = 20_000;

#[derive(Debug, Clone)]
pub struct QualityReport {
    pub score: f64,
    pub warnings: Vec<String>,
}

/// Computes `quality_score ∈ [0,1]` from reference density, section
/// coverage, length band, and duplicate-content penalty. Never fails —
/// callers decide what to do with a score below 0.6 (a warning, per §4.10).
pub fn validate(markdown: &str, changed_files: &[PrFile]) -> QualityReport {
    let mut warnings = Vec::new();
    let mut score = 0.0;

    let refs = file_line_refs(markdown);
    let changed: HashSet<&str> = changed_files.iter().map(|f| f.filename.as_str()).collect();
    if !refs.is_empty() {
        let resolvable = refs.iter().filter(|(f, _)| changed.contains(f.as_str())).count();
        let ratio = resolvable as f64 / refs.len() as f64;
        score += 0.35 * ratio;
        if ratio < 0.5 {
            warnings.push("most file:line references do not match changed files".into());
        }
    } else {
        warnings.push("no file:line references found".into());
    }

    let lower = markdown.to_ascii_lowercase();
    let covered = EXPECTED_SECTIONS.iter().filter(|s| lower.contains(**s)).count();
    score += 0.3 * (covered as f64 / EXPECTED_SECTIONS.len() as f64);
    if covered < EXPECTED_SECTIONS.len() {
        warnings.push("missing one or more expected sections (summary/priority/recommendations)".into());
    }

    let len = markdown.chars().count();
    if len >= MIN_LENGTH && len <= MAX_LENGTH {
        score += 0.2;
    } else if len < MIN_LENGTH {
        warnings.push("review is unusually short".into());
    } else {
        warnings.push("review is unusually long".into());
    }

    let dup_penalty = duplicate_line_ratio(markdown);
    score += 0.15 * (1.0 - dup_penalty);
    if dup_penalty > 0.3 {
        warnings.push("review contains a high ratio of duplicated lines".into());
    }

    let score = score.clamp(0.0, 1.0);
    if score < 0.6 {
        warnings.push(format!("quality score {score:.2} is below the 0.6 threshold"));
    }

    QualityReport { score, warnings }
}

/// Extracts `path:line` style references from markdown text.
fn file_line_refs(markdown: &str) -> Vec<(String, u32)> {
    let re = Regex::new(r"([\w./-]+\.\w+):(\d+)").unwrap();
    re.captures_iter(markdown)
        .filter_map(|c| {
            let file = c.get(1)?.as_str().to_string();
            let line: u32 = c.get(2)?.as_str().parse().ok()?;
            Some((file, line))
        })
        .collect()
}

fn duplicate_line_ratio(markdown: &str) -> f64 {
    let lines: Vec<&str> = markdown.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = lines.iter().copied().collect();
    1.0 - (unique.len() as f64 / lines.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PrFile {
        PrFile { filename: name.into(), additions: 1, deletions: 0, status: "modified".into(), patch: None }
    }

    #[test]
    fn score_is_always_in_unit_range() {
        let report = validate("", &[]);
        assert!(report.score >= 0.0 && report.score <= 1.0);
    }

    #[test]
    fn well_formed_review_scores_above_threshold() {
        let md = "## Summary\nLooks solid overall.\n\n## Priority Findings\n- src/main.rs:10 missing null check\n\n## Recommendations\nAdd a test for the edge case.\n";
        let report = validate(md, &[file("src/main.rs")]);
        assert!(report.score > 0.6, "score was {}", report.score);
    }

    #[test]
    fn low_score_never_produces_an_error_only_a_warning() {
        let report = validate("too short", &[]);
        assert!(!report.warnings.is_empty());
    }
}
