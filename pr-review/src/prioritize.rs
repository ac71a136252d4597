//! §4.10 "Prioritize files" — Basic and Smart file selection.

use crate::types::PrFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrioritizationMode {
    Basic,
    Smart,
}

#[derive(Debug, Clone)]
pub struct PrioritizedFiles<'a> {
    pub selected: Vec<&'a PrFile>,
    pub skipped_count: usize,
}

const DEFAULT_N: usize = 8;

/// Weights for the Smart scoring formula `s = a*log(1+churn) + b*ext - c*path + d*generated`.
const WEIGHT_CHURN: f64 = 1.0;
const WEIGHT_EXT: f64 = 1.0;
const WEIGHT_PATH: f64 = 2.0;
const WEIGHT_GENERATED_PENALTY: f64 = 5.0;

const SECURITY_SENSITIVE: &[&str] = &[
    "auth", "security", "login", "password", "token", "secret", "credential", "permission", "acl",
];

const GENERATED_MARKERS: &[&str] = &[
    ".lock", "-lock.json", ".min.js", ".min.css", "vendor/", "dist/", "generated/", ".pb.go",
];

fn extension_weight(path: &str) -> f64 {
    match path.rsplit('.').next().unwrap_or("") {
        "rs" | "py" | "ts" | "tsx" | "js" | "jsx" | "go" | "java" | "rb" | "c" | "cpp" | "h" => 1.0,
        "md" | "txt" | "json" | "yaml" | "yml" | "toml" => 0.2,
        _ => 0.5,
    }
}

fn path_weight(path: &str) -> f64 {
    let lower = path.to_ascii_lowercase();
    if SECURITY_SENSITIVE.iter().any(|kw| lower.contains(kw)) { 1.0 } else { 0.0 }
}

fn generated_penalty(path: &str) -> f64 {
    let lower = path.to_ascii_lowercase();
    if GENERATED_MARKERS.iter().any(|m| lower.contains(m)) { 1.0 } else { 0.0 }
}

fn smart_score(file: &PrFile) -> f64 {
    let churn = (file.additions + file.deletions) as f64;
    WEIGHT_CHURN * (1.0 + churn).ln() + WEIGHT_EXT * extension_weight(&file.filename)
        + WEIGHT_PATH * path_weight(&file.filename)
        - WEIGHT_GENERATED_PENALTY * generated_penalty(&file.filename)
}

/// §4.10 prioritization entry point; `n` defaults to 8 when `None`.
pub fn prioritize(files: &[PrFile], mode: PrioritizationMode, n: Option<usize>) -> PrioritizedFiles<'_> {
    let n = n.unwrap_or(DEFAULT_N);
    match mode {
        PrioritizationMode::Basic => {
            let selected: Vec<&PrFile> = files.iter().take(n).collect();
            let skipped_count = files.len().saturating_sub(selected.len());
            PrioritizedFiles { selected, skipped_count }
        }
        PrioritizationMode::Smart => {
            let mut scored: Vec<(&PrFile, f64)> = files.iter().map(|f| (f, smart_score(f))).collect();
            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
            let selected: Vec<&PrFile> = scored.into_iter().take(n).map(|(f, _)| f).collect();
            let skipped_count = files.len().saturating_sub(selected.len());
            PrioritizedFiles { selected, skipped_count }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, adds: u32, dels: u32) -> PrFile {
        PrFile { filename: name.into(), additions: adds, deletions: dels, status: "modified".into(), patch: None }
    }

    #[test]
    fn basic_takes_first_n_in_order() {
        let files = vec![file("a.rs", 1, 1), file("b.rs", 1, 1), file("c.rs", 1, 1)];
        let result = prioritize(&files, PrioritizationMode::Basic, Some(2));
        assert_eq!(result.selected.len(), 2);
        assert_eq!(result.selected[0].filename, "a.rs");
        assert_eq!(result.skipped_count, 1);
    }

    #[test]
    fn smart_boosts_security_sensitive_paths() {
        let files = vec![file("docs/readme.md", 5, 5), file("src/auth/login.rs", 5, 5)];
        let result = prioritize(&files, PrioritizationMode::Smart, Some(1));
        assert_eq!(result.selected[0].filename, "src/auth/login.rs");
    }

    #[test]
    fn smart_penalizes_generated_lockfiles() {
        let files = vec![file("Cargo.lock", 1000, 1000), file("src/main.rs", 2, 1)];
        let result = prioritize(&files, PrioritizationMode::Smart, Some(1));
        assert_eq!(result.selected[0].filename, "src/main.rs");
    }
}
