//! §4.1 SearchEngine — glob-filtered textual/regex line search over a handle.

use crate::errors::{RepoCoreError, Result};
use crate::handle::RepoHandle;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

/// One matched line in a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub line_number: u32,
    pub line: String,
}

/// Search options; `pattern` is always matched per-line.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub regex: bool,
    pub case_sensitive: bool,
    /// Glob patterns (e.g. `*.rs`, `src/**/*.py`) restricting which files are
    /// scanned. Empty means "all files".
    pub include_globs: Vec<String>,
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            regex: false,
            case_sensitive: true,
            include_globs: Vec::new(),
            max_results: 1000,
        }
    }
}

/// Searches file content under a handle, line by line.
pub struct SearchEngine;

impl SearchEngine {
    pub fn search(
        handle: &RepoHandle,
        pattern: &str,
        opts: &SearchOptions,
    ) -> Result<Vec<SearchHit>> {
        if pattern.is_empty() {
            return Err(RepoCoreError::InvalidInput("empty search pattern".into()));
        }

        let matcher = LineMatcher::new(pattern, opts)?;
        let globs = compile_globs(&opts.include_globs)?;

        let mut hits = Vec::new();
        'walk: for entry in WalkDir::new(&handle.local_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git")
        {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(&handle.local_path) {
                Ok(r) => r,
                Err(_) => continue,
            };
            if !globs.is_empty() && !globs.iter().any(|g| g.matches_path(rel)) {
                continue;
            }

            let content = match std::fs::read(entry.path()) {
                Ok(c) => c,
                Err(_) => continue,
            };
            let text = match String::from_utf8(content) {
                Ok(t) => t,
                Err(_) => continue, // skip binary files
            };

            let rel_str = posix(rel);
            for (idx, line) in text.lines().enumerate() {
                if matcher.is_match(line) {
                    hits.push(SearchHit {
                        path: rel_str.clone(),
                        line_number: (idx + 1) as u32,
                        line: line.to_string(),
                    });
                    if hits.len() >= opts.max_results {
                        break 'walk;
                    }
                }
            }
        }
        Ok(hits)
    }
}

enum LineMatcher {
    Regex(Regex),
    Plain { needle: String, case_sensitive: bool },
}

impl LineMatcher {
    fn new(pattern: &str, opts: &SearchOptions) -> Result<Self> {
        if opts.regex {
            let re = if opts.case_sensitive {
                Regex::new(pattern)
            } else {
                Regex::new(&format!("(?i){pattern}"))
            }
            .map_err(|e| RepoCoreError::InvalidInput(format!("invalid regex: {e}")))?;
            Ok(Self::Regex(re))
        } else {
            Ok(Self::Plain {
                needle: if opts.case_sensitive {
                    pattern.to_string()
                } else {
                    pattern.to_lowercase()
                },
                case_sensitive: opts.case_sensitive,
            })
        }
    }

    fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Regex(re) => re.is_match(line),
            Self::Plain { needle, case_sensitive } => {
                if *case_sensitive {
                    line.contains(needle.as_str())
                } else {
                    line.to_lowercase().contains(needle.as_str())
                }
            }
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<globset::Glob>> {
    patterns
        .iter()
        .map(|p| {
            globset::Glob::new(p)
                .map_err(|e| RepoCoreError::InvalidInput(format!("invalid glob {p}: {e}")))
        })
        .collect()
}

trait MatchesPath {
    fn matches_path(&self, path: &Path) -> bool;
}

impl MatchesPath for globset::Glob {
    fn matches_path(&self, path: &Path) -> bool {
        self.compile_matcher().is_match(path)
    }
}

fn posix(p: &Path) -> String {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_handle(dir: &std::path::Path) -> RepoHandle {
        RepoHandle::open("h1".into(), dir.to_path_buf(), "local".into(), None).unwrap()
    }

    #[test]
    fn plain_search_finds_matching_lines() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn main() {\n    foo();\n}\n").unwrap();
        let handle = make_handle(dir.path());
        let hits = SearchEngine::search(&handle, "foo", &SearchOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line_number, 2);
    }

    #[test]
    fn regex_search_respects_pattern() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "def foo():\n    pass\ndef bar():\n    pass\n").unwrap();
        let handle = make_handle(dir.path());
        let opts = SearchOptions { regex: true, ..Default::default() };
        let hits = SearchEngine::search(&handle, r"^def \w+\(", &opts).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn glob_filter_restricts_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "target here").unwrap();
        fs::write(dir.path().join("b.py"), "target here").unwrap();
        let handle = make_handle(dir.path());
        let opts = SearchOptions { include_globs: vec!["*.py".into()], ..Default::default() };
        let hits = SearchEngine::search(&handle, "target", &opts).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "b.py");
    }

    #[test]
    fn empty_pattern_is_invalid_input() {
        let dir = tempdir().unwrap();
        let handle = make_handle(dir.path());
        let err = SearchEngine::search(&handle, "", &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, RepoCoreError::InvalidInput(_)));
    }
}
