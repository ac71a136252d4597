//! §4.2 SymbolIndex — on-demand, per-file grammar-based symbol extraction.

mod cache;
pub mod errors;
mod extract;
pub mod queries;
pub mod types;

pub use errors::{Error, Result};
pub use queries::Lang;
pub use types::{IndexResult, Symbol, SymbolType, SymbolUsage};

use cache::SymbolCache;
use regex::Regex;
use repo_core::RepoHandle;
use std::time::UNIX_EPOCH;

/// Drives per-language extraction over a single `RepoHandle`.
///
/// One `SymbolIndex` is typically kept alongside its handle for the handle's
/// lifetime, so repeated calls hit the per-file cache.
pub struct SymbolIndex {
    cache: SymbolCache,
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self { cache: SymbolCache::new() }
    }

    /// Extracts symbols from a single file, deterministic by
    /// `(start_line, start_col)`.
    pub fn extract(&self, handle: &RepoHandle, relative_path: &str) -> Result<Vec<Symbol>> {
        let Some(lang) = extension_lang(relative_path) else {
            return Ok(Vec::new());
        };

        let abs = handle
            .resolve_path(relative_path)
            .map_err(|e| Error::InvalidInput(e.to_string()))?;
        let meta = std::fs::metadata(&abs)?;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        let size = meta.len();

        self.cache.get_or_insert_with(&handle.handle_id, relative_path, mtime, size, || {
            let source = std::fs::read_to_string(&abs)
                .map_err(|_| Error::NotFound(relative_path.to_string()))?;
            extract::extract_symbols(&lang, relative_path, &source)
        })
    }

    /// Union of `extract` over every file whose extension is registered.
    ///
    /// Ordering: file path, then in-file order (already guaranteed by
    /// `extract`).
    pub fn extract_all(&self, handle: &RepoHandle) -> Result<Vec<Symbol>> {
        let mut files: Vec<String> = handle
            .file_tree()
            .map_err(|e| Error::InvalidInput(e.to_string()))?
            .into_iter()
            .filter(|e| !e.is_dir && extension_lang(&e.path).is_some())
            .map(|e| e.path)
            .collect();
        files.sort();

        let mut out = Vec::new();
        for file in files {
            out.extend(self.extract(handle, &file)?);
        }
        Ok(out)
    }

    /// Textual word-boundary scan for `name` over every indexable file.
    ///
    /// When `symbol_type` is given, a usage is excluded if its line's
    /// enclosing file defines `name` as a symbol of a *different* type
    /// (lines with no matching definition at all are still included, since
    /// the name may be defined elsewhere in the repository).
    pub fn find_usages(
        &self,
        handle: &RepoHandle,
        name: &str,
        symbol_type: Option<SymbolType>,
    ) -> Result<Vec<SymbolUsage>> {
        if name.is_empty() {
            return Err(Error::InvalidInput("empty symbol name".into()));
        }
        let pattern = format!(r"\b{}\b", regex::escape(name));
        let re = Regex::new(&pattern).map_err(|e| Error::InvalidInput(e.to_string()))?;

        let mut files: Vec<String> = handle
            .file_tree()
            .map_err(|e| Error::InvalidInput(e.to_string()))?
            .into_iter()
            .filter(|e| !e.is_dir && extension_lang(&e.path).is_some())
            .map(|e| e.path)
            .collect();
        files.sort();

        let mut out = Vec::new();
        for file in &files {
            let content = match handle.file_content(file) {
                Ok(c) => c,
                Err(_) => continue,
            };
            let text = String::from_utf8_lossy(&content);

            let excluded = if let Some(want) = symbol_type {
                let symbols = self.extract(handle, file)?;
                symbols
                    .iter()
                    .any(|s| s.name == name && s.symbol_type != want)
            } else {
                false
            };
            if excluded {
                continue;
            }

            for (idx, line) in text.lines().enumerate() {
                if re.is_match(line) {
                    out.push(SymbolUsage {
                        file: file.clone(),
                        line_number: (idx + 1) as u32,
                        line_content: line.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }

    /// Combined file tree + `extract_all` payload.
    pub fn index(&self, handle: &RepoHandle) -> Result<IndexResult> {
        let files = handle
            .file_tree()
            .map_err(|e| Error::InvalidInput(e.to_string()))?
            .into_iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.path)
            .collect();
        let symbols = self.extract_all(handle)?;
        Ok(IndexResult { files, symbols })
    }
}

fn extension_lang(path: &str) -> Option<Lang> {
    let ext = path.rsplit('.').next().unwrap_or("");
    Lang::from_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn handle(dir: &std::path::Path) -> RepoHandle {
        RepoHandle::open("h1".into(), dir.to_path_buf(), "local".into(), None).unwrap()
    }

    #[test]
    fn extract_all_returns_symbols_in_file_then_position_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn one() {}\n").unwrap();
        fs::write(dir.path().join("b.py"), "def two():\n    pass\n").unwrap();
        let idx = SymbolIndex::new();
        let h = handle(dir.path());
        let symbols = idx.extract_all(&h).unwrap();
        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn find_usages_matches_word_boundary() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.js"),
            "function alpha() {}\nconst alphabet = 1;\nalpha();\n",
        )
        .unwrap();
        let idx = SymbolIndex::new();
        let h = handle(dir.path());
        let usages = idx.find_usages(&h, "alpha", None).unwrap();
        assert_eq!(usages.len(), 2);
    }

    #[test]
    fn unsupported_extension_yields_no_symbols() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        let idx = SymbolIndex::new();
        let h = handle(dir.path());
        assert!(idx.extract(&h, "data.json").unwrap().is_empty());
    }

    #[test]
    fn extract_is_cached_across_calls() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn one() {}\n").unwrap();
        let idx = SymbolIndex::new();
        let h = handle(dir.path());
        let first = idx.extract(&h, "a.rs").unwrap();
        let second = idx.extract(&h, "a.rs").unwrap();
        assert_eq!(first.len(), second.len());
    }
}
