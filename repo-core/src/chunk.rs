//! §3 Chunk entity / §4.1 Chunker — line-window and symbol-bounded slicing.

use crate::errors::{RepoCoreError, Result};
use crate::handle::RepoHandle;
use serde::{Deserialize, Serialize};

/// A contiguous slice of a file's lines, ready to hand to an LLM or a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub text: String,
}

/// A symbol's line span, used by `chunk_by_symbol` to bound a slice.
///
/// Mirrors the fields of `symbol-index`'s `Symbol` that matter for chunking,
/// without this crate depending on that crate.
#[derive(Debug, Clone, Copy)]
pub struct SymbolSpan {
    pub start_line: u32,
    pub end_line: u32,
}

/// Slices file content into line-bounded or symbol-bounded chunks.
pub struct Chunker;

impl Chunker {
    /// Returns the inclusive `[start_line, end_line]` window of `path`.
    ///
    /// Lines are 1-indexed. A window that extends past end of file is
    /// clamped rather than rejected; a `start_line` past end of file is
    /// `InvalidInput`.
    pub fn chunk_lines(
        handle: &RepoHandle,
        path: &str,
        start_line: u32,
        end_line: u32,
    ) -> Result<Chunk> {
        if start_line == 0 || start_line > end_line {
            return Err(RepoCoreError::InvalidInput(format!(
                "invalid line range {start_line}-{end_line}"
            )));
        }
        let content = handle.file_content(path)?;
        let text = String::from_utf8_lossy(&content);
        let lines: Vec<&str> = text.lines().collect();

        if start_line as usize > lines.len() {
            return Err(RepoCoreError::InvalidInput(format!(
                "start_line {start_line} is past end of file ({} lines)",
                lines.len()
            )));
        }

        let start_idx = (start_line - 1) as usize;
        let end_idx = (end_line as usize).min(lines.len());
        let slice = &lines[start_idx..end_idx];

        Ok(Chunk {
            path: path.to_string(),
            start_line,
            end_line: end_idx as u32,
            text: slice.join("\n"),
        })
    }

    /// Slices `path` to the span of a single symbol, with `context_lines` of
    /// padding on either side (clamped to file bounds).
    pub fn chunk_by_symbol(
        handle: &RepoHandle,
        path: &str,
        symbol: SymbolSpan,
        context_lines: u32,
    ) -> Result<Chunk> {
        let start = symbol.start_line.saturating_sub(context_lines).max(1);
        let end = symbol.end_line.saturating_add(context_lines);
        Self::chunk_lines(handle, path, start, end)
    }

    /// Splits an entire file into fixed-size, non-overlapping line chunks.
    pub fn chunk_whole_file(handle: &RepoHandle, path: &str, chunk_size: u32) -> Result<Vec<Chunk>> {
        if chunk_size == 0 {
            return Err(RepoCoreError::InvalidInput("chunk_size must be > 0".into()));
        }
        let content = handle.file_content(path)?;
        let text = String::from_utf8_lossy(&content);
        let total_lines = text.lines().count() as u32;
        if total_lines == 0 {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut start = 1u32;
        while start <= total_lines {
            let end = (start + chunk_size - 1).min(total_lines);
            chunks.push(Self::chunk_lines(handle, path, start, end)?);
            start = end + 1;
        }
        Ok(chunks)
    }
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
    fn chunk_lines_extracts_window() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\nthree\nfour\n").unwrap();
        let handle = make_handle(dir.path());
        let chunk = Chunker::chunk_lines(&handle, "a.txt", 2, 3).unwrap();
        assert_eq!(chunk.text, "two\nthree");
    }

    #[test]
    fn chunk_lines_clamps_end_past_eof() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
        let handle = make_handle(dir.path());
        let chunk = Chunker::chunk_lines(&handle, "a.txt", 1, 100).unwrap();
        assert_eq!(chunk.end_line, 2);
        assert_eq!(chunk.text, "one\ntwo");
    }

    #[test]
    fn chunk_lines_rejects_start_past_eof() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        let handle = make_handle(dir.path());
        assert!(Chunker::chunk_lines(&handle, "a.txt", 10, 12).is_err());
    }

    #[test]
    fn chunk_by_symbol_adds_context() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "1\n2\n3\n4\n5\n6\n7\n").unwrap();
        let handle = make_handle(dir.path());
        let span = SymbolSpan { start_line: 3, end_line: 4 };
        let chunk = Chunker::chunk_by_symbol(&handle, "a.txt", span, 1).unwrap();
        assert_eq!(chunk.start_line, 2);
        assert_eq!(chunk.end_line, 5);
    }

    #[test]
    fn chunk_whole_file_splits_evenly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "1\n2\n3\n4\n5\n").unwrap();
        let handle = make_handle(dir.path());
        let chunks = Chunker::chunk_whole_file(&handle, "a.txt", 2).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].text, "5");
    }
}
