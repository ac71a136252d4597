//! §4.1 RepoHandle — a git-ref-bound, read-only view of a repository tree.

use crate::errors::{RepoCoreError, Result};
use crate::path_guard::resolve_within;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One entry in a `fileTree()` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTreeEntry {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// Git metadata for a handle, if the underlying tree is a git repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitInfo {
    pub sha: Option<String>,
    pub short_sha: Option<String>,
    pub branch: Option<String>,
    pub remote_url: Option<String>,
}

/// A read-only, ref-bound view over a repository checkout on local disk.
///
/// Immutable once constructed: its files and ref never change underneath a
/// caller. A different ref is always a different `RepoHandle`.
#[derive(Debug, Clone)]
pub struct RepoHandle {
    pub handle_id: String,
    pub local_path: PathBuf,
    pub source: String,
    pub git_ref: Option<String>,
    pub resolved_sha: Option<String>,
    pub branch: Option<String>,
    pub remote_url: Option<String>,
}

impl RepoHandle {
    /// Wrap an already-materialized local directory as a handle.
    ///
    /// `repo-cache`/`handle-registry` are responsible for producing
    /// `local_path` (cloning and checking out `git_ref` when `source` is
    /// remote); this constructor never performs I/O beyond reading git
    /// metadata from the given path.
    pub fn open(
        handle_id: String,
        local_path: PathBuf,
        source: String,
        git_ref: Option<String>,
    ) -> Result<Self> {
        let local_path = dunce::canonicalize(&local_path)?;
        let mut handle = Self {
            handle_id,
            local_path,
            source,
            git_ref,
            resolved_sha: None,
            branch: None,
            remote_url: None,
        };
        let info = handle.read_git_info();
        handle.resolved_sha = info.sha;
        handle.branch = info.branch;
        handle.remote_url = info.remote_url;
        Ok(handle)
    }

    /// Pre-order traversal of the working tree, deterministic by name.
    ///
    /// Symlinks are not followed; hidden files are included; paths are
    /// POSIX-style and relative to `local_path`.
    pub fn file_tree(&self) -> Result<Vec<FileTreeEntry>> {
        let mut out = Vec::new();
        let walker = WalkDir::new(&self.local_path)
            .follow_links(false)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git" || e.depth() != 1);

        for entry in walker {
            let entry = entry.map_err(|e| RepoCoreError::Internal(e.to_string()))?;
            if entry.depth() == 0 {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.local_path)
                .map_err(|e| RepoCoreError::Internal(e.to_string()))?;
            let path = posix_path(rel);
            let name = entry.file_name().to_string_lossy().to_string();
            let meta = entry.metadata().map_err(|e| RepoCoreError::Internal(e.to_string()))?;
            out.push(FileTreeEntry {
                path,
                name,
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.len() },
            });
        }
        Ok(out)
    }

    /// Reads raw file content, enforcing the path-safety guard first.
    pub fn file_content(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = resolve_within(&self.local_path, path)?;
        if !resolved.exists() {
            return Err(RepoCoreError::NotFound(path.to_string()));
        }
        std::fs::read(&resolved).map_err(RepoCoreError::Io)
    }

    /// Resolves and validates an externally supplied relative path, without
    /// reading it. Used by callers (symbol index, search, chunker) that need
    /// an absolute path but do their own I/O.
    pub fn resolve_path(&self, path: &str) -> Result<PathBuf> {
        resolve_within(&self.local_path, path)
    }

    pub fn git_info(&self) -> GitInfo {
        GitInfo {
            sha: self.resolved_sha.clone(),
            short_sha: self.resolved_sha.as_ref().map(|s| s[..s.len().min(8)].to_string()),
            branch: self.branch.clone(),
            remote_url: self.remote_url.clone(),
        }
    }

    fn read_git_info(&self) -> GitInfo {
        let repo = match git2::Repository::open(&self.local_path) {
            Ok(r) => r,
            Err(_) => return GitInfo::default(),
        };

        let head = repo.head().ok();
        let sha = head
            .as_ref()
            .and_then(|h| h.target())
            .map(|oid| oid.to_string());
        let branch = head.as_ref().and_then(|h| {
            if h.is_branch() {
                h.shorthand().map(|s| s.to_string())
            } else {
                None
            }
        });
        let remote_url = repo
            .find_remote("origin")
            .ok()
            .and_then(|r| r.url().map(|s| s.to_string()));

        debug!(sha = ?sha, branch = ?branch, "read git info");
        GitInfo {
            short_sha: sha.as_ref().map(|s| s[..s.len().min(8)].to_string()),
            sha,
            branch,
            remote_url,
        }
    }
}

fn posix_path(p: &Path) -> String {
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

    #[test]
    fn file_tree_lists_files_and_dirs() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("file1.txt"), "content of file1").unwrap();
        fs::create_dir(dir.path().join("dir1")).unwrap();
        fs::write(dir.path().join("dir1/file2.py"), "# python file").unwrap();

        let handle =
            RepoHandle::open("h1".into(), dir.path().to_path_buf(), "local".into(), None)
                .unwrap();
        let tree = handle.file_tree().unwrap();
        let paths: Vec<_> = tree.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"file1.txt"));
        assert!(paths.contains(&"dir1"));
        assert!(paths.contains(&"dir1/file2.py"));
    }

    #[test]
    fn file_content_rejects_traversal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hi").unwrap();
        let handle =
            RepoHandle::open("h1".into(), dir.path().to_path_buf(), "local".into(), None)
                .unwrap();
        let err = handle.file_content("../etc/passwd").unwrap_err();
        matches!(err, RepoCoreError::PathEscape);
    }

    #[test]
    fn file_content_of_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let handle =
            RepoHandle::open("h1".into(), dir.path().to_path_buf(), "local".into(), None)
                .unwrap();
        assert!(matches!(
            handle.file_content("missing.txt"),
            Err(RepoCoreError::NotFound(_))
        ));
    }

    #[test]
    fn zero_byte_file_returns_empty_content() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        let handle =
            RepoHandle::open("h1".into(), dir.path().to_path_buf(), "local".into(), None)
                .unwrap();
        assert_eq!(handle.file_content("empty.txt").unwrap(), Vec::<u8>::new());
    }
}
