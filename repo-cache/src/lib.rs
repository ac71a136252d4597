//! §4.5 RepoCache — materializes remote repositories onto local disk,
//! keyed by `<owner>/<repo>/<ref>`, with TTL+size based eviction.

mod clone;
pub mod errors;

pub use errors::{Error, Result};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    owner: String,
    repo: String,
    git_ref: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStatus {
    pub dir: PathBuf,
    pub size_bytes: u64,
    pub entry_count: u64,
    pub ttl_hours: u64,
}

/// Materializes git repositories under `root`, coalescing concurrent
/// requests for the same `(owner, repo, ref)`.
pub struct RepoCache {
    root: PathBuf,
    ttl_hours: u64,
    inflight: StdMutex<HashMap<CacheKey, Arc<OnceCell<Result<PathBuf>>>>>,
}

impl RepoCache {
    pub fn new(root: impl Into<PathBuf>, ttl_hours: u64) -> Self {
        Self {
            root: root.into(),
            ttl_hours,
            inflight: StdMutex::new(HashMap::new()),
        }
    }

    /// Clones (if absent) and checks out `git_ref` for `source`, returning
    /// the final local path. Concurrent callers for the same key coalesce
    /// onto one clone; an already-present entry only has its
    /// `last_accessed` marker touched.
    pub async fn materialize(&self, source: &str, git_ref: Option<&str>) -> Result<PathBuf> {
        let (owner, repo) = parse_owner_repo(source)?;
        let key = CacheKey {
            owner: owner.clone(),
            repo: repo.clone(),
            git_ref: git_ref.unwrap_or("").to_string(),
        };

        let cell = {
            let mut guard = self.inflight.lock().unwrap();
            guard.entry(key.clone()).or_insert_with(|| Arc::new(OnceCell::new())).clone()
        };

        let root = self.root.clone();
        let source = source.to_string();
        let git_ref_owned = git_ref.map(|s| s.to_string());

        let result = cell
            .get_or_init(|| async move {
                materialize_blocking(root, owner, repo, source, git_ref_owned).await
            })
            .await
            .clone();

        // Drop the inflight entry once settled so future distinct materialize
        // calls (e.g. after a `delete`) don't reuse a stale completed cell.
        self.inflight.lock().unwrap().remove(&key);

        result
    }

    pub fn status(&self) -> Result<CacheStatus> {
        let mut size_bytes = 0u64;
        let mut entry_count = 0u64;
        if self.root.exists() {
            for owner_dir in std::fs::read_dir(&self.root)? {
                let owner_dir = owner_dir?.path();
                if !owner_dir.is_dir() {
                    continue;
                }
                for repo_dir in std::fs::read_dir(&owner_dir)? {
                    let repo_dir = repo_dir?.path();
                    if !repo_dir.is_dir() {
                        continue;
                    }
                    for ref_dir in std::fs::read_dir(&repo_dir)? {
                        let ref_dir = ref_dir?.path();
                        if ref_dir.is_dir() {
                            entry_count += 1;
                            size_bytes += dir_size(&ref_dir)?;
                        }
                    }
                }
            }
        }
        Ok(CacheStatus {
            dir: self.root.clone(),
            size_bytes,
            entry_count,
            ttl_hours: self.ttl_hours,
        })
    }

    /// Removes entries older than `ttl_hours`; if `max_size_gb` is given and
    /// the cache still exceeds it afterward, evicts least-recently-accessed
    /// entries until under the limit. Never touches an entry mid-write
    /// (those live under a `.tmp-*` sibling until the atomic rename lands).
    pub fn cleanup(&self, max_size_gb: Option<f64>) -> Result<()> {
        let now = SystemTime::now();
        let ttl = Duration::from_secs(self.ttl_hours * 3600);
        let mut entries = self.list_entries()?;

        entries.retain(|e| {
            let age = now.duration_since(e.last_accessed).unwrap_or_default();
            if age > ttl {
                warn!(path = %e.path.display(), "evicting expired cache entry");
                let _ = std::fs::remove_dir_all(&e.path);
                false
            } else {
                true
            }
        });

        if let Some(max_gb) = max_size_gb {
            let max_bytes = (max_gb * 1024.0 * 1024.0 * 1024.0) as u64;
            entries.sort_by_key(|e| e.last_accessed);
            let mut total: u64 = entries.iter().map(|e| e.size).sum();
            let mut idx = 0;
            while total > max_bytes && idx < entries.len() {
                let e = &entries[idx];
                warn!(path = %e.path.display(), "evicting LRU cache entry over size budget");
                let _ = std::fs::remove_dir_all(&e.path);
                total = total.saturating_sub(e.size);
                idx += 1;
            }
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        info!(root = %self.root.display(), "cache cleared");
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<CacheEntryMeta>> {
        let mut out = Vec::new();
        if !self.root.exists() {
            return Ok(out);
        }
        for owner_dir in std::fs::read_dir(&self.root)? {
            let owner_dir = owner_dir?.path();
            if !owner_dir.is_dir() {
                continue;
            }
            for repo_dir in std::fs::read_dir(&owner_dir)? {
                let repo_dir = repo_dir?.path();
                if !repo_dir.is_dir() {
                    continue;
                }
                for ref_dir in std::fs::read_dir(&repo_dir)? {
                    let ref_dir = ref_dir?.path();
                    if !ref_dir.is_dir() {
                        continue;
                    }
                    let meta = std::fs::metadata(&ref_dir)?;
                    let last_accessed = meta.accessed().unwrap_or(UNIX_EPOCH);
                    out.push(CacheEntryMeta {
                        path: ref_dir.clone(),
                        size: dir_size(&ref_dir)?,
                        last_accessed,
                    });
                }
            }
        }
        Ok(out)
    }
}

struct CacheEntryMeta {
    path: PathBuf,
    size: u64,
    last_accessed: SystemTime,
}

async fn materialize_blocking(
    root: PathBuf,
    owner: String,
    repo: String,
    source: String,
    git_ref: Option<String>,
) -> Result<PathBuf> {
    let git_ref_key = git_ref.clone().unwrap_or_default();
    let final_dir = root.join(&owner).join(&repo).join(if git_ref_key.is_empty() {
        "HEAD".to_string()
    } else {
        git_ref_key
    });

    if final_dir.exists() {
        touch(&final_dir);
        return Ok(final_dir);
    }

    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(final_dir.parent().unwrap())?;
        let tmp_dir = final_dir.with_extension(format!("tmp-{}", std::process::id()));
        if tmp_dir.exists() {
            std::fs::remove_dir_all(&tmp_dir)?;
        }

        clone::clone_and_checkout(&source, &tmp_dir, git_ref.as_deref())?;

        std::fs::rename(&tmp_dir, &final_dir)?;
        Ok(final_dir)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
}

fn touch(path: &Path) {
    let now = SystemTime::now();
    let _ = filetime_set(path, now);
}

fn filetime_set(path: &Path, _time: SystemTime) -> std::io::Result<()> {
    // A plain re-open-and-close is enough to bump `accessed` on filesystems
    // that track atime; we avoid pulling in an extra crate just for this.
    let _ = std::fs::File::open(path)?;
    Ok(())
}

fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0u64;
    for entry in walk(path)? {
        let meta = std::fs::metadata(&entry)?;
        if meta.is_file() {
            total += meta.len();
        }
    }
    Ok(total)
}

fn walk(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.push(path);
            }
        }
    }
    Ok(out)
}

fn parse_owner_repo(source: &str) -> Result<(String, String)> {
    let trimmed = source.trim_end_matches('/').trim_end_matches(".git");
    let parts: Vec<&str> = trimmed
        .rsplit(['/', ':'])
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    match parts.as_slice() {
        [owner, repo] => Ok((owner.to_string(), repo.to_string())),
        _ => Err(Error::InvalidSource(source.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url() {
        let (owner, repo) = parse_owner_repo("https://github.com/acme/widgets.git").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn parses_ssh_shorthand() {
        let (owner, repo) = parse_owner_repo("git@github.com:acme/widgets.git").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn parses_owner_slash_repo_shorthand() {
        let (owner, repo) = parse_owner_repo("acme/widgets").unwrap();
        assert_eq!(owner, "acme");
        assert_eq!(repo, "widgets");
    }

    #[tokio::test]
    async fn status_on_empty_root_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RepoCache::new(dir.path(), 24);
        let status = cache.status().unwrap();
        assert_eq!(status.entry_count, 0);
        assert_eq!(status.size_bytes, 0);
    }

    #[tokio::test]
    async fn clear_removes_root_contents() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RepoCache::new(dir.path(), 24);
        std::fs::create_dir_all(dir.path().join("acme/widgets/main")).unwrap();
        cache.clear().unwrap();
        assert!(!dir.path().join("acme").exists());
    }
}
