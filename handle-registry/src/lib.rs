//! §4.6 HandleRegistry — maps a deterministic `handle_id` to a live, lazily
//! constructed `RepoHandle`.

pub mod errors;

pub use errors::{Error, Result};

use repo_cache::RepoCache;
use repo_core::RepoHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::sync::OnceCell;
use tracing::info;

/// Remembers requested `(source, ref)` pairs and lazily builds their handle.
///
/// `get` coalesces concurrent callers for the same id onto one construction;
/// the map lock is never held across the clone/checkout I/O that
/// construction may require.
pub struct HandleRegistry {
    cache: RepoCache,
    entries: StdMutex<HashMap<String, Entry>>,
}

struct Entry {
    source: String,
    git_ref: Option<String>,
    handle: Arc<OnceCell<Result<RepoHandle>>>,
}

impl HandleRegistry {
    pub fn new(cache: RepoCache) -> Self {
        Self { cache, entries: StdMutex::new(HashMap::new()) }
    }

    /// Registers `(source, ref)`, returning its deterministic id. Calling
    /// this twice with the same inputs returns the same id and does not
    /// construct a second handle.
    pub fn add(&self, source: &str, git_ref: Option<&str>) -> String {
        let id = handle_id(source, git_ref);
        let mut entries = self.entries.lock().unwrap();
        entries.entry(id.clone()).or_insert_with(|| Entry {
            source: source.to_string(),
            git_ref: git_ref.map(|s| s.to_string()),
            handle: Arc::new(OnceCell::new()),
        });
        id
    }

    /// Lazily constructs (or returns the already-constructed) `RepoHandle`
    /// for `handle_id`. Concurrent callers for the same id block on the same
    /// future rather than racing independent constructions.
    pub async fn get(&self, handle_id: &str) -> Result<RepoHandle> {
        let entry_cell = {
            let entries = self.entries.lock().unwrap();
            let entry = entries
                .get(handle_id)
                .ok_or_else(|| Error::NotFound(handle_id.to_string()))?;
            (entry.source.clone(), entry.git_ref.clone(), entry.handle.clone())
        };
        let (source, git_ref, cell) = entry_cell;

        let result = cell
            .get_or_init(|| async { self.construct(handle_id, &source, git_ref.as_deref()).await })
            .await;

        match result {
            Ok(h) => Ok(h.clone()),
            Err(e) => Err(clone_err(e)),
        }
    }

    /// Evicts the in-memory handle. The underlying cache entry (if any) is
    /// untouched — a later `add`+`get` for the same source reuses it.
    pub fn delete(&self, handle_id: &str) {
        self.entries.lock().unwrap().remove(handle_id);
    }

    /// Whether `handle_id` is currently registered, without constructing it.
    pub fn contains(&self, handle_id: &str) -> bool {
        self.entries.lock().unwrap().contains_key(handle_id)
    }

    async fn construct(
        &self,
        handle_id: &str,
        source: &str,
        git_ref: Option<&str>,
    ) -> Result<RepoHandle> {
        let local_path = if Path::new(source).is_dir() {
            Path::new(source).to_path_buf()
        } else {
            self.cache.materialize(source, git_ref).await?
        };

        info!(handle_id, source, "constructing repo handle");
        Ok(RepoHandle::open(
            handle_id.to_string(),
            local_path,
            source.to_string(),
            git_ref.map(|s| s.to_string()),
        )?)
    }
}

fn clone_err(e: &Error) -> Error {
    match e {
        Error::NotFound(s) => Error::NotFound(s.clone()),
        Error::RepoCore(e) => Error::RepoCore(clone_repo_core_err(e)),
        Error::RepoCache(_) => Error::InvalidInput("cache materialization failed".into()),
        Error::InvalidInput(s) => Error::InvalidInput(s.clone()),
    }
}

fn clone_repo_core_err(e: &repo_core::RepoCoreError) -> repo_core::RepoCoreError {
    use repo_core::RepoCoreError::*;
    match e {
        NotFound(s) => NotFound(s.clone()),
        PathEscape => PathEscape,
        RefUnresolvable(s) => RefUnresolvable(s.clone()),
        Unsupported(s) => Unsupported(s.clone()),
        InvalidInput(s) => InvalidInput(s.clone()),
        Internal(s) => Internal(s.clone()),
        Io(e) => Internal(e.to_string()),
    }
}

/// `handle_id = sha256(normalized_source ++ "@" ++ ref_or_empty)`.
///
/// Normalization strips a trailing `.git` suffix and trailing slash and
/// lowercases the source, so `https://github.com/acme/Widgets.git/` and
/// `https://github.com/acme/widgets` collide on the same id.
pub fn handle_id(source: &str, git_ref: Option<&str>) -> String {
    let normalized = normalize_source(source);
    let keyed = format!("{normalized}@{}", git_ref.unwrap_or(""));
    services::stable_id(&keyed)
}

fn normalize_source(source: &str) -> String {
    source
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalent_urls_collide() {
        let a = handle_id("https://github.com/acme/Widgets.git/", None);
        let b = handle_id("https://github.com/acme/widgets", None);
        assert_eq!(a, b);
    }

    #[test]
    fn different_refs_differ() {
        let a = handle_id("acme/widgets", Some("main"));
        let b = handle_id("acme/widgets", Some("dev"));
        assert_ne!(a, b);
    }

    #[test]
    fn add_is_idempotent() {
        let cache = RepoCache::new(std::env::temp_dir().join("hr-test"), 24);
        let registry = HandleRegistry::new(cache);
        let id1 = registry.add("acme/widgets", None);
        let id2 = registry.add("acme/widgets", None);
        assert_eq!(id1, id2);
    }

    #[test]
    fn contains_reflects_delete() {
        let cache = RepoCache::new(std::env::temp_dir().join("hr-test4"), 24);
        let registry = HandleRegistry::new(cache);
        let id = registry.add("acme/widgets", None);
        assert!(registry.contains(&id));
        registry.delete(&id);
        assert!(!registry.contains(&id));
    }

    #[tokio::test]
    async fn get_unregistered_id_is_not_found() {
        let cache = RepoCache::new(std::env::temp_dir().join("hr-test2"), 24);
        let registry = HandleRegistry::new(cache);
        let err = registry.get("missing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn get_local_directory_constructs_handle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();
        let cache = RepoCache::new(std::env::temp_dir().join("hr-test3"), 24);
        let registry = HandleRegistry::new(cache);
        let id = registry.add(dir.path().to_str().unwrap(), None);
        let handle = registry.get(&id).await.unwrap();
        assert!(handle.file_content("a.txt").is_ok());
    }
}
