//! Per-file symbol cache, keyed by `(handle_id, relative_path, mtime, size)`.
//!
//! Handles are immutable once materialized, so a cache entry never needs
//! active invalidation — a changed `mtime`/`size` simply misses and
//! re-populates under a new key.

use crate::types::Symbol;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    handle_id: String,
    relative_path: String,
    mtime_secs: i64,
    size: u64,
}

#[derive(Default)]
pub struct SymbolCache {
    entries: Mutex<HashMap<CacheKey, Vec<Symbol>>>,
}

impl SymbolCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_with(
        &self,
        handle_id: &str,
        relative_path: &str,
        mtime_secs: i64,
        size: u64,
        compute: impl FnOnce() -> crate::errors::Result<Vec<Symbol>>,
    ) -> crate::errors::Result<Vec<Symbol>> {
        let key = CacheKey {
            handle_id: handle_id.to_string(),
            relative_path: relative_path.to_string(),
            mtime_secs,
            size,
        };

        if let Some(hit) = self.entries.lock().unwrap().get(&key) {
            return Ok(hit.clone());
        }

        let computed = compute()?;
        self.entries.lock().unwrap().insert(key, computed.clone());
        Ok(computed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_is_not_recomputed() {
        let cache = SymbolCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            cache
                .get_or_insert_with("h1", "a.rs", 100, 10, || {
                    calls += 1;
                    Ok(vec![])
                })
                .unwrap();
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn different_mtime_recomputes() {
        let cache = SymbolCache::new();
        let mut calls = 0;
        cache.get_or_insert_with("h1", "a.rs", 100, 10, || { calls += 1; Ok(vec![]) }).unwrap();
        cache.get_or_insert_with("h1", "a.rs", 101, 10, || { calls += 1; Ok(vec![]) }).unwrap();
        assert_eq!(calls, 2);
    }
}
