// ABOUTME: In-memory query cache with LRU eviction and glob-pattern invalidation
// ABOUTME: Shared behind an async RwLock so clones of the query client see one store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{CacheConfig, CacheProvider, CachedEntry};
use crate::errors::{AppError, AppResult};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory cache with LRU eviction
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<LruCache<String, CachedEntry>>>,
}

impl InMemoryCache {
    /// Capacity used when the configuration asks for zero entries
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache bounded by `config.max_entries`
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

#[async_trait::async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedEntry> {
        // LruCache::get updates access order, so it needs the write lock
        self.store.write().await.get(key).cloned()
    }

    async fn set(&self, key: &str, entry: CachedEntry) {
        self.store.write().await.push(key.to_owned(), entry);
    }

    async fn invalidate(&self, key: &str) -> bool {
        self.store.write().await.pop(key).is_some()
    }

    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<Vec<String>> {
        let glob_pattern = glob::Pattern::new(pattern).map_err(|e| {
            AppError::invalid_input(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        let mut store = self.store.write().await;
        let keys_to_remove: Vec<String> = store
            .iter()
            .filter(|(k, _)| glob_pattern.matches(k))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys_to_remove {
            store.pop(key);
        }
        drop(store);

        Ok(keys_to_remove)
    }

    async fn stale_keys(&self, stale_time: Duration) -> Vec<String> {
        self.store
            .read()
            .await
            .iter()
            .filter(|(_, entry)| entry.is_stale(stale_time))
            .map(|(k, _)| k.clone())
            .collect()
    }

    async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    async fn clear_all(&self) {
        self.store.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> CachedEntry {
        CachedEntry::new(Arc::new(value))
    }

    #[tokio::test]
    async fn test_lru_evicts_least_recently_used() {
        let cache = InMemoryCache::new(&CacheConfig { max_entries: 2 });
        cache.set("/a", entry(json!(1))).await;
        cache.set("/b", entry(json!(2))).await;
        assert!(cache.get("/a").await.is_some());
        cache.set("/c", entry(json!(3))).await;

        assert!(cache.get("/a").await.is_some());
        assert!(cache.get("/b").await.is_none());
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_invalidate_pattern_matches_prefix() {
        let cache = InMemoryCache::default();
        cache.set("/api/config", entry(json!({}))).await;
        cache.set("/api/config?draft=1", entry(json!({}))).await;
        cache.set("/api/media/1/info", entry(json!({}))).await;

        let mut removed = cache.invalidate_pattern("/api/config*").await.unwrap();
        removed.sort();
        assert_eq!(removed, ["/api/config", "/api/config?draft=1"]);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_stale_entries_are_kept() {
        let cache = InMemoryCache::default();
        cache.set("/api/config", entry(json!({"a": 1}))).await;

        let stale = cache.stale_keys(Duration::ZERO).await;
        assert_eq!(stale, ["/api/config"]);
        assert!(cache.get("/api/config").await.is_some());
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_rejected() {
        let cache = InMemoryCache::default();
        assert!(cache.invalidate_pattern("[").await.is_err());
    }
}
