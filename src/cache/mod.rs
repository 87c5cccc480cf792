// ABOUTME: Cache abstraction for the client query layer keyed by API path
// ABOUTME: Entries carry their fetch time; staleness is advisory and never evicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// In-memory cache implementation
pub mod memory;

pub use memory::InMemoryCache;

use crate::errors::AppResult;
use serde_json::Value;
use sitekit_core::constants::cache::DEFAULT_CACHE_MAX_ENTRIES;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cached response body and when it was fetched
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// Decoded response body
    pub value: Arc<Value>,
    /// When the body was received
    pub fetched_at: Instant,
}

impl CachedEntry {
    /// Entry fetched now
    #[must_use]
    pub fn new(value: Arc<Value>) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    /// Whether the entry is older than `stale_time`
    ///
    /// Stale entries are still served; staleness only makes them eligible
    /// for a background refetch.
    #[must_use]
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_time
    }
}

/// Storage backend for the query cache
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync {
    /// Look up an entry, marking it recently used
    async fn get(&self, key: &str) -> Option<CachedEntry>;

    /// Store an entry, evicting the least recently used one when full
    async fn set(&self, key: &str, entry: CachedEntry);

    /// Remove one entry; returns whether it existed
    async fn invalidate(&self, key: &str) -> bool;

    /// Remove every entry whose key matches a glob pattern (e.g. `/api/config*`)
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob
    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<Vec<String>>;

    /// Keys of entries older than `stale_time`
    async fn stale_keys(&self, stale_time: Duration) -> Vec<String>;

    /// Number of cached entries
    async fn len(&self) -> usize;

    /// Whether the cache holds no entries
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Clear all cache entries
    async fn clear_all(&self);
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}
