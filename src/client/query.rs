// ABOUTME: Query client that caches GET responses by path with de-duplication and invalidation
// ABOUTME: Stale entries are served while a single background refetch runs; writes invalidate by prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Query Client
//!
//! Reads go through [`QueryClient::get`]:
//!
//! - a fresh cached entry is returned as is;
//! - a stale entry is returned and one background refetch is started;
//! - a miss fetches with the retry policy.
//!
//! Concurrent reads of the same path share one request. Every key carries a
//! generation number that invalidation bumps; a fetch started under an older
//! generation never writes its result into the cache, so a read issued after
//! a successful write cannot observe the pre-write value.

use super::{ApiClient, ClientError};
use crate::cache::{CacheConfig, CacheProvider, CachedEntry, InMemoryCache};
use crate::config::ClientConfig;
use crate::retry::retry_transient;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::Method;
use serde_json::Value;
use sitekit_core::constants::cache::CACHE_EVENT_CHANNEL_CAPACITY;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

/// What a read does when the server answers 401
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnauthorizedPolicy {
    /// Resolve to `None`
    #[default]
    ReturnNull,
    /// Fail with [`ClientError::Unauthorized`]
    Throw,
}

/// Cache change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fresh value was stored for the key
    Updated(String),
    /// The key was dropped and the next read will refetch
    Invalidated(String),
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<Value>, ClientError>>>;

struct InFlight {
    generation: u64,
    /// Started by `fetch_fresh`, so it bypassed any cached value
    fresh: bool,
    future: SharedFetch,
}

#[derive(Default)]
struct QueryState {
    in_flight: HashMap<String, InFlight>,
    generations: HashMap<String, u64>,
}

impl QueryState {
    fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }

    fn bump(&mut self, key: &str) {
        *self.generations.entry(key.to_owned()).or_insert(0) += 1;
        self.in_flight.remove(key);
    }
}

struct QueryInner {
    api: ApiClient,
    cache: Arc<dyn CacheProvider>,
    config: ClientConfig,
    state: Mutex<QueryState>,
    events: broadcast::Sender<CacheEvent>,
}

/// Cached, de-duplicating read client with write invalidation
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<QueryInner>,
}

impl QueryClient {
    /// Create a query client with an in-memory LRU cache
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let cache = InMemoryCache::new(&CacheConfig {
            max_entries: config.cache_capacity,
        });
        Self::with_cache(config, Arc::new(cache))
    }

    /// Create a query client over a custom cache backend
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn with_cache(
        config: ClientConfig,
        cache: Arc<dyn CacheProvider>,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config)?;
        let (events, _) = broadcast::channel(CACHE_EVENT_CHANNEL_CAPACITY);
        Ok(Self {
            inner: Arc::new(QueryInner {
                api,
                cache,
                config,
                state: Mutex::new(QueryState::default()),
                events,
            }),
        })
    }

    /// Underlying HTTP client, for uncached calls
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Client configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Subscribe to cache updates and invalidations
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Cached value for `path`, without fetching
    pub async fn cached(&self, path: &str) -> Option<Arc<Value>> {
        self.inner.cache.get(path).await.map(|entry| entry.value)
    }

    /// Read `path` through the cache
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after retries; a 401 is an error only under
    /// [`UnauthorizedPolicy::Throw`]
    pub async fn get(
        &self,
        path: &str,
        on_unauthorized: UnauthorizedPolicy,
    ) -> Result<Option<Arc<Value>>, ClientError> {
        if let Some(entry) = self.inner.cache.get(path).await {
            if entry.is_stale(self.inner.config.stale_time) {
                self.spawn_refresh(path).await;
            }
            return Ok(Some(entry.value));
        }

        match self.shared_fetch(path).await.await {
            Ok(value) => Ok(Some(value)),
            Err(ClientError::Unauthorized) if on_unauthorized == UnauthorizedPolicy::ReturnNull => {
                debug!(path, "Unauthorized read resolved to null");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch `path` from the network, ignoring the cached value
    ///
    /// Joins a fetch already started by another `fetch_fresh` call for the
    /// same key; any other in-flight read is superseded. The result replaces
    /// the cached entry.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after retries
    pub async fn fetch_fresh(&self, path: &str) -> Result<Arc<Value>, ClientError> {
        let fetch = {
            let mut state = self.inner.state.lock().await;
            let generation = state.generation(path);
            let joinable = state
                .in_flight
                .get(path)
                .filter(|in_flight| in_flight.fresh && in_flight.generation == generation)
                .map(|in_flight| in_flight.future.clone());
            joinable.unwrap_or_else(|| {
                state.bump(path);
                self.start_fetch(&mut state, path, true)
            })
        };
        fetch.await
    }

    /// Send a write; never retried
    ///
    /// On success every cached entry under the written resource (e.g.
    /// `/api/config*` or `/api/page-contents*`) is invalidated.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; the cache is untouched on failure
    pub async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Value, ClientError> {
        let response = self.inner.api.send_json(method, path, body).await?;
        self.invalidate_resource(path).await;
        Ok(response)
    }

    /// Invalidate every entry under the resource `path` belongs to
    pub async fn invalidate_resource(&self, path: &str) {
        let pattern = format!("{}*", glob::Pattern::escape(resource_root(path)));
        if let Err(e) = self.invalidate_matching(&pattern).await {
            warn!(error = %e, path, "Failed to invalidate resource");
        }
    }

    /// Drop one entry; the next read refetches
    pub async fn invalidate(&self, path: &str) {
        let mut state = self.inner.state.lock().await;
        state.bump(path);
        self.inner.cache.invalidate(path).await;
        drop(state);
        let _ = self.inner.events.send(CacheEvent::Invalidated(path.to_owned()));
    }

    /// Drop every cached or in-flight entry whose key matches a glob pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob
    pub async fn invalidate_matching(&self, pattern: &str) -> Result<Vec<String>, ClientError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ClientError::InvalidPath(format!("{pattern}: {e}")))?;

        let mut state = self.inner.state.lock().await;
        let mut keys = self
            .inner
            .cache
            .invalidate_pattern(pattern)
            .await
            .map_err(|e| ClientError::InvalidPath(e.message))?;
        keys.extend(
            state
                .in_flight
                .keys()
                .filter(|k| glob_pattern.matches(k))
                .cloned(),
        );
        keys.sort();
        keys.dedup();
        for key in &keys {
            state.bump(key);
        }
        drop(state);

        for key in &keys {
            let _ = self.inner.events.send(CacheEvent::Invalidated(key.clone()));
        }
        debug!(pattern, count = keys.len(), "Cache entries invalidated");
        Ok(keys)
    }

    /// Host regained focus: refetch stale entries when enabled
    ///
    /// Returns the number of entries refetched successfully.
    pub async fn notify_focus(&self) -> usize {
        if !self.inner.config.refetch_on_focus {
            return 0;
        }
        let stale = self.inner.cache.stale_keys(self.inner.config.stale_time).await;
        let mut fetches = Vec::with_capacity(stale.len());
        for key in &stale {
            fetches.push(self.shared_fetch(key).await);
        }
        futures_util::future::join_all(fetches)
            .await
            .into_iter()
            .filter(Result::is_ok)
            .count()
    }

    async fn spawn_refresh(&self, path: &str) {
        let fetch = self.shared_fetch(path).await;
        let path = path.to_owned();
        tokio::spawn(async move {
            if let Err(e) = fetch.await {
                debug!(path, error = %e, "Background refetch failed");
            }
        });
    }

    /// Join the in-flight fetch for `path`, or start one
    async fn shared_fetch(&self, path: &str) -> SharedFetch {
        let mut state = self.inner.state.lock().await;
        let generation = state.generation(path);
        if let Some(in_flight) = state.in_flight.get(path) {
            if in_flight.generation == generation {
                return in_flight.future.clone();
            }
        }
        self.start_fetch(&mut state, path, false)
    }

    /// Register a new in-flight fetch under the current generation
    fn start_fetch(&self, state: &mut QueryState, path: &str, fresh: bool) -> SharedFetch {
        let generation = state.generation(path);
        let this = self.clone();
        let key = path.to_owned();
        let future = async move { this.fetch_and_store(key, generation).await }
            .boxed()
            .shared();
        state.in_flight.insert(
            path.to_owned(),
            InFlight {
                generation,
                fresh,
                future: future.clone(),
            },
        );
        future
    }

    async fn fetch_and_store(&self, key: String, generation: u64) -> Result<Arc<Value>, ClientError> {
        let api = &self.inner.api;
        let result = retry_transient(&self.inner.config.retry, || api.get_json(&key))
            .await
            .map(Arc::new);

        let mut state = self.inner.state.lock().await;
        let current = state.generation(&key) == generation;
        if current {
            state.in_flight.remove(&key);
        }
        let stored = match (&result, current) {
            (Ok(value), true) => {
                self.inner.cache.set(&key, CachedEntry::new(value.clone())).await;
                true
            }
            _ => false,
        };
        drop(state);

        if stored {
            let _ = self.inner.events.send(CacheEvent::Updated(key));
        } else if result.is_ok() {
            debug!(key, "Discarded response fetched before invalidation");
        }
        result
    }
}

/// `/api/<resource>` prefix of a path; other paths are their own root
fn resource_root(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    path.match_indices('/')
        .nth(2)
        .map_or(path, |(idx, _)| &path[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_root() {
        assert_eq!(resource_root("/api/config"), "/api/config");
        assert_eq!(resource_root("/api/page-contents/12"), "/api/page-contents");
        assert_eq!(resource_root("/api/media/4/info"), "/api/media");
        assert_eq!(resource_root("/api/config?x=1"), "/api/config");
        assert_eq!(resource_root("/health"), "/health");
    }
}
