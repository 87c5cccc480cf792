// ABOUTME: Client-side configuration for the config fetch and query cache layer
// ABOUTME: Reads API base URL, staleness window, focus refetch and retry settings from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use sitekit_core::constants::cache;
use std::env;
use std::fmt;
use std::time::Duration;

/// Settings for [`crate::client::QueryClient`] and [`crate::client::ApiClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the site API, without a trailing slash
    pub base_url: String,
    /// Bearer token attached to every request, if any
    pub bearer_token: Option<String>,
    /// How long a cached entry counts as fresh
    pub stale_time: Duration,
    /// Refetch stale entries when the host regains focus
    pub refetch_on_focus: bool,
    /// Retry policy for reads
    pub retry: RetryPolicy,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Maximum number of cached entries
    pub cache_capacity: usize,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[redacted]"))
            .field("stale_time", &self.stale_time)
            .field("refetch_on_focus", &self.refetch_on_focus)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with defaults for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            bearer_token: None,
            stale_time: Duration::from_secs(cache::DEFAULT_STALE_TIME_SECS),
            refetch_on_focus: true,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(cache::DEFAULT_REQUEST_TIMEOUT_SECS),
            cache_capacity: cache::DEFAULT_CACHE_MAX_ENTRIES,
        }
    }

    /// Attach a bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Override the staleness window
    #[must_use]
    pub const fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Override the retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Load client configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SITEKIT_API_URL").unwrap_or_else(|_| "http://localhost:8081".into());
        let mut config = Self::new(base_url);

        config.bearer_token = env::var("SITEKIT_API_TOKEN").ok().filter(|t| !t.is_empty());

        if let Ok(value) = env::var("SITEKIT_STALE_TIME_SECS") {
            let secs: u64 = value.parse().context("Invalid SITEKIT_STALE_TIME_SECS value")?;
            config.stale_time = Duration::from_secs(secs);
        }
        if let Ok(value) = env::var("SITEKIT_REFETCH_ON_FOCUS") {
            config.refetch_on_focus = !matches!(value.as_str(), "false" | "0");
        }
        if let Ok(value) = env::var("SITEKIT_RETRY_ATTEMPTS") {
            config.retry.max_attempts = value
                .parse()
                .context("Invalid SITEKIT_RETRY_ATTEMPTS value")?;
        }
        if let Ok(value) = env::var("SITEKIT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = value
                .parse()
                .context("Invalid SITEKIT_REQUEST_TIMEOUT_SECS value")?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8081")
    }
}
