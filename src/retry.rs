// ABOUTME: Retry policy for transient read failures in the client fetch layer
// ABOUTME: Exponential backoff bounded by a maximum attempt count; writes never go through here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::client::ClientError;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use sitekit_core::constants::retry;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retry policy with exponential backoff and an attempt cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Total attempts including the first one; 1 disables retries
    pub max_attempts: u32,
    /// Initial retry interval in milliseconds
    pub initial_interval_ms: u64,
    /// Maximum retry interval cap in milliseconds
    pub max_interval_ms: u64,
    /// Randomization factor in range [0.0, 1.0]
    pub randomization_factor: f64,
    /// Multiplicative factor for each retry step
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            initial_interval_ms: retry::DEFAULT_INITIAL_INTERVAL_MS,
            max_interval_ms: retry::DEFAULT_MAX_INTERVAL_MS,
            randomization_factor: 0.2,
            multiplier: retry::DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Policy that fails on the first error
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Policy with `max_attempts` and near-zero delays, for tests
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_interval_ms: 1,
            max_interval_ms: 1,
            randomization_factor: 0.0,
            multiplier: 1.0,
        }
    }
}

/// Build an `ExponentialBackoff` from a policy; the attempt cap is enforced by the caller
#[must_use]
pub fn build_exponential_backoff(policy: &RetryPolicy) -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(policy.initial_interval_ms.max(1)),
        current_interval: Duration::from_millis(policy.initial_interval_ms.max(1)),
        max_interval: Duration::from_millis(policy.max_interval_ms.max(policy.initial_interval_ms)),
        randomization_factor: policy.randomization_factor.clamp(0.0, 1.0),
        multiplier: policy.multiplier.max(1.0),
        max_elapsed_time: None,
        ..ExponentialBackoff::default()
    }
}

/// Run `operation`, retrying only errors for which [`ClientError::is_retryable`] holds
///
/// # Errors
///
/// Returns the first non-retryable error, or the last error once attempts run out
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut backoff = build_exponential_backoff(policy);
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = backoff
                    .next_backoff()
                    .unwrap_or_else(|| Duration::from_millis(policy.max_interval_ms));
                debug!(attempt, max_attempts, ?delay, error = %e, "Transient failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
