// ABOUTME: Query cache constants for staleness, capacity, and cleanup intervals
// ABOUTME: Defaults for the client-side config fetch/cache layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Default maximum entries held by the in-memory query cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 256;

/// Default staleness window; older entries are eligible for background refresh
pub const DEFAULT_STALE_TIME_SECS: u64 = 60;

/// Default request timeout for API calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Capacity of the cache event broadcast channel
pub const CACHE_EVENT_CHANNEL_CAPACITY: usize = 64;
