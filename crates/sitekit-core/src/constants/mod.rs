// ABOUTME: Application-wide constants organized by domain
// ABOUTME: Cache, retry, media, theme and API path defaults shared by server and client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Client query cache defaults
pub mod cache;

/// Media upload and delivery limits
pub mod media;

/// Theme resolution defaults
pub mod theme;

/// REST API paths shared by routes and the HTTP client
pub mod api_paths {
    /// Site configuration document
    pub const CONFIG: &str = "/api/config";
    /// Page content collection
    pub const PAGE_CONTENTS: &str = "/api/page-contents";
    /// Media collection
    pub const MEDIA: &str = "/api/media";
    /// Media upload endpoint
    pub const MEDIA_UPLOAD: &str = "/api/media/upload";
}

/// Retry policy defaults for transient read failures
pub mod retry {
    /// Maximum attempts including the first one
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// First backoff interval
    pub const DEFAULT_INITIAL_INTERVAL_MS: u64 = 500;
    /// Upper bound for a single backoff interval
    pub const DEFAULT_MAX_INTERVAL_MS: u64 = 8_000;
    /// Exponential growth factor between attempts
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;
}
