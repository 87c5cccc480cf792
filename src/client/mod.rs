// ABOUTME: Client fetch layer for the site API
// ABOUTME: HTTP transport, error classification, the caching query client and the typed config client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Typed endpoints
pub mod config;
/// Error classification
pub mod error;
/// HTTP transport
pub mod http;
/// Cached, de-duplicating reads
pub mod query;

pub use config::ConfigClient;
pub use error::ClientError;
pub use http::ApiClient;
pub use query::{CacheEvent, QueryClient, UnauthorizedPolicy};
