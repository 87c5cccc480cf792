// ABOUTME: Configuration module for server and client settings
// ABOUTME: Server settings come from the environment and clap flags; client settings drive the query cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration for the site server and the client runtime
//!
//! - **Environment**: server configuration from environment variables
//! - **Client**: base URL, staleness and retry settings for the query cache

/// Client fetch/cache configuration
pub mod client;
/// Environment and server configuration
pub mod environment;

pub use client::ClientConfig;
pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, MediaConfig, SecurityConfig,
    ServerConfig,
};
