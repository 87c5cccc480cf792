// ABOUTME: Main library entry point for the sitekit site backend and client runtime
// ABOUTME: Config document store, media and content routes, query cache, theme pipeline and inline editing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Sitekit
//!
//! Backend and client runtime for a configurable small-business site. One
//! JSON configuration document drives copy, theme, navigation and module
//! toggles; admins edit it in place.
//!
//! ## Architecture
//!
//! Server side:
//! - **Database**: `SQLite` store for the config document, page contents and media
//! - **Routes**: `/api/config`, `/api/page-contents`, `/api/media` and health checks
//! - **Middleware**: bearer token authentication and CORS
//!
//! Client side:
//! - **Client**: HTTP transport plus a de-duplicating, invalidating query cache
//! - **Schema**: one resolution step that fills every config default
//! - **Modules** and **Navigation**: route gating and menu derivation
//! - **Theme**: CSS variables, presets and the single-writer theme state
//! - **Editor**: path-scoped merge and the inline edit flow
//! - **Runtime**: boot and refresh wiring
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sitekit::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Sitekit configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Client query cache storage
pub mod cache;
/// HTTP client, query cache client and typed endpoints
pub mod client;
/// Server and client configuration
pub mod config;
/// `SQLite` persistence
pub mod database;
/// Path-scoped merge and inline editing
pub mod editor;
/// Unified error handling
pub mod errors;
/// Production logging and structured output
pub mod logging;
/// Upload normalization
pub mod media;
/// Authentication and CORS middleware
pub mod middleware;
/// Module gate
pub mod modules;
/// Navbar and sidebar derivation
pub mod navigation;
/// Retry policy for transient read failures
pub mod retry;
/// HTTP routes
pub mod routes;
/// Client runtime wiring
pub mod runtime;
/// Typed site settings
pub mod schema;
/// HTTP server assembly
pub mod server;
/// Theme resolution pipeline
pub mod theme;
