// ABOUTME: Core types and constants for the Sitekit site configuration platform
// ABOUTME: Foundation crate with error handling, domain models, permissions, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Sitekit Core
//!
//! Foundation crate shared by the HTTP server and the config client. It is
//! designed to change infrequently so the workspace keeps incremental
//! compilation benefits.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Defaults organized by domain
//! - **models**: Persisted entities and REST payloads
//! - **permissions**: Caller roles

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Core data models (site config, page content, media)
pub mod models;

/// Caller roles and privilege checks
pub mod permissions;
