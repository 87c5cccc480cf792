// ABOUTME: HTTP middleware for authentication and cross-origin access
// ABOUTME: Bearer token roles, the admin guard, and the CORS layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Bearer authentication and admin guard
pub mod auth;
/// CORS configuration
pub mod cors;

pub use auth::{require_admin, AuthContext, BearerAuth};
pub use cors::setup_cors;
