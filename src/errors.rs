// ABOUTME: Error types for the sitekit crate, re-exported from sitekit-core
// ABOUTME: Server code returns AppResult; client code uses ClientError from the client module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling System
//!
//! [`AppError`] lives in the core crate so the HTTP layer and the database
//! layer agree on codes and status mapping.

pub use sitekit_core::errors::*;
