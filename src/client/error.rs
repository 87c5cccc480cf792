// ABOUTME: Error type for the client fetch layer and the inline editor
// ABOUTME: Classifies failures so only transient network errors are retried
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use thiserror::Error;

/// Failure of a request made through the client layer
///
/// `Clone` so one de-duplicated fetch can hand the same result to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Connection or timeout failure that may succeed on retry
    #[error("transient network failure: {0}")]
    Transient(String),

    /// The server answered 401
    #[error("authentication required")]
    Unauthorized,

    /// The server answered 403, or the caller's role does not allow the operation
    #[error("permission denied")]
    Forbidden,

    /// The server answered 404
    #[error("resource not found")]
    NotFound,

    /// Any other non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code
        status: u16,
        /// Response body, possibly the JSON error envelope
        body: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// A config path could not be parsed or resolved against the document
    #[error("invalid config path: {0}")]
    InvalidPath(String),
}

impl ClientError {
    /// Whether the read path may retry this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Map a non-success HTTP status and body to an error
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Http { status, body },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::Transient(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
