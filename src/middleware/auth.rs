// ABOUTME: Bearer token authentication and the admin guard for privileged routes
// ABOUTME: Maps the Authorization header to a caller role using the configured admin tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Request authentication.
//!
//! Reads are public. Writes call [`require_admin`], which answers 401 when no
//! bearer token was sent and 403 when the token does not carry the admin role.

use crate::errors::{AppError, AppResult, ErrorCode};
use axum::http::HeaderMap;
use sitekit_core::permissions::Role;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Authenticated caller for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Role granted to the caller
    pub role: Role,
    /// Whether a bearer token was presented
    pub authenticated: bool,
}

impl AuthContext {
    /// Caller without credentials
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            role: Role::Visitor,
            authenticated: false,
        }
    }
}

/// Resolves bearer tokens to roles
#[derive(Clone, Default)]
pub struct BearerAuth {
    admin_tokens: Arc<Vec<String>>,
}

impl BearerAuth {
    /// Create an authenticator that grants admin to the given tokens
    #[must_use]
    pub fn new(admin_tokens: &[String]) -> Self {
        Self {
            admin_tokens: Arc::new(
                admin_tokens
                    .iter()
                    .filter(|token| !token.is_empty())
                    .cloned()
                    .collect(),
            ),
        }
    }

    /// Authenticate a request from its headers
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` when the Authorization header is not a bearer token
    #[tracing::instrument(skip(self, headers), fields(role = tracing::field::Empty))]
    pub fn authenticate_request_with_headers(&self, headers: &HeaderMap) -> AppResult<AuthContext> {
        let Some(header) = headers.get(http::header::AUTHORIZATION) else {
            return Ok(AuthContext::anonymous());
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Authentication failed: malformed authorization header");
                AppError::auth_invalid("Authorization header must be 'Bearer <token>'")
            })?;

        let role = if self.is_admin_token(token) {
            Role::Admin
        } else {
            Role::Visitor
        };
        tracing::Span::current().record("role", tracing::field::display(role));

        Ok(AuthContext {
            role,
            authenticated: true,
        })
    }

    /// Compares against every configured token without short-circuiting
    fn is_admin_token(&self, token: &str) -> bool {
        self.admin_tokens
            .iter()
            .fold(subtle::Choice::from(0), |found, admin| {
                found | admin.as_bytes().ct_eq(token.as_bytes())
            })
            .into()
    }
}

/// Require admin privileges for the caller
///
/// # Errors
///
/// Returns `AuthRequired` (401) for anonymous callers and `PermissionDenied` (403)
/// for authenticated callers without the admin role
pub fn require_admin(auth: &AuthContext) -> AppResult<()> {
    if !auth.authenticated {
        return Err(AppError::auth_required());
    }
    if !auth.role.is_privileged() {
        return Err(AppError::new(
            ErrorCode::PermissionDenied,
            "Admin privileges required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    #[test]
    fn test_missing_header_is_anonymous_and_rejected_by_guard() {
        let auth = BearerAuth::new(&["secret".to_owned()]);
        let ctx = auth.authenticate_request_with_headers(&HeaderMap::new()).unwrap();
        assert_eq!(ctx, AuthContext::anonymous());
        assert_eq!(require_admin(&ctx).unwrap_err().http_status(), 401);
    }

    #[test]
    fn test_admin_token_passes_guard() {
        let auth = BearerAuth::new(&["secret".to_owned()]);
        let ctx = auth
            .authenticate_request_with_headers(&headers_with("Bearer secret"))
            .unwrap();
        assert_eq!(ctx.role, Role::Admin);
        assert!(require_admin(&ctx).is_ok());
    }

    #[test]
    fn test_unknown_token_is_forbidden() {
        let auth = BearerAuth::new(&["secret".to_owned()]);
        let ctx = auth
            .authenticate_request_with_headers(&headers_with("Bearer other"))
            .unwrap();
        assert_eq!(require_admin(&ctx).unwrap_err().http_status(), 403);
    }

    #[test]
    fn test_token_must_match_exactly() {
        let auth = BearerAuth::new(&["first".to_owned(), "second".to_owned(), String::new()]);
        for (value, expected) in [
            ("Bearer second", Role::Admin),
            ("Bearer first", Role::Admin),
            ("Bearer secon", Role::Visitor),
            ("Bearer second2", Role::Visitor),
            ("Bearer SECOND", Role::Visitor),
        ] {
            let ctx = auth
                .authenticate_request_with_headers(&headers_with(value))
                .unwrap();
            assert_eq!(ctx.role, expected, "{value}");
        }
    }

    #[test]
    fn test_malformed_header_is_invalid() {
        let auth = BearerAuth::default();
        let err = auth
            .authenticate_request_with_headers(&headers_with("Basic abc"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthInvalid);
    }
}
