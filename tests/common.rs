// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database, handler context and router construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `sitekit`

use anyhow::Result;
use sitekit::{
    config::{environment::ServerConfig, AuthConfig, MediaConfig},
    database::Database,
    middleware::BearerAuth,
    routes::SiteApiContext,
    server::build_router,
};
use std::sync::{Arc, Once};

/// Token granted the admin role in tests
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Token that authenticates but is not an admin
pub const VISITOR_TOKEN: &str = "test-visitor-token";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", 1).await?;
    Ok(Arc::new(database))
}

/// Server configuration with the test admin token
pub fn test_server_config(media: MediaConfig) -> ServerConfig {
    ServerConfig {
        auth: AuthConfig {
            admin_tokens: vec![ADMIN_TOKEN.to_owned()],
        },
        media,
        ..ServerConfig::default()
    }
}

/// Handler context over a fresh in-memory database
pub async fn create_test_context(media: MediaConfig) -> Result<Arc<SiteApiContext>> {
    let database = create_test_database().await?;
    Ok(Arc::new(SiteApiContext::new(
        database,
        BearerAuth::new(&[ADMIN_TOKEN.to_owned()]),
        media,
    )))
}

/// Full application router over a fresh in-memory database
pub async fn create_test_router() -> Result<(axum::Router, Arc<SiteApiContext>)> {
    create_test_router_with_media(MediaConfig::default()).await
}

/// Full application router with custom media limits
pub async fn create_test_router_with_media(
    media: MediaConfig,
) -> Result<(axum::Router, Arc<SiteApiContext>)> {
    let context = create_test_context(media.clone()).await?;
    let router = build_router(&context, &test_server_config(media));
    Ok((router, context))
}

/// Serve the full application on an ephemeral local port; returns the base URL
pub async fn spawn_test_server() -> Result<(String, Arc<SiteApiContext>)> {
    let (router, context) = create_test_router().await?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Test server stopped");
        }
    });
    Ok((format!("http://{addr}"), context))
}

/// Config client against `base_url` with fast retries
pub fn test_config_client(base_url: &str, token: Option<&str>) -> sitekit::client::ConfigClient {
    let mut config = sitekit::config::ClientConfig::new(base_url)
        .with_retry(sitekit::retry::RetryPolicy::immediate(2));
    if let Some(token) = token {
        config = config.with_bearer_token(token);
    }
    let query = sitekit::client::QueryClient::new(config).expect("query client");
    sitekit::client::ConfigClient::new(query)
}
