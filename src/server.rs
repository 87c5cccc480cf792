// ABOUTME: HTTP server assembly for the site API
// ABOUTME: Merges route modules, applies tracing and CORS layers, and serves with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::{setup_cors, BearerAuth};
use crate::routes::{
    HealthRoutes, MediaRoutes, PageContentRoutes, SiteApiContext, SiteConfigRoutes,
};
use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Site API server
pub struct SiteServer {
    config: ServerConfig,
    context: Arc<SiteApiContext>,
}

impl SiteServer {
    /// Create a server over an opened database
    #[must_use]
    pub fn new(config: ServerConfig, database: Database) -> Self {
        let context = Arc::new(SiteApiContext::new(
            Arc::new(database),
            BearerAuth::new(&config.auth.admin_tokens),
            config.media.clone(),
        ));
        Self { config, context }
    }

    /// Build the complete router
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(&self.context, &self.config)
    }

    /// Bind and serve until ctrl-c
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the server fails
    pub async fn run(self) -> Result<()> {
        let addr = SocketAddr::new(self.config.host, self.config.http_port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("HTTP server listening on http://{addr}");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the router from a shared context
pub fn build_router(context: &Arc<SiteApiContext>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(context.clone()))
        .merge(SiteConfigRoutes::routes(context.clone()))
        .merge(PageContentRoutes::routes(context.clone()))
        .merge(MediaRoutes::routes(context.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(setup_cors(&config.security))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
