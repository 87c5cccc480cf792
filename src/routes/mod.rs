// ABOUTME: HTTP route modules for the site API
// ABOUTME: Shared handler context plus config, page content, media and health routers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Route handlers.
//!
//! Each route struct exposes `routes(context) -> Router`; the server merges
//! them and adds the tracing and CORS layers.

/// Health and readiness probes
pub mod health;
/// Media upload and delivery
pub mod media;
/// Page content CRUD
pub mod page_contents;
/// Site configuration document
pub mod site_config;

pub use health::HealthRoutes;
pub use media::MediaRoutes;
pub use page_contents::PageContentRoutes;
pub use site_config::SiteConfigRoutes;

use crate::config::MediaConfig;
use crate::database::Database;
use crate::middleware::BearerAuth;
use std::sync::Arc;

/// State shared by every handler
#[derive(Clone)]
pub struct SiteApiContext {
    /// Storage
    pub database: Arc<Database>,
    /// Bearer token authenticator
    pub auth: BearerAuth,
    /// Upload processing limits
    pub media: MediaConfig,
}

impl SiteApiContext {
    /// Bundle the handler dependencies
    #[must_use]
    pub fn new(database: Arc<Database>, auth: BearerAuth, media: MediaConfig) -> Self {
        Self {
            database,
            auth,
            media,
        }
    }
}
