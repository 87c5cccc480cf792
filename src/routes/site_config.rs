// ABOUTME: Site configuration route handlers
// ABOUTME: Public read, admin full-document replace, and admin path-scoped patch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::SiteApiContext;
use crate::errors::AppResult;
use crate::middleware::require_admin;
use axum::{extract::State, http::HeaderMap, routing::get, Json, Router};
use sitekit_core::constants::api_paths;
use sitekit_core::models::{PatchSiteConfigRequest, SiteConfigRecord, UpdateSiteConfigRequest};
use std::sync::Arc;
use tracing::info;

/// Site configuration routes
pub struct SiteConfigRoutes;

impl SiteConfigRoutes {
    /// Create the `/api/config` routes
    pub fn routes(context: Arc<SiteApiContext>) -> Router {
        Router::new()
            .route(
                api_paths::CONFIG,
                get(Self::handle_get)
                    .put(Self::handle_replace)
                    .patch(Self::handle_patch),
            )
            .with_state(context)
    }

    async fn handle_get(
        State(context): State<Arc<SiteApiContext>>,
    ) -> AppResult<Json<SiteConfigRecord>> {
        Ok(Json(context.database.get_site_config().await?))
    }

    async fn handle_replace(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Json(request): Json<UpdateSiteConfigRequest>,
    ) -> AppResult<Json<SiteConfigRecord>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let record = context.database.replace_site_config(request.config).await?;
        info!("Site configuration replaced");
        Ok(Json(record))
    }

    async fn handle_patch(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Json(request): Json<PatchSiteConfigRequest>,
    ) -> AppResult<Json<SiteConfigRecord>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let record = context
            .database
            .patch_site_config(&request.path, request.value)
            .await?;
        info!(path = %request.path, "Site configuration patched");
        Ok(Json(record))
    }
}
