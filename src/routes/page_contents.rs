// ABOUTME: Page content route handlers
// ABOUTME: Public listing per page, admin create, update and delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::SiteApiContext;
use crate::errors::{AppError, AppResult};
use crate::middleware::require_admin;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sitekit_core::constants::api_paths;
use sitekit_core::models::{NewPageContent, PageContent, UpdatePageContent};
use std::sync::Arc;

/// Query string for the page listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Hide soft-disabled rows
    #[serde(default)]
    pub active_only: bool,
}

/// Page content routes
pub struct PageContentRoutes;

impl PageContentRoutes {
    /// Create the `/api/page-contents` routes
    pub fn routes(context: Arc<SiteApiContext>) -> Router {
        let item_path = format!("{}/:key", api_paths::PAGE_CONTENTS);
        Router::new()
            .route(api_paths::PAGE_CONTENTS, post(Self::handle_create))
            .route(
                &item_path,
                get(Self::handle_list)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(context)
    }

    /// `GET /api/page-contents/:pageId`
    async fn handle_list(
        State(context): State<Arc<SiteApiContext>>,
        Path(page_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Vec<PageContent>>> {
        let rows = context
            .database
            .list_page_contents(&page_id, query.active_only)
            .await?;
        Ok(Json(rows))
    }

    async fn handle_create(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Json(request): Json<NewPageContent>,
    ) -> AppResult<(StatusCode, Json<PageContent>)> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let row = context.database.create_page_content(request).await?;
        tracing::info!(id = row.id, page_id = %row.page_id, "Page content created");
        Ok((StatusCode::CREATED, Json(row)))
    }

    /// `PUT /api/page-contents/:id`
    async fn handle_update(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        Json(request): Json<UpdatePageContent>,
    ) -> AppResult<Json<PageContent>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let row = context
            .database
            .update_page_content(parse_id(&id)?, request)
            .await?;
        Ok(Json(row))
    }

    /// `DELETE /api/page-contents/:id`
    async fn handle_delete(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AppResult<Json<Value>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let id = parse_id(&id)?;
        context.database.delete_page_content(id).await?;
        tracing::info!(id, "Page content deleted");
        Ok(Json(json!({ "success": true })))
    }
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid page content id: {raw}")))
}
