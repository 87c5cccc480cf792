// ABOUTME: Media route handlers for multipart upload, byte delivery, metadata and deletion
// ABOUTME: Uploads are size-limited and transcoded best-effort before being stored in the row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::SiteApiContext;
use crate::database::NewMediaFile;
use crate::errors::{AppError, AppResult};
use crate::media::process_upload;
use crate::middleware::require_admin;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use sitekit_core::constants::{api_paths, media};
use sitekit_core::models::{MediaInfo, MediaUploadResponse};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Multipart framing allowance on top of the file size limit
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Media routes
pub struct MediaRoutes;

impl MediaRoutes {
    /// Create the `/api/media` routes
    pub fn routes(context: Arc<SiteApiContext>) -> Router {
        let body_limit = context.media.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
        Router::new()
            .route(
                api_paths::MEDIA_UPLOAD,
                post(Self::handle_upload).layer(DefaultBodyLimit::max(body_limit)),
            )
            .route(
                &format!("{}/:id", api_paths::MEDIA),
                get(Self::handle_get).delete(Self::handle_delete),
            )
            .route(&format!("{}/:id/info", api_paths::MEDIA), get(Self::handle_info))
            .with_state(context)
    }

    async fn handle_upload(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> AppResult<Json<MediaUploadResponse>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let limit = context.media.max_upload_bytes;
        let too_large = |e: &axum::extract::multipart::MultipartError| {
            e.status() == StatusCode::PAYLOAD_TOO_LARGE
        };

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            if too_large(&e) {
                AppError::payload_too_large(limit)
            } else {
                AppError::invalid_input(format!("Invalid multipart body: {e}"))
            }
        })? {
            if field.name() != Some(media::UPLOAD_FIELD_NAME) {
                continue;
            }

            let original_name = field.file_name().unwrap_or("upload").to_owned();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let data = field.bytes().await.map_err(|e| {
                if too_large(&e) {
                    AppError::payload_too_large(limit)
                } else {
                    AppError::invalid_input(format!("Failed to read upload: {e}"))
                }
            })?;

            if data.is_empty() {
                return Err(AppError::invalid_input("Uploaded file is empty"));
            }
            if data.len() > limit {
                warn!(size = data.len(), limit, "Upload rejected: too large");
                return Err(AppError::payload_too_large(limit));
            }

            let settings = context.media.clone();
            let name = original_name.clone();
            let processed = tokio::task::spawn_blocking(move || {
                process_upload(data.to_vec(), &mime_type, &name, &settings)
            })
            .await
            .map_err(|e| AppError::internal(format!("Media processing task failed: {e}")))?;

            let filename = format!("{}.{}", Uuid::new_v4(), processed.extension);
            let file = context
                .database
                .create_media_file(NewMediaFile {
                    object_key: format!("{}/{filename}", media::OBJECT_KEY_PREFIX),
                    filename,
                    original_name,
                    mime_type: processed.mime_type,
                    data: processed.data,
                })
                .await?;

            info!(
                id = file.id,
                size = file.size,
                transcoded = processed.transcoded,
                "Media uploaded"
            );
            return Ok(Json(MediaUploadResponse::from(&file)));
        }

        Err(AppError::new(
            crate::errors::ErrorCode::MissingRequiredField,
            format!("Multipart field '{}' is required", media::UPLOAD_FIELD_NAME),
        ))
    }

    /// Stream the stored bytes
    async fn handle_get(
        State(context): State<Arc<SiteApiContext>>,
        Path(id): Path<String>,
    ) -> AppResult<Response> {
        let file = context.database.get_media_file(parse_id(&id)?).await?;
        let content_type = HeaderValue::from_str(&file.mime_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

        Ok((
            [
                (header::CONTENT_TYPE, content_type),
                (header::CONTENT_LENGTH, HeaderValue::from(file.data.len())),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static(media::MEDIA_CACHE_CONTROL),
                ),
            ],
            file.data,
        )
            .into_response())
    }

    async fn handle_info(
        State(context): State<Arc<SiteApiContext>>,
        Path(id): Path<String>,
    ) -> AppResult<Json<MediaInfo>> {
        Ok(Json(context.database.get_media_info(parse_id(&id)?).await?))
    }

    async fn handle_delete(
        State(context): State<Arc<SiteApiContext>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> AppResult<Json<Value>> {
        let auth = context.auth.authenticate_request_with_headers(&headers)?;
        require_admin(&auth)?;

        let id = parse_id(&id)?;
        context.database.delete_media_file(id).await?;
        info!(id, "Media deleted");
        Ok(Json(json!({ "success": true })))
    }
}

fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::invalid_input(format!("Invalid media id: {raw}")))
}
