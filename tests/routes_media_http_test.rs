// ABOUTME: HTTP integration tests for media upload, delivery, metadata and deletion
// ABOUTME: Checks best-effort transcoding, size limits and the response headers of byte delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_router, create_test_router_with_media, ADMIN_TOKEN, VISITOR_TOKEN};
use helpers::axum_test::AxumTestRequest;
use image::{ImageFormat, RgbaImage};
use serde_json::Value;
use sitekit::config::MediaConfig;
use sitekit_core::models::{MediaInfo, MediaUploadResponse};
use std::io::Cursor;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

#[tokio::test]
async fn test_upload_downscales_large_png() {
    let (router, _) = create_test_router_with_media(MediaConfig {
        max_dimension: 64,
        ..MediaConfig::default()
    })
    .await
    .unwrap();

    let uploaded: MediaUploadResponse = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("file", "banner.png", "image/png", &png(256, 64))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert!(uploaded.success);
    assert_eq!(uploaded.mime_type, "image/png");
    assert_eq!(uploaded.url, format!("/api/media/{}", uploaded.id));
    assert!(uploaded.filename.ends_with(".png"));

    let response = AxumTestRequest::get(&uploaded.url)
        .send(router)
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("image/png"));
    assert_eq!(response.header("cache-control"), Some("public, max-age=86400"));
    assert_eq!(
        response.header("content-length"),
        Some(uploaded.size.to_string().as_str())
    );

    let stored = image::load_from_memory(&response.bytes()).unwrap();
    assert_eq!((stored.width(), stored.height()), (64, 16));
}

#[tokio::test]
async fn test_undecodable_image_is_stored_unchanged() {
    let (router, _) = create_test_router().await.unwrap();
    let bytes = b"definitely not a jpeg".to_vec();

    let uploaded: MediaUploadResponse = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("file", "photo.jpg", "image/jpeg", &bytes)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(uploaded.size, bytes.len() as i64);
    let stored = AxumTestRequest::get(&uploaded.url).send(router).await.bytes();
    assert_eq!(stored, bytes);
}

#[tokio::test]
async fn test_info_returns_metadata_only() {
    let (router, _) = create_test_router().await.unwrap();
    let uploaded: MediaUploadResponse = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("file", "menu.pdf", "application/pdf", b"%PDF-1.4 fake")
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::get(&format!("/api/media/{}/info", uploaded.id))
        .send(router)
        .await
        .assert_status(StatusCode::OK);
    let raw: Value = serde_json::from_slice(&response.bytes()).unwrap();
    assert!(raw.get("data").is_none());

    let info: MediaInfo = serde_json::from_value(raw).unwrap();
    assert_eq!(info.original_name, "menu.pdf");
    assert_eq!(info.mime_type, "application/pdf");
    assert!(info.object_key.starts_with("media/"));
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::post("/api/media/upload")
        .bearer(VISITOR_TOKEN)
        .multipart_file("file", "a.png", "image/png", &png(4, 4))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let (router, _) = create_test_router_with_media(MediaConfig {
        max_upload_bytes: 1024,
        ..MediaConfig::default()
    })
    .await
    .unwrap();

    let response = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("file", "big.bin", "application/octet-stream", &[7u8; 4096])
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("attachment", "a.txt", "text/plain", b"hello")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_row() {
    let (router, _) = create_test_router().await.unwrap();
    let uploaded: MediaUploadResponse = AxumTestRequest::post("/api/media/upload")
        .bearer(ADMIN_TOKEN)
        .multipart_file("file", "a.txt", "text/plain", b"hello")
        .send(router.clone())
        .await
        .json();

    AxumTestRequest::delete(&uploaded.url)
        .bearer(ADMIN_TOKEN)
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let response = AxumTestRequest::get(&uploaded.url).send(router).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
