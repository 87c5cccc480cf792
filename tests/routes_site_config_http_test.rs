// ABOUTME: HTTP integration tests for the site configuration routes
// ABOUTME: Covers public reads, admin-only full replace and server-side path patches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_router, ADMIN_TOKEN, VISITOR_TOKEN};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use sitekit::errors::ErrorResponse;
use sitekit_core::models::SiteConfigRecord;

#[tokio::test]
async fn test_get_config_returns_empty_document_before_first_write() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::get("/api/config").send(router).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let record: SiteConfigRecord = response.json();
    assert_eq!(record.id, 1);
    assert_eq!(record.config, json!({}));
}

#[tokio::test]
async fn test_put_config_requires_token() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/api/config")
        .json(&json!({"config": {"appearance": {"primaryColor": "#ff0000"}}}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let error: ErrorResponse = response.json();
    assert_eq!(error.error.code, sitekit::errors::ErrorCode::AuthRequired);
}

#[tokio::test]
async fn test_put_config_rejects_non_admin() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/api/config")
        .bearer(VISITOR_TOKEN)
        .json(&json!({"config": {}}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_config_replaces_whole_document() {
    let (router, context) = create_test_router().await.unwrap();

    AxumTestRequest::put("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"config": {"navbar": {"blog": {"label": "News"}}, "whatsapp": {"enabled": true}}}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let response = AxumTestRequest::put("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"config": {"whatsapp": {"enabled": false}}}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    let record: SiteConfigRecord = response.json();
    assert_eq!(record.config, json!({"whatsapp": {"enabled": false}}));

    let stored = context.database.get_site_config().await.unwrap();
    assert!(stored.config.get("navbar").is_none());
}

#[tokio::test]
async fn test_put_config_rejects_non_object() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::put("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"config": [1, 2, 3]}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_config_merges_without_touching_siblings() {
    let (router, _) = create_test_router().await.unwrap();

    AxumTestRequest::put("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"config": {
            "pagesContent": {
                "conocenos": {"hero": {"title": "Old", "subtitle": "Stays"}},
                "servicios": {"intro": "Untouched"}
            }
        }}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let response = AxumTestRequest::patch("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"path": "pagesContent.conocenos.hero.title", "value": "New"}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    let record: SiteConfigRecord = response.json();

    assert_eq!(record.config["pagesContent"]["conocenos"]["hero"]["title"], "New");
    assert_eq!(record.config["pagesContent"]["conocenos"]["hero"]["subtitle"], "Stays");
    assert_eq!(record.config["pagesContent"]["servicios"]["intro"], "Untouched");

    let fetched: SiteConfigRecord = AxumTestRequest::get("/api/config").send(router).await.json();
    assert_eq!(fetched.config, record.config);
}

#[tokio::test]
async fn test_patch_config_replaces_list_element_by_id() {
    let (router, _) = create_test_router().await.unwrap();

    AxumTestRequest::put("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"config": {"pagesContent": {"conocenos": {"team": [
            {"id": "a", "name": "Ana", "role": "CEO"},
            {"id": "b", "name": "Bruno", "role": "CTO"}
        ]}}}}))
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);

    let record: SiteConfigRecord = AxumTestRequest::patch("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({
            "path": "pagesContent.conocenos.team[b]",
            "value": {"name": "Bea", "role": "COO"}
        }))
        .send(router)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let team = &record.config["pagesContent"]["conocenos"]["team"];
    assert_eq!(
        team,
        &json!([
            {"id": "a", "name": "Ana", "role": "CEO"},
            {"id": "b", "name": "Bea", "role": "COO"}
        ])
    );
}

#[tokio::test]
async fn test_patch_config_unknown_element_is_bad_request() {
    let (router, _) = create_test_router().await.unwrap();

    let response = AxumTestRequest::patch("/api/config")
        .bearer(ADMIN_TOKEN)
        .json(&json!({"path": "team[missing].name", "value": "X"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_health_and_ready() {
    let (router, _) = create_test_router().await.unwrap();

    AxumTestRequest::get("/health")
        .send(router.clone())
        .await
        .assert_status(StatusCode::OK);
    AxumTestRequest::get("/ready")
        .send(router)
        .await
        .assert_status(StatusCode::OK);
}
