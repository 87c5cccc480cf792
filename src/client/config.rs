// ABOUTME: Typed client for the site config, page content and media endpoints
// ABOUTME: Reads go through the query cache; writes are sent once and invalidate their resource
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{ClientError, QueryClient, UnauthorizedPolicy};
use crate::editor::ConfigBackend;
use crate::retry::retry_transient;
use bytes::Bytes;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sitekit_core::constants::{api_paths, media};
use sitekit_core::models::{MediaInfo, MediaUploadResponse, PageContent, SiteConfigRecord};
use std::sync::Arc;

/// Typed site API client
#[derive(Clone)]
pub struct ConfigClient {
    query: QueryClient,
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, ClientError> {
    Ok(T::deserialize(value)?)
}

impl ConfigClient {
    /// Wrap a query client
    #[must_use]
    pub const fn new(query: QueryClient) -> Self {
        Self { query }
    }

    /// Shared query client
    #[must_use]
    pub const fn query(&self) -> &QueryClient {
        &self.query
    }

    /// Read the configuration record through the cache
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode failure
    pub async fn get_config(
        &self,
        on_unauthorized: UnauthorizedPolicy,
    ) -> Result<Option<SiteConfigRecord>, ClientError> {
        self.query
            .get(api_paths::CONFIG, on_unauthorized)
            .await?
            .map(|value| decode(&value))
            .transpose()
    }

    /// Configuration currently held in the cache, without touching the network
    ///
    /// # Errors
    ///
    /// Returns the decode failure for a malformed cached document
    pub async fn cached_config(&self) -> Result<Option<SiteConfigRecord>, ClientError> {
        self.query
            .cached(api_paths::CONFIG)
            .await
            .map(|value| decode(&value))
            .transpose()
    }

    /// Replace the whole configuration document
    ///
    /// # Errors
    ///
    /// Returns the write failure; writes are never retried
    pub async fn replace_config(&self, config: &Value) -> Result<SiteConfigRecord, ClientError> {
        let response = self
            .query
            .mutate(Method::PUT, api_paths::CONFIG, &json!({ "config": config }))
            .await?;
        decode(&response)
    }

    /// Ask the server to merge `value` at `path`
    ///
    /// # Errors
    ///
    /// Returns the write failure; writes are never retried
    pub async fn patch_config(
        &self,
        path: &str,
        value: Value,
    ) -> Result<SiteConfigRecord, ClientError> {
        let response = self
            .query
            .mutate(
                Method::PATCH,
                api_paths::CONFIG,
                &json!({ "path": path, "value": value }),
            )
            .await?;
        decode(&response)
    }

    /// List the content blocks of a page through the cache
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode failure
    pub async fn list_page_contents(
        &self,
        page_id: &str,
        active_only: bool,
    ) -> Result<Vec<PageContent>, ClientError> {
        let mut path = format!("{}/{page_id}", api_paths::PAGE_CONTENTS);
        if active_only {
            path.push_str("?activeOnly=true");
        }
        self.query
            .get(&path, UnauthorizedPolicy::Throw)
            .await?
            .map_or_else(|| Ok(Vec::new()), |value| decode(&value))
    }

    /// Download media bytes; retried on transient failures, never cached
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after retries
    pub async fn fetch_media(&self, id: i64) -> Result<(Bytes, String), ClientError> {
        let path = format!("{}/{id}", api_paths::MEDIA);
        let api = self.query.api();
        retry_transient(&self.query.config().retry, || api.get_bytes(&path)).await
    }

    /// Media metadata through the cache
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode failure
    pub async fn media_info(&self, id: i64) -> Result<MediaInfo, ClientError> {
        let path = format!("{}/{id}/info", api_paths::MEDIA);
        let value = self
            .query
            .get(&path, UnauthorizedPolicy::Throw)
            .await?
            .ok_or(ClientError::Unauthorized)?;
        decode(&value)
    }

    /// Upload a file; never retried
    ///
    /// # Errors
    ///
    /// Returns the upload failure
    pub async fn upload_media(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<MediaUploadResponse, ClientError> {
        let response = self
            .query
            .api()
            .upload(
                api_paths::MEDIA_UPLOAD,
                media::UPLOAD_FIELD_NAME,
                file_name,
                mime_type,
                data,
            )
            .await?;
        self.query.invalidate_resource(api_paths::MEDIA).await;
        decode(&response)
    }
}

#[async_trait::async_trait]
impl ConfigBackend for ConfigClient {
    async fn fetch_latest(&self) -> Result<Value, ClientError> {
        let value: Arc<Value> = self.query.fetch_fresh(api_paths::CONFIG).await?;
        let record: SiteConfigRecord = decode(&value)?;
        Ok(record.config)
    }

    async fn replace(&self, config: Value) -> Result<Value, ClientError> {
        Ok(self.replace_config(&config).await?.config)
    }
}
