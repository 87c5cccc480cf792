// ABOUTME: Thin HTTP client for the site API over reqwest
// ABOUTME: Attaches the bearer token to every request and maps statuses to client errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::ClientError;
use crate::config::ClientConfig;
use bytes::Bytes;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

/// Low-level API client; no caching, no retries
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `Transient` if the underlying HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transient(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), body))
    }

    /// `GET` a JSON document
    ///
    /// # Errors
    ///
    /// Returns the classified failure
    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        debug!(path, "GET");
        let response = self.request(Method::GET, path).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Send a JSON body with `method` and decode the JSON answer
    ///
    /// # Errors
    ///
    /// Returns the classified failure
    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<Value, ClientError> {
        debug!(%method, path, "Sending JSON");
        let response = self.request(method, path).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `DELETE` a resource
    ///
    /// # Errors
    ///
    /// Returns the classified failure
    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// `GET` raw bytes with their content type
    ///
    /// # Errors
    ///
    /// Returns the classified failure
    pub async fn get_bytes(&self, path: &str) -> Result<(Bytes, String), ClientError> {
        let response = Self::check(self.request(Method::GET, path).send().await?).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_owned();
        Ok((response.bytes().await?, content_type))
    }

    /// `POST` a single file as multipart field `field_name`
    ///
    /// # Errors
    ///
    /// Returns the classified failure
    pub async fn upload(
        &self,
        path: &str,
        field_name: &str,
        file_name: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<Value, ClientError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_owned())
            .mime_str(mime_type)
            .map_err(|e| ClientError::Decode(format!("Invalid MIME type '{mime_type}': {e}")))?;
        let form = reqwest::multipart::Form::new().part(field_name.to_owned(), part);

        let response = self.request(Method::POST, path).multipart(form).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
