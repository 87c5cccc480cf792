// ABOUTME: Media file metadata and upload response models
// ABOUTME: Binary payload lives in the row; metadata views never carry the bytes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored media file including its bytes
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Row identifier
    pub id: i64,
    /// Stored file name
    pub filename: String,
    /// Name supplied by the uploader
    pub original_name: String,
    /// MIME type of the stored bytes
    pub mime_type: String,
    /// Size of the stored bytes
    pub size: i64,
    /// Public URL serving the bytes
    pub url: String,
    /// Stable storage key
    pub object_key: String,
    /// Raw bytes
    pub data: Vec<u8>,
    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

/// Metadata-only view returned by `GET /api/media/:id/info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// Row identifier
    pub id: i64,
    /// Stored file name
    pub filename: String,
    /// Name supplied by the uploader
    pub original_name: String,
    /// MIME type of the stored bytes
    pub mime_type: String,
    /// Size of the stored bytes
    pub size: i64,
    /// Public URL serving the bytes
    pub url: String,
    /// Stable storage key
    pub object_key: String,
    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

impl From<&MediaFile> for MediaInfo {
    fn from(file: &MediaFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            original_name: file.original_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.size,
            url: file.url.clone(),
            object_key: file.object_key.clone(),
            created_at: file.created_at,
        }
    }
}

/// `POST /api/media/upload` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponse {
    /// Always true on a 2xx response
    pub success: bool,
    /// New row identifier
    pub id: i64,
    /// Public URL serving the bytes
    pub url: String,
    /// Stored file name
    pub filename: String,
    /// Size of the stored bytes
    pub size: i64,
    /// MIME type of the stored bytes
    pub mime_type: String,
}

impl From<&MediaFile> for MediaUploadResponse {
    fn from(file: &MediaFile) -> Self {
        Self {
            success: true,
            id: file.id,
            url: file.url.clone(),
            filename: file.filename.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
        }
    }
}
