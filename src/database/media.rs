// ABOUTME: Media file storage with bytes kept in the row
// ABOUTME: Insert assigns the public URL from the row id; reads split metadata from payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use sitekit_core::constants::api_paths;
use sitekit_core::models::{MediaFile, MediaInfo};
use sqlx::Row;

/// Media row ready for insertion
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    /// Stored file name
    pub filename: String,
    /// Name supplied by the uploader
    pub original_name: String,
    /// MIME type of `data`
    pub mime_type: String,
    /// Stable storage key
    pub object_key: String,
    /// Bytes to store
    pub data: Vec<u8>,
}

impl Database {
    /// Store a media file and return it with its assigned id and URL
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_media_file(&self, new: NewMediaFile) -> AppResult<MediaFile> {
        let now = Utc::now();
        let size = i64::try_from(new.data.len())
            .map_err(|_| AppError::invalid_input("Media file is too large to store"))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let id = sqlx::query(
            r"
            INSERT INTO media_files (filename, original_name, mime_type, size, object_key, data, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(&new.filename)
        .bind(&new.original_name)
        .bind(&new.mime_type)
        .bind(size)
        .bind(&new.object_key)
        .bind(&new.data)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to store media file: {e}")))?
        .last_insert_rowid();

        let url = format!("{}/{id}", api_paths::MEDIA);
        sqlx::query("UPDATE media_files SET url = ?2 WHERE id = ?1")
            .bind(id)
            .bind(&url)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit media file: {e}")))?;

        Ok(MediaFile {
            id,
            filename: new.filename,
            original_name: new.original_name,
            mime_type: new.mime_type,
            size,
            url,
            object_key: new.object_key,
            data: new.data,
            created_at: now,
        })
    }

    /// Load a media file including its bytes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no row has this id
    pub async fn get_media_file(&self, id: i64) -> AppResult<MediaFile> {
        let row = sqlx::query(
            r"
            SELECT id, filename, original_name, mime_type, size, url, object_key, data, created_at
            FROM media_files
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get media file: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Media file {id}")))?;

        let created_at: String = row.get("created_at");
        Ok(MediaFile {
            id: row.get("id"),
            filename: row.get("filename"),
            original_name: row.get("original_name"),
            mime_type: row.get("mime_type"),
            size: row.get("size"),
            url: row.get("url"),
            object_key: row.get("object_key"),
            data: row.get("data"),
            created_at: parse_timestamp(&created_at),
        })
    }

    /// Load media metadata without reading the bytes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no row has this id
    pub async fn get_media_info(&self, id: i64) -> AppResult<MediaInfo> {
        let row = sqlx::query(
            r"
            SELECT id, filename, original_name, mime_type, size, url, object_key, created_at
            FROM media_files
            WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get media info: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Media file {id}")))?;

        let created_at: String = row.get("created_at");
        Ok(MediaInfo {
            id: row.get("id"),
            filename: row.get("filename"),
            original_name: row.get("original_name"),
            mime_type: row.get("mime_type"),
            size: row.get("size"),
            url: row.get("url"),
            object_key: row.get("object_key"),
            created_at: parse_timestamp(&created_at),
        })
    }

    /// Delete a media row; config documents referencing it are not touched
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the row does not exist
    pub async fn delete_media_file(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM media_files WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete media file: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Media file {id}")));
        }
        Ok(())
    }
}
