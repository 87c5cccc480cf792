// ABOUTME: Singleton site configuration document storage
// ABOUTME: Full-document replace plus a server-side path-scoped merge for PATCH
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::Database;
use crate::editor::merge::{merge_at_path, ConfigPath};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use serde_json::Value;
use sitekit_core::models::SiteConfigRecord;
use sqlx::Row;

/// Row id of the singleton configuration document
pub const SITE_CONFIG_ID: i64 = 1;

impl Database {
    /// Get the site configuration; an empty document when nothing was saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored JSON is corrupt
    pub async fn get_site_config(&self) -> AppResult<SiteConfigRecord> {
        let row = sqlx::query("SELECT id, config FROM site_config WHERE id = ?1")
            .bind(SITE_CONFIG_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get site config: {e}")))?;

        row.map_or_else(
            || Ok(SiteConfigRecord::empty(SITE_CONFIG_ID)),
            |row| {
                let raw: String = row.get("config");
                Ok(SiteConfigRecord {
                    id: row.get("id"),
                    config: serde_json::from_str(&raw)?,
                })
            },
        )
    }

    /// Replace the whole configuration document
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `config` is not a JSON object, or a database error
    pub async fn replace_site_config(&self, config: Value) -> AppResult<SiteConfigRecord> {
        if !config.is_object() {
            return Err(AppError::invalid_input("config must be a JSON object"));
        }
        let serialized = serde_json::to_string(&config)?;

        sqlx::query(
            r"
            INSERT INTO site_config (id, config, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                config = ?2,
                updated_at = ?3
            ",
        )
        .bind(SITE_CONFIG_ID)
        .bind(&serialized)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save site config: {e}")))?;

        Ok(SiteConfigRecord {
            id: SITE_CONFIG_ID,
            config,
        })
    }

    /// Merge `value` at `path` into the stored document and persist the result
    ///
    /// Read and write happen inside one transaction, so concurrent patches to
    /// different paths do not overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a malformed path or an unresolvable array selector
    pub async fn patch_site_config(&self, path: &str, value: Value) -> AppResult<SiteConfigRecord> {
        let path = ConfigPath::parse(path)?;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let current: Value = sqlx::query("SELECT config FROM site_config WHERE id = ?1")
            .bind(SITE_CONFIG_ID)
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| serde_json::from_str::<Value>(&row.get::<String, _>("config")))
            .transpose()?
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let merged = merge_at_path(&current, &path, value)?;
        let serialized = serde_json::to_string(&merged)?;

        sqlx::query(
            r"
            INSERT INTO site_config (id, config, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                config = ?2,
                updated_at = ?3
            ",
        )
        .bind(SITE_CONFIG_ID)
        .bind(&serialized)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit site config: {e}")))?;

        Ok(SiteConfigRecord {
            id: SITE_CONFIG_ID,
            config: merged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn memory_db() -> Database {
        Database::new("sqlite::memory:", 1).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_before_save_returns_empty_document() {
        let db = memory_db().await;
        let record = db.get_site_config().await.unwrap();
        assert_eq!(record.id, SITE_CONFIG_ID);
        assert_eq!(record.config, json!({}));
    }

    #[tokio::test]
    async fn test_replace_is_full_document() {
        let db = memory_db().await;
        db.replace_site_config(json!({"a": 1, "b": 2})).await.unwrap();
        db.replace_site_config(json!({"b": 3})).await.unwrap();
        let record = db.get_site_config().await.unwrap();
        assert_eq!(record.config, json!({"b": 3}));
    }

    #[tokio::test]
    async fn test_replace_rejects_non_object() {
        let db = memory_db().await;
        let err = db.replace_site_config(json!([1, 2])).await.unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[tokio::test]
    async fn test_patch_keeps_siblings() {
        let db = memory_db().await;
        db.replace_site_config(json!({
            "pagesContent": {"conocenos": {"hero": {"title": "Old", "subtitle": "Keep"}}},
            "appearance": {"primaryColor": "#ff0000"}
        }))
        .await
        .unwrap();

        let record = db
            .patch_site_config("pagesContent.conocenos.hero.title", json!("New"))
            .await
            .unwrap();

        assert_eq!(record.config["pagesContent"]["conocenos"]["hero"]["title"], "New");
        assert_eq!(record.config["pagesContent"]["conocenos"]["hero"]["subtitle"], "Keep");
        assert_eq!(record.config["appearance"]["primaryColor"], "#ff0000");
        assert_eq!(db.get_site_config().await.unwrap(), record);
    }
}
