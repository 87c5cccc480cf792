// ABOUTME: SQLite persistence for the site configuration document, page contents and media files
// ABOUTME: Owns the connection pool and creates tables on startup with idempotent migrations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Database Management
//!
//! Three tables back the REST API: the singleton `site_config` document,
//! ordered `page_contents` rows and `media_files` with their bytes stored
//! in the row. Timestamps are stored as RFC 3339 text.

mod media;
mod page_contents;
mod site_config;

pub use media::NewMediaFile;
pub use site_config::SITE_CONFIG_ID;

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::{debug, info};

/// Database manager for site storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if needed) the database and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");

        // Every connection to `:memory:` opens a separate database, so pin the pool to one.
        let pool = if is_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect(&format!("sqlite:{path}?mode=rwc"))
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(memory = is_memory, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Round-trip a trivial query; used by the readiness probe
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_site_config().await?;
        self.migrate_page_contents().await?;
        self.migrate_media().await?;
        debug!("Migrations applied");
        Ok(())
    }

    async fn migrate_site_config(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS site_config (
                id INTEGER PRIMARY KEY,
                config TEXT NOT NULL DEFAULT '{}',
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn migrate_page_contents(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS page_contents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                page_id TEXT NOT NULL,
                section_key TEXT NOT NULL,
                content_type TEXT NOT NULL DEFAULT 'text',
                title TEXT,
                content TEXT NOT NULL DEFAULT '',
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_page_contents_page ON page_contents(page_id, section_key, sort_order)",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn migrate_media(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS media_files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                original_name TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                size INTEGER NOT NULL,
                url TEXT NOT NULL DEFAULT '',
                object_key TEXT NOT NULL,
                data BLOB NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Parse a stored RFC 3339 timestamp, falling back to now for legacy rows
pub(crate) fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
