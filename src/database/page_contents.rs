// ABOUTME: Page content CRUD operations ordered within page and section
// ABOUTME: Rows are soft-disabled via is_active and listed by (section_key, sort_order, id)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{parse_timestamp, Database};
use crate::errors::{AppError, AppResult};
use chrono::Utc;
use sitekit_core::models::{NewPageContent, PageContent, UpdatePageContent};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const SELECT_COLUMNS: &str = "SELECT id, page_id, section_key, content_type, title, content, \
                              sort_order, is_active, created_at, updated_at FROM page_contents";

fn row_to_page_content(row: &SqliteRow) -> AppResult<PageContent> {
    let content_type: String = row.get("content_type");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(PageContent {
        id: row.get("id"),
        page_id: row.get("page_id"),
        section_key: row.get("section_key"),
        content_type: content_type.parse()?,
        title: row.get("title"),
        content: row.get("content"),
        order: row.get("sort_order"),
        is_active: row.get("is_active"),
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

impl Database {
    /// List the blocks of a page ordered by section, position and id
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_page_contents(
        &self,
        page_id: &str,
        active_only: bool,
    ) -> AppResult<Vec<PageContent>> {
        let sql = if active_only {
            format!("{SELECT_COLUMNS} WHERE page_id = ?1 AND is_active = 1 ORDER BY section_key, sort_order, id")
        } else {
            format!("{SELECT_COLUMNS} WHERE page_id = ?1 ORDER BY section_key, sort_order, id")
        };

        let rows = sqlx::query(&sql)
            .bind(page_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list page contents: {e}")))?;

        rows.iter().map(row_to_page_content).collect()
    }

    /// Get one block by id
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if no row has this id
    pub async fn get_page_content(&self, id: i64) -> AppResult<PageContent> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get page content: {e}")))?
            .ok_or_else(|| AppError::not_found(format!("Page content {id}")))?;

        row_to_page_content(&row)
    }

    /// Insert a new block
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for blank identifiers, or a database error
    pub async fn create_page_content(&self, new: NewPageContent) -> AppResult<PageContent> {
        new.validate()?;
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        let result = sqlx::query(
            r"
            INSERT INTO page_contents
                (page_id, section_key, content_type, title, content, sort_order, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ",
        )
        .bind(&new.page_id)
        .bind(&new.section_key)
        .bind(new.content_type.as_str())
        .bind(&new.title)
        .bind(&new.content)
        .bind(new.order)
        .bind(new.is_active)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create page content: {e}")))?;

        Ok(PageContent {
            id: result.last_insert_rowid(),
            page_id: new.page_id,
            section_key: new.section_key,
            content_type: new.content_type,
            title: new.title,
            content: new.content,
            order: new.order,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update to an existing block
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the row does not exist
    pub async fn update_page_content(
        &self,
        id: i64,
        update: UpdatePageContent,
    ) -> AppResult<PageContent> {
        let mut row = self.get_page_content(id).await?;
        update.apply_to(&mut row)?;

        sqlx::query(
            r"
            UPDATE page_contents SET
                section_key = ?2,
                content_type = ?3,
                title = ?4,
                content = ?5,
                sort_order = ?6,
                is_active = ?7,
                updated_at = ?8
            WHERE id = ?1
            ",
        )
        .bind(id)
        .bind(&row.section_key)
        .bind(row.content_type.as_str())
        .bind(&row.title)
        .bind(&row.content)
        .bind(row.order)
        .bind(row.is_active)
        .bind(row.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update page content: {e}")))?;

        Ok(row)
    }

    /// Delete a block
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the row does not exist
    pub async fn delete_page_content(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM page_contents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete page content: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Page content {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_core::models::PageContentType;

    fn block(page: &str, section: &str, order: i64) -> NewPageContent {
        NewPageContent {
            page_id: page.to_owned(),
            section_key: section.to_owned(),
            content_type: PageContentType::Text,
            title: None,
            content: format!("{section}-{order}"),
            order,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_list_orders_within_section() {
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        db.create_page_content(block("home", "values", 2)).await.unwrap();
        db.create_page_content(block("home", "values", 1)).await.unwrap();
        db.create_page_content(block("home", "hero", 5)).await.unwrap();
        db.create_page_content(block("about", "values", 0)).await.unwrap();

        let rows = db.list_page_contents("home", false).await.unwrap();
        let contents: Vec<_> = rows.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, ["hero-5", "values-1", "values-2"]);
    }

    #[tokio::test]
    async fn test_active_only_hides_disabled_rows() {
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        let row = db.create_page_content(block("home", "faq", 0)).await.unwrap();
        db.create_page_content(block("home", "faq", 1)).await.unwrap();
        db.update_page_content(
            row.id,
            UpdatePageContent {
                is_active: Some(false),
                ..UpdatePageContent::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(db.list_page_contents("home", false).await.unwrap().len(), 2);
        assert_eq!(db.list_page_contents("home", true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let db = Database::new("sqlite::memory:", 1).await.unwrap();
        let err = db.delete_page_content(99).await.unwrap_err();
        assert_eq!(err.http_status(), 404);
    }
}
