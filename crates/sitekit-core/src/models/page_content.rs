// ABOUTME: Page content rows ordered within (pageId, sectionKey)
// ABOUTME: Create/update payloads with validation and partial-update application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering shape of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageContentType {
    /// Plain text block
    #[default]
    Text,
    /// Card with title and body
    Card,
}

impl PageContentType {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PageContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "card" => Ok(Self::Card),
            other => Err(AppError::invalid_input(format!(
                "Unknown page content type: {other}"
            ))),
        }
    }
}

/// Persisted page content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Row identifier
    pub id: i64,
    /// Page the block belongs to (e.g. `conocenos`)
    pub page_id: String,
    /// Section inside the page (e.g. `values`)
    pub section_key: String,
    /// Rendering shape
    #[serde(rename = "type")]
    pub content_type: PageContentType,
    /// Optional heading
    pub title: Option<String>,
    /// Body text
    pub content: String,
    /// Position within `(page_id, section_key)`
    pub order: i64,
    /// Soft-disable flag
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// `POST /api/page-contents` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPageContent {
    /// Page the block belongs to
    pub page_id: String,
    /// Section inside the page
    pub section_key: String,
    /// Rendering shape (defaults to text)
    #[serde(rename = "type", default)]
    pub content_type: PageContentType,
    /// Optional heading
    #[serde(default)]
    pub title: Option<String>,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Position within the section
    #[serde(default)]
    pub order: i64,
    /// Soft-disable flag (defaults to active)
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl NewPageContent {
    /// Validate required identifiers
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `pageId` or `sectionKey` is blank
    pub fn validate(&self) -> AppResult<()> {
        if self.page_id.trim().is_empty() {
            return Err(AppError::invalid_input("pageId must not be empty"));
        }
        if self.section_key.trim().is_empty() {
            return Err(AppError::invalid_input("sectionKey must not be empty"));
        }
        Ok(())
    }
}

/// `PUT /api/page-contents/:id` body; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageContent {
    /// New section
    pub section_key: Option<String>,
    /// New rendering shape
    #[serde(rename = "type")]
    pub content_type: Option<PageContentType>,
    /// New heading
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
    /// New position
    pub order: Option<i64>,
    /// New active flag
    pub is_active: Option<bool>,
}

impl UpdatePageContent {
    /// Apply the present fields onto an existing row
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the new `sectionKey` is blank
    pub fn apply_to(self, row: &mut PageContent) -> AppResult<()> {
        if let Some(section_key) = self.section_key {
            if section_key.trim().is_empty() {
                return Err(AppError::invalid_input("sectionKey must not be empty"));
            }
            row.section_key = section_key;
        }
        if let Some(content_type) = self.content_type {
            row.content_type = content_type;
        }
        if let Some(title) = self.title {
            row.title = Some(title);
        }
        if let Some(content) = self.content {
            row.content = content;
        }
        if let Some(order) = self.order {
            row.order = order;
        }
        if let Some(is_active) = self.is_active {
            row.is_active = is_active;
        }
        row.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PageContent {
        let now = Utc::now();
        PageContent {
            id: 7,
            page_id: "conocenos".to_owned(),
            section_key: "values".to_owned(),
            content_type: PageContentType::Card,
            title: Some("Calidad".to_owned()),
            content: "Trabajo bien hecho".to_owned(),
            order: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_page_content_defaults() {
        let body: NewPageContent = serde_json::from_value(serde_json::json!({
            "pageId": "home",
            "sectionKey": "intro"
        }))
        .unwrap();
        assert_eq!(body.content_type, PageContentType::Text);
        assert!(body.is_active);
        assert_eq!(body.order, 0);
        assert!(body.validate().is_ok());
    }

    #[test]
    fn test_new_page_content_rejects_blank_section() {
        let body: NewPageContent = serde_json::from_value(serde_json::json!({
            "pageId": "home",
            "sectionKey": "  "
        }))
        .unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut row = sample_row();
        let update = UpdatePageContent {
            is_active: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut row).unwrap();
        assert!(!row.is_active);
        assert_eq!(row.title.as_deref(), Some("Calidad"));
        assert_eq!(row.order, 1);
    }

    #[test]
    fn test_page_content_serializes_camel_case() {
        let json = serde_json::to_value(sample_row()).unwrap();
        assert_eq!(json["pageId"], "conocenos");
        assert_eq!(json["type"], "card");
        assert_eq!(json["isActive"], true);
    }
}
