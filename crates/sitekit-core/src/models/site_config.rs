// ABOUTME: Site configuration document record and write payloads
// ABOUTME: The config column is an untyped JSON overlay; readers resolve defaults themselves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Singleton configuration record for the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfigRecord {
    /// Row identifier
    pub id: i64,
    /// Nested configuration document
    pub config: Value,
}

impl SiteConfigRecord {
    /// Record with an empty document, served before anything was saved
    #[must_use]
    pub fn empty(id: i64) -> Self {
        Self {
            id,
            config: Value::Object(serde_json::Map::new()),
        }
    }
}

/// `PUT /api/config` body: the complete document replaces the stored one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSiteConfigRequest {
    /// Full configuration document
    pub config: Value,
}

/// `PATCH /api/config` body: merge `value` at a dotted `path`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSiteConfigRequest {
    /// Dotted path, e.g. `pagesContent.conocenos.hero.title`
    pub path: String,
    /// Value merged at the path
    pub value: Value,
}
