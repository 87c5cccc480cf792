// ABOUTME: Core data models persisted by the backend and exchanged over the REST API
// ABOUTME: Site configuration record, page content rows, and media file metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

mod media;
mod page_content;
mod site_config;

pub use media::{MediaFile, MediaInfo, MediaUploadResponse};
pub use page_content::{NewPageContent, PageContent, PageContentType, UpdatePageContent};
pub use site_config::{PatchSiteConfigRequest, SiteConfigRecord, UpdateSiteConfigRequest};
