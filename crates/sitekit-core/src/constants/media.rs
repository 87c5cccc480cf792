// ABOUTME: Media upload and delivery constants
// ABOUTME: Size limits, resize bounds, re-encode quality, and response cache policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Maximum accepted upload size (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Images larger than this on their long edge are downscaled
pub const MAX_IMAGE_DIMENSION: u32 = 1920;

/// JPEG re-encode quality
pub const JPEG_QUALITY: u8 = 85;

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Cache-Control header for served media (1 day)
pub const MEDIA_CACHE_CONTROL: &str = "public, max-age=86400";

/// Prefix of generated object keys
pub const OBJECT_KEY_PREFIX: &str = "media";
