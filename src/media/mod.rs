// ABOUTME: Best-effort image transcoding applied to uploads before storage
// ABOUTME: Downscales to a long-edge bound and re-compresses; failures keep the original bytes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Upload processing.
//!
//! JPEG and WebP inputs are re-encoded as JPEG at the configured quality,
//! PNG inputs stay PNG so transparency survives, and anything the decoder
//! cannot handle (GIF animations, PDFs, corrupt images) is stored unchanged.

use crate::config::MediaConfig;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use tracing::{debug, warn};

/// Result of [`process_upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedMedia {
    /// Bytes to store
    pub data: Vec<u8>,
    /// MIME type of `data`
    pub mime_type: String,
    /// File extension matching `mime_type`, without the dot
    pub extension: String,
    /// Whether `data` differs from the uploaded bytes
    pub transcoded: bool,
}

impl ProcessedMedia {
    fn original(data: Vec<u8>, mime_type: &str, original_name: &str) -> Self {
        Self {
            data,
            mime_type: mime_type.to_owned(),
            extension: extension_for(mime_type, original_name),
            transcoded: false,
        }
    }
}

/// Re-encode an uploaded image, or return it unchanged when that is not possible
#[must_use]
pub fn process_upload(
    data: Vec<u8>,
    mime_type: &str,
    original_name: &str,
    settings: &MediaConfig,
) -> ProcessedMedia {
    if !mime_type.starts_with("image/") {
        return ProcessedMedia::original(data, mime_type, original_name);
    }

    let format = match image::guess_format(&data) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => format,
        Ok(other) => {
            debug!(?other, "Image format kept as uploaded");
            return ProcessedMedia::original(data, mime_type, original_name);
        }
        Err(e) => {
            warn!(error = %e, mime_type, "Could not detect image format, storing original");
            return ProcessedMedia::original(data, mime_type, original_name);
        }
    };

    match transcode(&data, format, settings) {
        Ok(processed) => {
            debug!(
                before = data.len(),
                after = processed.data.len(),
                mime_type = %processed.mime_type,
                "Image transcoded"
            );
            processed
        }
        Err(e) => {
            warn!(error = %e, mime_type, "Image transcoding failed, storing original");
            ProcessedMedia::original(data, mime_type, original_name)
        }
    }
}

fn transcode(
    data: &[u8],
    format: ImageFormat,
    settings: &MediaConfig,
) -> image::ImageResult<ProcessedMedia> {
    let img = image::load_from_memory_with_format(data, format)?;
    let img = downscale(img, settings.max_dimension);

    let mut out = Vec::new();
    let (mime_type, extension) = if format == ImageFormat::Png {
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        ("image/png", "png")
    } else {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, settings.jpeg_quality);
        encoder.encode_image(&img.to_rgb8())?;
        ("image/jpeg", "jpg")
    };

    Ok(ProcessedMedia {
        data: out,
        mime_type: mime_type.to_owned(),
        extension: extension.to_owned(),
        transcoded: true,
    })
}

/// Shrink so the long edge is at most `max_dimension`; never upscales
fn downscale(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width.max(height) <= max_dimension {
        return img;
    }
    img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}

fn extension_for(mime_type: &str, original_name: &str) -> String {
    let from_mime = match mime_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "application/pdf" => Some("pdf"),
        _ => None,
    };
    from_mime.map_or_else(
        || {
            original_name
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
                .unwrap_or_else(|| "bin".to_owned())
        },
        str::to_owned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 128]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    fn settings(max_dimension: u32) -> MediaConfig {
        MediaConfig {
            max_dimension,
            ..MediaConfig::default()
        }
    }

    #[test]
    fn test_large_png_is_downscaled_on_long_edge() {
        let processed = process_upload(png_bytes(400, 100), "image/png", "wide.png", &settings(200));
        assert!(processed.transcoded);
        assert_eq!(processed.mime_type, "image/png");
        let decoded = image::load_from_memory(&processed.data).unwrap();
        assert_eq!(decoded.dimensions(), (200, 50));
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let processed = process_upload(png_bytes(40, 30), "image/png", "small.png", &settings(200));
        let decoded = image::load_from_memory(&processed.data).unwrap();
        assert_eq!(decoded.dimensions(), (40, 30));
    }

    #[test]
    fn test_corrupt_image_is_stored_unchanged() {
        let mut bytes = png_bytes(10, 10);
        bytes.truncate(bytes.len() / 2);
        let processed = process_upload(bytes.clone(), "image/png", "broken.png", &settings(200));
        assert!(!processed.transcoded);
        assert_eq!(processed.data, bytes);
        assert_eq!(processed.extension, "png");
    }

    #[test]
    fn test_non_image_is_stored_unchanged() {
        let bytes = b"%PDF-1.4".to_vec();
        let processed = process_upload(bytes.clone(), "application/pdf", "menu.pdf", &settings(200));
        assert_eq!(processed.data, bytes);
        assert_eq!(processed.mime_type, "application/pdf");
        assert_eq!(processed.extension, "pdf");
    }

    #[test]
    fn test_unknown_type_takes_extension_from_name() {
        assert_eq!(extension_for("application/octet-stream", "Notes.TXT"), "txt");
        assert_eq!(extension_for("application/octet-stream", "noext"), "bin");
    }
}
