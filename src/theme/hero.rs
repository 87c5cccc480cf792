// ABOUTME: Hero section styling resolved from appearance settings
// ABOUTME: Produces the background, overlay and content layers in fixed stacking order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::schema::{Appearance, HeroBackgroundMode};
use serde::Serialize;

/// Hero background
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum HeroBackground {
    /// Cover image URL
    Image(String),
    /// CSS gradient expression
    Gradient(String),
    /// Solid color
    Color(String),
}

impl HeroBackground {
    /// CSS declarations for the background layer
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Image(url) => format!(
                "background-image: url(\"{url}\"); background-size: cover; background-position: center;"
            ),
            Self::Gradient(gradient) => format!("background: {gradient};"),
            Self::Color(color) => format!("background-color: {color};"),
        }
    }
}

/// Full-bleed layer between the background and the text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroOverlay {
    /// Overlay color
    pub color: String,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
}

impl HeroOverlay {
    /// CSS declarations for the overlay layer
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "position: absolute; inset: 0; background-color: {}; opacity: {};",
            self.color, self.opacity
        )
    }
}

/// Stacking layer, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroLayer {
    /// Image, gradient or color
    Background,
    /// Tinted overlay
    Overlay,
    /// Heading, text and buttons
    Content,
}

impl HeroLayer {
    /// `z-index` used for the layer
    #[must_use]
    pub const fn z_index(self) -> u8 {
        match self {
            Self::Background => 0,
            Self::Overlay => 1,
            Self::Content => 2,
        }
    }
}

/// Resolved hero style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroStyle {
    /// Background layer
    pub background: HeroBackground,
    /// Overlay layer
    pub overlay: HeroOverlay,
}

impl HeroStyle {
    /// Layers in render order
    pub const LAYERS: [HeroLayer; 3] = [HeroLayer::Background, HeroLayer::Overlay, HeroLayer::Content];

    /// Resolve from appearance settings
    ///
    /// Image mode without an image, or gradient mode without any color stop,
    /// falls back to the solid hero color.
    #[must_use]
    pub fn resolve(appearance: &Appearance) -> Self {
        let solid = || HeroBackground::Color(appearance.hero_background_color.clone());
        let background = match appearance.hero_background_type {
            HeroBackgroundMode::Image => appearance
                .hero_image
                .clone()
                .map_or_else(solid, HeroBackground::Image),
            HeroBackgroundMode::Gradient => appearance
                .hero_gradient()
                .to_css()
                .map_or_else(solid, HeroBackground::Gradient),
            HeroBackgroundMode::Color => solid(),
        };

        Self {
            background,
            overlay: HeroOverlay {
                color: appearance.hero_overlay_color.clone(),
                opacity: f32::from(appearance.hero_overlay_opacity.min(100)) / 100.0,
            },
        }
    }
}
