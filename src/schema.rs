// ABOUTME: Typed view of the site configuration document with every default filled once
// ABOUTME: Malformed sections are logged and replaced by defaults so rendering never fails on config shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Site Settings
//!
//! The stored configuration is a sparse JSON overlay: any field may be
//! missing. [`SiteSettings::resolve`] turns it into a fully populated typed
//! structure at load time. Navbar, footer, hero and theme code read from the
//! resolved settings instead of falling back on their own, so a given key
//! renders the same everywhere.
//!
//! Invalid colors fall back to the default for that key. Appearance fields
//! are read one by one, so a null or mistyped field only resets itself. A
//! section that is not an object at all is replaced by its defaults with a
//! warning.

use crate::modules::ModuleFlags;
use crate::theme::gradient::{GradientKind, GradientSpec};
use crate::theme::presets;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitekit_core::constants::theme::{
    DEFAULT_OVERLAY_COLOR, DEFAULT_OVERLAY_OPACITY, DEFAULT_PRESET_ID,
};
use std::collections::BTreeMap;
use tracing::warn;

/// Default brand and text colors
pub mod defaults {
    /// Primary brand color
    pub const PRIMARY_COLOR: &str = "#3b82f6";
    /// Secondary brand color
    pub const SECONDARY_COLOR: &str = "#64748b";
    /// Accent color for highlights and buttons
    pub const ACCENT_COLOR: &str = "#f59e0b";
    /// Page background
    pub const BACKGROUND_COLOR: &str = "#ffffff";
    /// Body text
    pub const TEXT_COLOR: &str = "#1f2937";
    /// Navbar background
    pub const NAVBAR_COLOR: &str = "#ffffff";
    /// Navbar text
    pub const NAVBAR_TEXT_COLOR: &str = "#1f2937";
    /// Footer background
    pub const FOOTER_COLOR: &str = "#111827";
    /// Footer text
    pub const FOOTER_TEXT_COLOR: &str = "#f9fafb";
    /// Solid hero background
    pub const HERO_BACKGROUND_COLOR: &str = "#1f2937";
    /// Body font family
    pub const FONT_FAMILY: &str = "Inter";
    /// Heading font family
    pub const HEADING_FONT: &str = "Poppins";
    /// Base font size in pixels
    pub const FONT_SIZE_PX: u16 = 16;
    /// Corner radius in pixels
    pub const BORDER_RADIUS_PX: u16 = 8;
    /// Prefilled WhatsApp message
    pub const WHATSAPP_MESSAGE: &str = "Hola, me gustaría recibir más información";
}

/// Hero background source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroBackgroundMode {
    /// Background image from `heroImage`
    Image,
    /// Gradient from the `heroGradient*` fields
    Gradient,
    /// Solid `heroBackgroundColor`; also used for unknown modes
    #[default]
    #[serde(other)]
    Color,
}

/// Presentation primitives from `config.appearance`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appearance {
    /// Primary brand color
    #[serde(deserialize_with = "lenient")]
    pub primary_color: String,
    /// Secondary brand color
    #[serde(deserialize_with = "lenient")]
    pub secondary_color: String,
    /// Accent color
    #[serde(deserialize_with = "lenient")]
    pub accent_color: String,
    /// Page background
    #[serde(deserialize_with = "lenient")]
    pub background_color: String,
    /// Body text color
    #[serde(deserialize_with = "lenient")]
    pub text_color: String,
    /// Navbar background
    #[serde(deserialize_with = "lenient")]
    pub navbar_color: String,
    /// Navbar text color
    #[serde(deserialize_with = "lenient")]
    pub navbar_text_color: String,
    /// Footer background
    #[serde(deserialize_with = "lenient")]
    pub footer_color: String,
    /// Footer text color
    #[serde(deserialize_with = "lenient")]
    pub footer_text_color: String,
    /// Body font family
    #[serde(deserialize_with = "lenient")]
    pub font_family: String,
    /// Heading font family
    #[serde(deserialize_with = "lenient")]
    pub heading_font: String,
    /// Base font size in pixels
    #[serde(deserialize_with = "de_font_size")]
    pub font_size: u16,
    /// Corner radius in pixels
    #[serde(deserialize_with = "de_border_radius")]
    pub border_radius: u16,
    /// Hero background source
    #[serde(deserialize_with = "lenient")]
    pub hero_background_type: HeroBackgroundMode,
    /// Solid hero background color
    #[serde(deserialize_with = "lenient")]
    pub hero_background_color: String,
    /// Hero image URL
    #[serde(deserialize_with = "lenient")]
    pub hero_image: Option<String>,
    /// Hero gradient shape
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_type: GradientKind,
    /// Hero gradient direction for linear gradients
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_direction: Option<String>,
    /// First gradient stop
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_color1: Option<String>,
    /// Second gradient stop
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_color2: Option<String>,
    /// Third gradient stop
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_color3: Option<String>,
    /// Fourth gradient stop
    #[serde(deserialize_with = "lenient")]
    pub hero_gradient_color4: Option<String>,
    /// Overlay opacity in percent
    #[serde(deserialize_with = "de_opacity")]
    pub hero_overlay_opacity: u8,
    /// Overlay color
    #[serde(deserialize_with = "lenient")]
    pub hero_overlay_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            primary_color: defaults::PRIMARY_COLOR.to_owned(),
            secondary_color: defaults::SECONDARY_COLOR.to_owned(),
            accent_color: defaults::ACCENT_COLOR.to_owned(),
            background_color: defaults::BACKGROUND_COLOR.to_owned(),
            text_color: defaults::TEXT_COLOR.to_owned(),
            navbar_color: defaults::NAVBAR_COLOR.to_owned(),
            navbar_text_color: defaults::NAVBAR_TEXT_COLOR.to_owned(),
            footer_color: defaults::FOOTER_COLOR.to_owned(),
            footer_text_color: defaults::FOOTER_TEXT_COLOR.to_owned(),
            font_family: defaults::FONT_FAMILY.to_owned(),
            heading_font: defaults::HEADING_FONT.to_owned(),
            font_size: defaults::FONT_SIZE_PX,
            border_radius: defaults::BORDER_RADIUS_PX,
            hero_background_type: HeroBackgroundMode::default(),
            hero_background_color: defaults::HERO_BACKGROUND_COLOR.to_owned(),
            hero_image: None,
            hero_gradient_type: GradientKind::default(),
            hero_gradient_direction: None,
            hero_gradient_color1: None,
            hero_gradient_color2: None,
            hero_gradient_color3: None,
            hero_gradient_color4: None,
            hero_overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            hero_overlay_color: DEFAULT_OVERLAY_COLOR.to_owned(),
        }
    }
}

impl Appearance {
    /// Hero gradient assembled from the four color slots
    #[must_use]
    pub fn hero_gradient(&self) -> GradientSpec {
        GradientSpec {
            kind: self.hero_gradient_type,
            direction: self.hero_gradient_direction.clone(),
            colors: vec![
                self.hero_gradient_color1.clone(),
                self.hero_gradient_color2.clone(),
                self.hero_gradient_color3.clone(),
                self.hero_gradient_color4.clone(),
            ],
        }
    }

    fn sanitize(&mut self) {
        let fallback = Self::default();
        let pairs = [
            (&mut self.primary_color, fallback.primary_color),
            (&mut self.secondary_color, fallback.secondary_color),
            (&mut self.accent_color, fallback.accent_color),
            (&mut self.background_color, fallback.background_color),
            (&mut self.text_color, fallback.text_color),
            (&mut self.navbar_color, fallback.navbar_color),
            (&mut self.navbar_text_color, fallback.navbar_text_color),
            (&mut self.footer_color, fallback.footer_color),
            (&mut self.footer_text_color, fallback.footer_text_color),
            (&mut self.hero_background_color, fallback.hero_background_color),
            (&mut self.hero_overlay_color, fallback.hero_overlay_color),
        ];
        for (color, default) in pairs {
            if !crate::theme::color::is_valid_hex(color) {
                warn!(color = %color, fallback = %default, "Invalid color in appearance");
                *color = default;
            }
        }
        for (font, default) in [
            (&mut self.font_family, fallback.font_family),
            (&mut self.heading_font, fallback.heading_font),
        ] {
            if font.trim().is_empty() {
                *font = default;
            }
        }
        self.hero_overlay_opacity = self.hero_overlay_opacity.min(100);
        if self.hero_image.as_deref().is_some_and(|url| url.trim().is_empty()) {
            self.hero_image = None;
        }
    }
}

/// Field value, or the type's default when it is null or of the wrong shape
///
/// Empty strings produced here are replaced by the key default in `sanitize`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }
    Ok(T::deserialize(&value).unwrap_or_else(|e| {
        warn!(value = %value, error = %e, "Ignoring malformed appearance field");
        T::default()
    }))
}

/// Accepts `16`, `"16"` or `"16px"`
fn parse_pixels(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(text) => text.trim().trim_end_matches("px").trim().parse().ok(),
        _ => None,
    }
}

fn de_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(parse_pixels(&value).unwrap_or(defaults::FONT_SIZE_PX))
}

fn de_border_radius<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(parse_pixels(&value).unwrap_or(defaults::BORDER_RADIUS_PX))
}

/// Percentage from a number or numeric string, clamped to `0..=100`
fn de_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let percent = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(percent
        .filter(|p| p.is_finite())
        .map_or(DEFAULT_OVERLAY_OPACITY, |p| p.clamp(0.0, 100.0).round() as u8))
}

/// Floating button position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhatsAppPosition {
    /// Bottom left corner
    BottomLeft,
    /// Bottom right corner; also used for unknown values
    #[default]
    #[serde(other)]
    BottomRight,
}

/// WhatsApp contact button from `config.whatsapp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhatsAppSettings {
    /// Show the button
    pub enabled: bool,
    /// Phone number in international format
    pub phone: String,
    /// Prefilled message
    pub message: String,
    /// Button position
    pub position: WhatsAppPosition,
}

impl Default for WhatsAppSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            phone: String::new(),
            message: defaults::WHATSAPP_MESSAGE.to_owned(),
            position: WhatsAppPosition::default(),
        }
    }
}

impl WhatsAppSettings {
    /// `https://wa.me` link, or `None` when disabled or no phone is set
    #[must_use]
    pub fn link(&self) -> Option<String> {
        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        if !self.enabled || digits.is_empty() {
            return None;
        }
        let text = urlencoding::encode(&self.message);
        Some(format!("https://wa.me/{digits}?text={text}"))
    }
}

/// Override for one navbar or sidebar entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavOverride {
    /// Replacement label
    pub label: Option<String>,
    /// Show or hide the entry
    pub visible: Option<bool>,
    /// Sort position
    pub order: Option<i32>,
}

/// Fully resolved site settings
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSettings {
    /// Colors, fonts, sizes and hero background
    pub appearance: Appearance,
    /// Module flags from `frontpage.modulos`
    pub modules: ModuleFlags,
    /// Navbar overrides keyed by module key or href
    pub navbar: BTreeMap<String, NavOverride>,
    /// Sidebar overrides keyed by href
    pub sidebar: BTreeMap<String, NavOverride>,
    /// WhatsApp button
    pub whatsapp: WhatsAppSettings,
    /// Active preset id, always a known preset
    pub active_preset: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self::resolve(&Value::Null)
    }
}

impl SiteSettings {
    /// Resolve a configuration document, filling every default
    #[must_use]
    pub fn resolve(config: &Value) -> Self {
        let mut appearance: Appearance = section(config, "/appearance");
        appearance.sanitize();

        let active_preset = config
            .pointer("/theme2025/activePreset")
            .and_then(Value::as_str)
            .and_then(presets::find_preset)
            .map_or(DEFAULT_PRESET_ID, |preset| preset.id)
            .to_owned();

        Self {
            appearance,
            modules: ModuleFlags::from_config(config),
            navbar: overrides(config, "/navbar"),
            sidebar: overrides(config, "/sidebar"),
            whatsapp: section(config, "/whatsapp"),
            active_preset,
        }
    }

    /// Whether the route is enabled by the module flags
    #[must_use]
    pub fn is_enabled(&self, route_id: &str) -> bool {
        self.modules.is_enabled(route_id)
    }
}

fn section<T: DeserializeOwned + Default>(config: &Value, pointer: &str) -> T {
    match config.pointer(pointer) {
        None | Some(Value::Null) => T::default(),
        Some(value) => T::deserialize(value).unwrap_or_else(|e| {
            warn!(section = pointer, error = %e, "Malformed config section, using defaults");
            T::default()
        }),
    }
}

/// Entries of an override map; non-object entries are skipped
fn overrides(config: &Value, pointer: &str) -> BTreeMap<String, NavOverride> {
    let Some(map) = config.pointer(pointer).and_then(Value::as_object) else {
        return BTreeMap::new();
    };
    map.iter()
        .filter(|(_, value)| value.is_object())
        .filter_map(|(key, value)| match NavOverride::deserialize(value) {
            Ok(entry) => Some((key.clone(), entry)),
            Err(e) => {
                warn!(section = pointer, key = %key, error = %e, "Skipping malformed override");
                None
            }
        })
        .collect()
}
