// ABOUTME: Theme resolution constants
// ABOUTME: Preset fallback, document class prefix, overlay and gradient defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Preset used when none is saved or the saved one no longer exists
pub const DEFAULT_PRESET_ID: &str = "minimal2025";

/// Prefix of the preset class applied to the document root
pub const THEME_CLASS_PREFIX: &str = "theme-";

/// Hero overlay opacity in percent
pub const DEFAULT_OVERLAY_OPACITY: u8 = 50;

/// Hero overlay color
pub const DEFAULT_OVERLAY_COLOR: &str = "#000000";

/// Linear gradient direction when none is configured
pub const DEFAULT_GRADIENT_DIRECTION: &str = "to right";

/// Maximum number of configured gradient stops
pub const MAX_GRADIENT_STOPS: usize = 4;
