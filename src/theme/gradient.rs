// ABOUTME: Gradient background description and its CSS rendering
// ABOUTME: Radial gradients render as circles; linear gradients default to "to right"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use sitekit_core::constants::theme::{DEFAULT_GRADIENT_DIRECTION, MAX_GRADIENT_STOPS};

/// Gradient shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    /// `linear-gradient(<direction>, ...)`
    #[default]
    Linear,
    /// `radial-gradient(circle, ...)`
    Radial,
}

/// Configured gradient
///
/// `colors` keeps the configured slots in order; empty slots are skipped
/// when rendering and at most four stops are used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Gradient shape
    #[serde(rename = "type", default)]
    pub kind: GradientKind,
    /// Linear direction such as `45deg` or `to bottom`
    #[serde(default)]
    pub direction: Option<String>,
    /// Color slots in configured order
    #[serde(default)]
    pub colors: Vec<Option<String>>,
}

impl GradientSpec {
    /// Color stops that will be rendered
    pub fn stops(&self) -> impl Iterator<Item = &str> {
        self.colors
            .iter()
            .take(MAX_GRADIENT_STOPS)
            .filter_map(|slot| slot.as_deref().map(str::trim))
            .filter(|color| !color.is_empty())
    }

    /// Render as a CSS `background` value; `None` when no stop is set
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        let stops = self.stops().collect::<Vec<_>>().join(", ");
        if stops.is_empty() {
            return None;
        }
        let css = match self.kind {
            GradientKind::Radial => format!("radial-gradient(circle, {stops})"),
            GradientKind::Linear => {
                let direction = self
                    .direction
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(DEFAULT_GRADIENT_DIRECTION);
                format!("linear-gradient({direction}, {stops})")
            }
        };
        Some(css)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gradient(value: serde_json::Value) -> GradientSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_radial_gradient() {
        let gradient = gradient(json!({"type": "radial", "colors": ["#111", "#222"]}));
        assert_eq!(
            gradient.to_css().as_deref(),
            Some("radial-gradient(circle, #111, #222)")
        );
    }

    #[test]
    fn test_linear_gradient_keeps_stop_order() {
        let gradient = gradient(json!({
            "type": "linear",
            "direction": "45deg",
            "colors": ["#111", "#222", "#333"]
        }));
        assert_eq!(
            gradient.to_css().as_deref(),
            Some("linear-gradient(45deg, #111, #222, #333)")
        );
    }

    #[test]
    fn test_default_direction_and_skipped_slots() {
        let gradient = gradient(json!({"colors": ["#111", null, "", "#444"]}));
        assert_eq!(
            gradient.to_css().as_deref(),
            Some("linear-gradient(to right, #111, #444)")
        );
    }

    #[test]
    fn test_at_most_four_slots() {
        let gradient = gradient(json!({
            "type": "radial",
            "colors": ["#1", "#2", "#3", "#4", "#5"]
        }));
        assert_eq!(gradient.stops().count(), 4);
    }

    #[test]
    fn test_no_stops_renders_nothing() {
        assert_eq!(GradientSpec::default().to_css(), None);
        let blank = gradient(json!({"type": "radial", "colors": [null, " ", ""]}));
        assert_eq!(blank.to_css(), None);
    }
}
