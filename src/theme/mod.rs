// ABOUTME: Theme resolution pipeline from appearance settings to CSS variables, classes and stylesheets
// ABOUTME: Preset selection applies locally, persists through the inline editor, and reverts on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Theme
//!
//! - [`css_variables`] maps resolved appearance settings to CSS custom
//!   properties. Colors are published both as `h s% l%` triples and as hex.
//! - [`presets`] holds the static preset table.
//! - [`state::ThemeState`] is the single owner of applied theme state.
//! - [`ThemeController::select_preset`] switches presets on behalf of an admin.

/// Hex to HSL conversion
pub mod color;
/// Gradient backgrounds
pub mod gradient;
/// Hero section layers
pub mod hero;
/// Named design presets
pub mod presets;
/// Single-writer theme state
pub mod state;

use crate::client::ClientError;
use crate::editor::{ConfigBackend, InlineEditor};
use crate::schema::Appearance;
use presets::{find_preset, ThemePreset};
use serde_json::json;
use sitekit_core::permissions::Role;
use state::ThemeState;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Config path holding the active preset id
pub const ACTIVE_PRESET_PATH: &str = "theme2025.activePreset";

/// CSS custom properties for resolved appearance settings
#[must_use]
pub fn css_variables(appearance: &Appearance) -> BTreeMap<String, String> {
    let colors = [
        ("primary", &appearance.primary_color),
        ("secondary", &appearance.secondary_color),
        ("accent", &appearance.accent_color),
        ("background", &appearance.background_color),
        ("foreground", &appearance.text_color),
        ("navbar", &appearance.navbar_color),
        ("navbar-foreground", &appearance.navbar_text_color),
        ("footer", &appearance.footer_color),
        ("footer-foreground", &appearance.footer_text_color),
    ];

    let mut variables = BTreeMap::new();
    for (name, hex) in colors {
        match color::hex_to_hsl(hex) {
            Ok(hsl) => {
                variables.insert(format!("--{name}"), color::hsl_to_css(hsl));
                variables.insert(format!("--{name}-hex"), hex.clone());
            }
            Err(e) => warn!(variable = name, error = %e, "Skipping color variable"),
        }
    }
    variables.insert(
        "--font-body".to_owned(),
        format!("\"{}\", sans-serif", appearance.font_family),
    );
    variables.insert(
        "--font-heading".to_owned(),
        format!("\"{}\", sans-serif", appearance.heading_font),
    );
    variables.insert(
        "--font-size-base".to_owned(),
        format!("{}px", appearance.font_size),
    );
    variables.insert(
        "--radius".to_owned(),
        format!("{}px", appearance.border_radius),
    );
    variables
}

/// Preset selection failure
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No preset with this id
    #[error("unknown theme preset '{0}'")]
    UnknownPreset(String),
    /// Persisting the selection failed
    #[error(transparent)]
    Save(#[from] ClientError),
}

/// Switches presets and persists the choice
pub struct ThemeController<B> {
    state: Arc<ThemeState>,
    editor: InlineEditor<B>,
}

impl<B: ConfigBackend> ThemeController<B> {
    /// Controller writing through `editor`
    pub const fn new(state: Arc<ThemeState>, editor: InlineEditor<B>) -> Self {
        Self { state, editor }
    }

    /// Theme state being driven
    #[must_use]
    pub const fn state(&self) -> &Arc<ThemeState> {
        &self.state
    }

    /// Apply preset `id` and save it as the active preset
    ///
    /// The preset is applied before the save. If the save fails the previous
    /// preset is applied again.
    ///
    /// # Errors
    ///
    /// - [`ThemeError::UnknownPreset`] for an id missing from the table
    /// - [`ClientError::Forbidden`] for non-admin roles, before anything changes
    /// - the save failure otherwise
    pub async fn select_preset(
        &self,
        role: Role,
        id: &str,
    ) -> Result<&'static ThemePreset, ThemeError> {
        let preset = find_preset(id).ok_or_else(|| ThemeError::UnknownPreset(id.to_owned()))?;
        if !role.is_privileged() {
            return Err(ClientError::Forbidden.into());
        }

        let previous = self.state.snapshot().active_preset;
        self.state.apply_preset(preset);

        if let Err(e) = self
            .editor
            .save(role, ACTIVE_PRESET_PATH, json!(preset.id))
            .await
        {
            warn!(preset = preset.id, error = %e, "Saving preset failed, reverting");
            match previous.as_deref().and_then(find_preset) {
                Some(previous) => self.state.apply_preset(previous),
                None => self.state.clear_preset(),
            }
            return Err(e.into());
        }
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_variables_from_defaults() {
        let variables = css_variables(&Appearance::default());
        assert_eq!(variables["--primary"], "217 91% 60%");
        assert_eq!(variables["--primary-hex"], "#3b82f6");
        assert_eq!(variables["--font-size-base"], "16px");
        assert_eq!(variables["--font-heading"], "\"Poppins\", sans-serif");
    }

    #[test]
    fn test_same_key_renders_the_same_everywhere() {
        let appearance = Appearance {
            navbar_color: "#3b82f6".to_owned(),
            ..Appearance::default()
        };
        let variables = css_variables(&appearance);
        assert_eq!(variables["--navbar"], variables["--primary"]);
    }
}
