// ABOUTME: Static table of named design presets with their CSS variables and stylesheets
// ABOUTME: Preset ids are stable because the active id is persisted in the site config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use sitekit_core::constants::theme::{DEFAULT_PRESET_ID, THEME_CLASS_PREFIX};

/// One-click visual style
#[derive(Debug, PartialEq, Eq)]
pub struct ThemePreset {
    /// Stable id stored in `theme2025.activePreset`
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// CSS custom properties set by the preset
    pub variables: &'static [(&'static str, &'static str)],
    /// Stylesheet injected while the preset is active
    pub custom_css: &'static str,
}

impl ThemePreset {
    /// Class applied to the document root, e.g. `theme-brutal`
    #[must_use]
    pub fn class_name(&self) -> String {
        format!("{THEME_CLASS_PREFIX}{}", self.id)
    }
}

/// Every known preset
pub static PRESETS: &[ThemePreset] = &[
    ThemePreset {
        id: "glassmorphic",
        name: "Glassmorphic",
        variables: &[
            ("--card-bg", "rgba(255, 255, 255, 0.15)"),
            ("--card-border", "1px solid rgba(255, 255, 255, 0.3)"),
            ("--card-blur", "12px"),
            ("--card-shadow", "0 8px 32px rgba(31, 38, 135, 0.2)"),
            ("--radius", "16px"),
        ],
        custom_css: r".theme-glassmorphic .card {
  background: var(--card-bg);
  border: var(--card-border);
  backdrop-filter: blur(var(--card-blur));
  -webkit-backdrop-filter: blur(var(--card-blur));
  box-shadow: var(--card-shadow);
  border-radius: var(--radius);
}
.theme-glassmorphic nav {
  background: rgba(255, 255, 255, 0.1);
  backdrop-filter: blur(10px);
}
",
    },
    ThemePreset {
        id: "neumorphic",
        name: "Neumorphic",
        variables: &[
            ("--card-bg", "#e0e5ec"),
            ("--card-border", "none"),
            (
                "--card-shadow",
                "9px 9px 16px rgba(163, 177, 198, 0.6), -9px -9px 16px rgba(255, 255, 255, 0.5)",
            ),
            ("--radius", "20px"),
        ],
        custom_css: r".theme-neumorphic body {
  background: #e0e5ec;
}
.theme-neumorphic .card,
.theme-neumorphic button {
  background: var(--card-bg);
  border: var(--card-border);
  box-shadow: var(--card-shadow);
  border-radius: var(--radius);
}
.theme-neumorphic button:active {
  box-shadow: inset 6px 6px 10px rgba(163, 177, 198, 0.6), inset -6px -6px 10px rgba(255, 255, 255, 0.5);
}
",
    },
    ThemePreset {
        id: "brutal",
        name: "Brutal",
        variables: &[
            ("--card-bg", "#ffffff"),
            ("--card-border", "3px solid #000000"),
            ("--card-shadow", "6px 6px 0 #000000"),
            ("--radius", "0px"),
        ],
        custom_css: r".theme-brutal .card,
.theme-brutal button {
  background: var(--card-bg);
  border: var(--card-border);
  box-shadow: var(--card-shadow);
  border-radius: var(--radius);
  font-weight: 700;
}
.theme-brutal h1,
.theme-brutal h2 {
  text-transform: uppercase;
  letter-spacing: -0.02em;
}
",
    },
    ThemePreset {
        id: "minimal",
        name: "Minimal",
        variables: &[
            ("--card-bg", "#ffffff"),
            ("--card-border", "1px solid #e5e7eb"),
            ("--card-shadow", "none"),
            ("--radius", "4px"),
        ],
        custom_css: r".theme-minimal .card {
  background: var(--card-bg);
  border: var(--card-border);
  box-shadow: var(--card-shadow);
  border-radius: var(--radius);
}
",
    },
    ThemePreset {
        id: "minimal2025",
        name: "Minimal 2025",
        variables: &[
            ("--card-bg", "#ffffff"),
            ("--card-border", "1px solid rgba(0, 0, 0, 0.06)"),
            ("--card-shadow", "0 1px 2px rgba(0, 0, 0, 0.04), 0 8px 24px rgba(0, 0, 0, 0.06)"),
            ("--radius", "12px"),
            ("--section-spacing", "6rem"),
        ],
        custom_css: r".theme-minimal2025 .card {
  background: var(--card-bg);
  border: var(--card-border);
  box-shadow: var(--card-shadow);
  border-radius: var(--radius);
  transition: transform 0.2s ease, box-shadow 0.2s ease;
}
.theme-minimal2025 .card:hover {
  transform: translateY(-2px);
}
.theme-minimal2025 section {
  padding-block: var(--section-spacing);
}
",
    },
];

/// Look up a preset by id
#[must_use]
pub fn find_preset(id: &str) -> Option<&'static ThemePreset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

/// The fallback preset
#[must_use]
pub fn default_preset() -> &'static ThemePreset {
    find_preset(DEFAULT_PRESET_ID).unwrap_or(&PRESETS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PRESETS.len());
    }

    #[test]
    fn test_default_preset_exists() {
        assert_eq!(default_preset().id, DEFAULT_PRESET_ID);
        assert!(find_preset("nope").is_none());
    }

    #[test]
    fn test_stylesheets_are_scoped_to_their_class() {
        for preset in PRESETS {
            assert!(
                preset.custom_css.contains(&format!(".{}", preset.class_name())),
                "{}",
                preset.id
            );
            assert!(preset.variables.iter().all(|(name, _)| name.starts_with("--")));
        }
    }
}
