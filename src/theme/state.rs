// ABOUTME: Single-writer theme state published to subscribers through a watch channel
// ABOUTME: Holds CSS variables, the one active theme class, the preset stylesheet and hero style
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::css_variables;
use super::hero::HeroStyle;
use super::presets::{default_preset, find_preset, ThemePreset};
use crate::schema::Appearance;
use sitekit_core::constants::theme::THEME_CLASS_PREFIX;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::watch;
use tracing::{debug, info};

/// Applied presentation state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeSnapshot {
    /// Variables derived from appearance settings
    pub appearance_variables: BTreeMap<String, String>,
    /// Variables set by the active preset
    pub preset_variables: BTreeMap<String, String>,
    /// Classes on the document root
    pub root_classes: BTreeSet<String>,
    /// Injected preset stylesheet
    pub stylesheet: String,
    /// Active preset id
    pub active_preset: Option<String>,
    /// Hero section style
    pub hero: Option<HeroStyle>,
}

impl ThemeSnapshot {
    /// Effective CSS variables; preset values win over appearance values
    #[must_use]
    pub fn variables(&self) -> BTreeMap<String, String> {
        let mut merged = self.appearance_variables.clone();
        merged.extend(
            self.preset_variables
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        merged
    }

    /// Root classes produced by presets
    pub fn theme_classes(&self) -> impl Iterator<Item = &str> {
        self.root_classes
            .iter()
            .map(String::as_str)
            .filter(|class| class.starts_with(THEME_CLASS_PREFIX))
    }
}

/// Owner of the theme state
///
/// Every change goes through this type; consumers hold a
/// [`watch::Receiver`] and read snapshots.
pub struct ThemeState {
    tx: watch::Sender<ThemeSnapshot>,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    /// Empty state with no preset applied
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ThemeSnapshot::default());
        Self { tx }
    }

    /// Receive every future snapshot
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> ThemeSnapshot {
        self.tx.borrow().clone()
    }

    /// Recompute appearance variables and hero style
    pub fn apply_appearance(&self, appearance: &Appearance) {
        let variables = css_variables(appearance);
        let hero = HeroStyle::resolve(appearance);
        self.tx.send_if_modified(|state| {
            let changed =
                state.appearance_variables != variables || state.hero.as_ref() != Some(&hero);
            state.appearance_variables = variables;
            state.hero = Some(hero);
            changed
        });
        debug!("Appearance applied");
    }

    /// Make `preset` the only active preset
    ///
    /// Removes every other `theme-*` root class and replaces the stylesheet.
    pub fn apply_preset(&self, preset: &ThemePreset) {
        let class = preset.class_name();
        self.tx.send_if_modified(|state| {
            if state.active_preset.as_deref() == Some(preset.id) {
                return false;
            }
            state
                .root_classes
                .retain(|existing| !existing.starts_with(THEME_CLASS_PREFIX));
            state.root_classes.insert(class);
            preset.custom_css.clone_into(&mut state.stylesheet);
            state.preset_variables = preset
                .variables
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
                .collect();
            state.active_preset = Some(preset.id.to_owned());
            true
        });
        info!(preset = preset.id, "Theme preset applied");
    }

    /// Drop the active preset, its class and stylesheet
    pub fn clear_preset(&self) {
        self.tx.send_if_modified(|state| {
            if state.active_preset.is_none() {
                return false;
            }
            state
                .root_classes
                .retain(|existing| !existing.starts_with(THEME_CLASS_PREFIX));
            state.stylesheet.clear();
            state.preset_variables.clear();
            state.active_preset = None;
            true
        });
    }

    /// Apply a saved preset id, or the default preset when it is missing or unknown
    pub fn restore_preset(&self, saved: Option<&str>) -> &'static ThemePreset {
        let preset = saved.and_then(find_preset).unwrap_or_else(|| {
            if let Some(id) = saved {
                debug!(preset = id, "Saved preset no longer exists, using default");
            }
            default_preset()
        });
        self.apply_preset(preset);
        preset
    }

    /// Add or remove a non-preset root class such as `dark`
    pub fn set_root_class(&self, class: &str, enabled: bool) {
        self.tx.send_if_modified(|state| {
            if enabled {
                state.root_classes.insert(class.to_owned())
            } else {
                state.root_classes.remove(class)
            }
        });
    }
}
