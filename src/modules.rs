// ABOUTME: Module gate deciding whether a public route or feature is enabled by the site config
// ABOUTME: Maps logical route ids to frontpage module keys; absent keys default to enabled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Module Gate
//!
//! Optional feature areas (store, blog, reservations, ...) are toggled through
//! `frontpage.modulos.<key>.activo`. Public routes use English identifiers
//! while the document stores Spanish module keys, so lookups go through a
//! fixed alias table first. A key missing from the document counts as
//! enabled; only an explicit `activo: false` turns a module off.

use serde_json::Value;
use std::collections::BTreeMap;

/// Logical route id to module key
const MODULE_ALIASES: &[(&str, &str)] = &[
    ("store", "tienda"),
    ("reservations", "reservas"),
    ("testimonials", "testimonios"),
    ("faq", "faqs"),
    ("contact", "contacto"),
    ("gallery", "galeria"),
    ("team", "equipo"),
];

/// Routes that render regardless of module flags
pub const REQUIRED_ROUTES: &[&str] = &["home", "about", "services"];

/// Gate outcome for one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Configuration has not loaded yet; render a placeholder
    Pending,
    /// Route is enabled
    Enabled,
    /// Route is turned off; render the not-found view
    Disabled,
}

impl GateState {
    /// True only for [`GateState::Enabled`]
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Module key stored in the config for a logical route id
#[must_use]
pub fn resolve_module_key(route_id: &str) -> &str {
    MODULE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == route_id)
        .map_or(route_id, |(_, key)| key)
}

/// Whether `route_id` is always rendered
#[must_use]
pub fn is_required(route_id: &str) -> bool {
    REQUIRED_ROUTES.contains(&route_id)
}

/// `activo` flags read from `frontpage.modulos`, keyed by module key
///
/// Entries without a boolean `activo` are recorded as enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFlags {
    flags: BTreeMap<String, bool>,
}

impl ModuleFlags {
    /// Read the flags from a config document
    #[must_use]
    pub fn from_config(config: &Value) -> Self {
        let flags = config
            .pointer("/frontpage/modulos")
            .and_then(Value::as_object)
            .map(|modules| {
                modules
                    .iter()
                    .map(|(key, module)| {
                        let active = module.get("activo").and_then(Value::as_bool);
                        (key.clone(), active.unwrap_or(true))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { flags }
    }

    /// Whether `route_id` is enabled
    #[must_use]
    pub fn is_enabled(&self, route_id: &str) -> bool {
        is_required(route_id)
            || self
                .flags
                .get(resolve_module_key(route_id))
                .copied()
                .unwrap_or(true)
    }

    /// Module keys explicitly turned off
    pub fn disabled(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, active)| !**active)
            .map(|(key, _)| key.as_str())
    }
}

/// Whether `route_id` is enabled by `config`
#[must_use]
pub fn is_enabled(route_id: &str, config: &Value) -> bool {
    ModuleFlags::from_config(config).is_enabled(route_id)
}

/// Gate state for `route_id`; `None` means the config is still loading
#[must_use]
pub fn gate_state(route_id: &str, config: Option<&Value>) -> GateState {
    match config {
        None => GateState::Pending,
        Some(config) if is_enabled(route_id, config) => GateState::Enabled,
        Some(_) => GateState::Disabled,
    }
}
