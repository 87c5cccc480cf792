// ABOUTME: Navbar and sidebar entries derived from built-in defaults and config override maps
// ABOUTME: Overrides change label, visibility and order; disabled modules are filtered out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::modules::resolve_module_key;
use crate::schema::{NavOverride, SiteSettings};
use serde::Serialize;
use std::collections::BTreeMap;

/// Built-in entry
struct DefaultItem {
    route_id: &'static str,
    label: &'static str,
    href: &'static str,
}

const NAVBAR_DEFAULTS: &[DefaultItem] = &[
    DefaultItem { route_id: "home", label: "Inicio", href: "/" },
    DefaultItem { route_id: "about", label: "Conócenos", href: "/conocenos" },
    DefaultItem { route_id: "services", label: "Servicios", href: "/servicios" },
    DefaultItem { route_id: "blog", label: "Blog", href: "/blog" },
    DefaultItem { route_id: "store", label: "Tienda", href: "/tienda" },
    DefaultItem { route_id: "reservations", label: "Reservas", href: "/reservas" },
    DefaultItem { route_id: "contact", label: "Contacto", href: "/contacto" },
];

const SIDEBAR_DEFAULTS: &[DefaultItem] = &[
    DefaultItem { route_id: "dashboard", label: "Panel", href: "/admin" },
    DefaultItem { route_id: "appearance", label: "Apariencia", href: "/admin/apariencia" },
    DefaultItem { route_id: "pages", label: "Contenido", href: "/admin/contenido" },
    DefaultItem { route_id: "media", label: "Medios", href: "/admin/medios" },
    DefaultItem { route_id: "blog", label: "Blog", href: "/admin/blog" },
    DefaultItem { route_id: "store", label: "Tienda", href: "/admin/tienda" },
    DefaultItem { route_id: "reservations", label: "Reservas", href: "/admin/reservas" },
    DefaultItem { route_id: "testimonials", label: "Testimonios", href: "/admin/testimonios" },
    DefaultItem { route_id: "faq", label: "Preguntas frecuentes", href: "/admin/faqs" },
    DefaultItem { route_id: "settings", label: "Ajustes", href: "/admin/ajustes" },
];

/// Rendered navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    /// Module key the entry is gated by
    pub module_key: String,
    /// Visible label
    pub label: String,
    /// Link target
    pub href: String,
    /// Sort position
    pub order: i32,
}

fn build<'a>(
    defaults: &[DefaultItem],
    settings: &SiteSettings,
    lookup: impl Fn(&DefaultItem) -> Option<&'a NavOverride>,
) -> Vec<NavItem> {
    let mut items: Vec<NavItem> = defaults
        .iter()
        .zip(0..)
        .filter(|(item, _)| settings.is_enabled(item.route_id))
        .filter_map(|(item, position)| {
            let entry = lookup(item);
            if entry.and_then(|o| o.visible) == Some(false) {
                return None;
            }
            Some(NavItem {
                module_key: resolve_module_key(item.route_id).to_owned(),
                label: entry
                    .and_then(|o| o.label.clone())
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| item.label.to_owned()),
                href: item.href.to_owned(),
                order: entry.and_then(|o| o.order).unwrap_or(position),
            })
        })
        .collect();
    // stable: ties keep default order
    items.sort_by_key(|item| item.order);
    items
}

/// Navbar entries; overrides are keyed by route id, module key or href
#[must_use]
pub fn navbar_items(settings: &SiteSettings) -> Vec<NavItem> {
    let overrides: &BTreeMap<String, NavOverride> = &settings.navbar;
    build(NAVBAR_DEFAULTS, settings, |item| {
        overrides
            .get(item.route_id)
            .or_else(|| overrides.get(resolve_module_key(item.route_id)))
            .or_else(|| overrides.get(item.href))
    })
}

/// Admin sidebar entries; overrides are keyed by href
#[must_use]
pub fn sidebar_items(settings: &SiteSettings) -> Vec<NavItem> {
    let overrides = &settings.sidebar;
    build(SIDEBAR_DEFAULTS, settings, |item| overrides.get(item.href))
}
