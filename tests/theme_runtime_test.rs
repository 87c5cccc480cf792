// ABOUTME: End-to-end tests for the client runtime: module gating, theme restore and preset switching
// ABOUTME: Runs the runtime against a live server and against mocked auth failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{spawn_test_server, test_config_client, ADMIN_TOKEN, VISITOR_TOKEN};
use serde_json::json;
use sitekit::client::{ClientError, UnauthorizedPolicy};
use sitekit::modules::GateState;
use sitekit::navigation::navbar_items;
use sitekit::runtime::SiteRuntime;
use sitekit::theme::ThemeError;
use sitekit_core::permissions::Role;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_routes_are_pending_until_boot() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let admin = test_config_client(&base_url, Some(ADMIN_TOKEN));
    admin
        .replace_config(&json!({
            "frontpage": {"modulos": {"tienda": {"activo": false}}}
        }))
        .await
        .unwrap();

    let runtime = SiteRuntime::new(test_config_client(&base_url, None));
    assert_eq!(runtime.route_state("store"), GateState::Pending);
    assert!(runtime.settings().is_none());

    runtime.boot().await.unwrap();
    assert_eq!(runtime.route_state("store"), GateState::Disabled);
    assert_eq!(runtime.route_state("tienda"), GateState::Disabled);
    assert_eq!(runtime.route_state("blog"), GateState::Enabled);
    assert_eq!(runtime.route_state("home"), GateState::Enabled);

    let settings = runtime.settings().unwrap();
    assert!(!navbar_items(&settings)
        .iter()
        .any(|item| item.href == "/tienda"));
}

#[tokio::test]
async fn test_boot_applies_appearance_and_saved_preset() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let admin = test_config_client(&base_url, Some(ADMIN_TOKEN));
    admin
        .replace_config(&json!({
            "appearance": {"primaryColor": "#ff0000", "borderRadius": "4px"},
            "theme2025": {"activePreset": "neumorphic"}
        }))
        .await
        .unwrap();

    let runtime = SiteRuntime::new(test_config_client(&base_url, None));
    let settings = runtime.boot().await.unwrap();
    assert_eq!(settings.active_preset, "neumorphic");

    let snapshot = runtime.theme().snapshot();
    assert_eq!(snapshot.active_preset.as_deref(), Some("neumorphic"));
    assert_eq!(
        snapshot.theme_classes().collect::<Vec<_>>(),
        ["theme-neumorphic"]
    );
    assert_eq!(snapshot.appearance_variables["--primary"], "0 100% 50%");
    assert_eq!(snapshot.appearance_variables["--radius"], "4px");
    assert!(snapshot.hero.is_some());
}

#[tokio::test]
async fn test_unknown_saved_preset_falls_back_to_default() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    test_config_client(&base_url, Some(ADMIN_TOKEN))
        .replace_config(&json!({"theme2025": {"activePreset": "vaporwave"}}))
        .await
        .unwrap();

    let runtime = SiteRuntime::new(test_config_client(&base_url, None));
    runtime.boot().await.unwrap();
    assert_eq!(
        runtime.theme().snapshot().active_preset.as_deref(),
        Some("minimal2025")
    );
}

#[tokio::test]
async fn test_unauthorized_config_renders_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let runtime = SiteRuntime::new(test_config_client(&server.uri(), None));
    let settings = runtime.boot().await.unwrap();
    assert_eq!(settings.appearance.primary_color, "#3b82f6");
    assert_eq!(runtime.route_state("store"), GateState::Enabled);
    assert_eq!(runtime.document(), Some(json!({})));
}

#[tokio::test]
async fn test_failed_boot_keeps_routes_pending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let runtime = SiteRuntime::new(test_config_client(&server.uri(), None));
    assert!(runtime.boot().await.is_err());
    assert_eq!(runtime.route_state("about"), GateState::Pending);
}

#[tokio::test]
async fn test_select_preset_persists_choice() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let runtime = SiteRuntime::new(test_config_client(&base_url, Some(ADMIN_TOKEN)));
    runtime.boot().await.unwrap();

    let preset = runtime
        .theme_controller()
        .select_preset(Role::Admin, "brutal")
        .await
        .unwrap();
    assert_eq!(preset.id, "brutal");
    assert_eq!(runtime.theme().snapshot().variables()["--radius"], "0px");

    let stored = runtime
        .client()
        .get_config(UnauthorizedPolicy::Throw)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.config["theme2025"]["activePreset"], "brutal");

    let fresh = SiteRuntime::new(test_config_client(&base_url, None));
    assert_eq!(fresh.boot().await.unwrap().active_preset, "brutal");
}

#[tokio::test]
async fn test_select_preset_reverts_when_save_is_rejected() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    test_config_client(&base_url, Some(ADMIN_TOKEN))
        .replace_config(&json!({"theme2025": {"activePreset": "glassmorphic"}}))
        .await
        .unwrap();

    let runtime = SiteRuntime::new(test_config_client(&base_url, Some(VISITOR_TOKEN)));
    runtime.boot().await.unwrap();

    let err = runtime
        .theme_controller()
        .select_preset(Role::Admin, "minimal")
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeError::Save(ClientError::Forbidden)));

    let snapshot = runtime.theme().snapshot();
    assert_eq!(snapshot.active_preset.as_deref(), Some("glassmorphic"));
    assert_eq!(
        snapshot.theme_classes().collect::<Vec<_>>(),
        ["theme-glassmorphic"]
    );
}

#[tokio::test]
async fn test_select_preset_rejects_visitors_and_unknown_ids() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let runtime = SiteRuntime::new(test_config_client(&base_url, Some(ADMIN_TOKEN)));
    runtime.boot().await.unwrap();
    let controller = runtime.theme_controller();

    let err = controller
        .select_preset(Role::Visitor, "brutal")
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeError::Save(ClientError::Forbidden)));
    assert_eq!(
        runtime.theme().snapshot().active_preset.as_deref(),
        Some("minimal2025")
    );

    let err = controller
        .select_preset(Role::Admin, "retro")
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeError::UnknownPreset(id) if id == "retro"));
}

#[tokio::test]
async fn test_runtime_refreshes_after_inline_edit() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let runtime = Arc::new(SiteRuntime::new(test_config_client(
        &base_url,
        Some(ADMIN_TOKEN),
    )));
    runtime.boot().await.unwrap();
    let watcher = runtime.watch_invalidations();
    assert_eq!(runtime.route_state("reservations"), GateState::Enabled);

    runtime
        .editor()
        .save(Role::Admin, "frontpage.modulos.reservas.activo", json!(false))
        .await
        .unwrap();

    let mut disabled = false;
    for _ in 0..50 {
        if runtime.route_state("reservations") == GateState::Disabled {
            disabled = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    watcher.abort();
    assert!(disabled, "runtime did not pick up the module change");
}

#[tokio::test]
async fn test_watcher_stops_when_runtime_is_dropped() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let client = test_config_client(&base_url, None);
    let runtime = Arc::new(SiteRuntime::new(client.clone()));
    runtime.boot().await.unwrap();
    let watcher = runtime.watch_invalidations();

    drop(runtime);
    tokio::time::timeout(Duration::from_secs(2), watcher)
        .await
        .expect("watcher outlived its runtime")
        .unwrap();

    // the shared query client is still usable
    assert!(client
        .get_config(UnauthorizedPolicy::Throw)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_background_refetch_reaches_theme_and_gate() {
    let (base_url, _context) = spawn_test_server().await.unwrap();
    let admin = test_config_client(&base_url, Some(ADMIN_TOKEN));
    admin
        .replace_config(&json!({"appearance": {"primaryColor": "#0000ff"}}))
        .await
        .unwrap();

    let config = sitekit::config::ClientConfig::new(base_url.as_str())
        .with_retry(sitekit::retry::RetryPolicy::immediate(2))
        .with_stale_time(Duration::ZERO);
    let query = sitekit::client::QueryClient::new(config).unwrap();
    let runtime = Arc::new(SiteRuntime::new(sitekit::client::ConfigClient::new(query)));
    runtime.boot().await.unwrap();
    let watcher = runtime.watch_invalidations();
    assert_eq!(
        runtime.theme().snapshot().appearance_variables["--primary"],
        "240 100% 50%"
    );

    admin
        .replace_config(&json!({
            "appearance": {"primaryColor": "#ff0000"},
            "frontpage": {"modulos": {"blog": {"activo": false}}}
        }))
        .await
        .unwrap();

    // serves the stale entry and refetches in the background
    let stale = runtime
        .client()
        .get_config(UnauthorizedPolicy::Throw)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stale.config["appearance"]["primaryColor"], "#0000ff");

    let mut followed = false;
    for _ in 0..50 {
        if runtime.route_state("blog") == GateState::Disabled {
            followed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    watcher.abort();
    assert!(followed, "runtime did not follow the background refetch");
    assert_eq!(
        runtime.theme().snapshot().appearance_variables["--primary"],
        "0 100% 50%"
    );
    assert_eq!(
        runtime.settings().unwrap().appearance.primary_color,
        "#ff0000"
    );
}
