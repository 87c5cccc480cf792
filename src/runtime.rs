// ABOUTME: Client runtime tying config fetch, module gating and theme application together
// ABOUTME: Re-resolves settings and re-applies the theme whenever the cached config changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Site Runtime
//!
//! Control flow on the client:
//!
//! 1. [`SiteRuntime::boot`] fetches the config through the query cache;
//! 2. the document is resolved once into [`SiteSettings`];
//! 3. appearance and the saved preset are applied to [`ThemeState`];
//! 4. routes ask [`SiteRuntime::route_state`], which is `Pending` until step 1
//!    has completed;
//! 5. after a privileged write invalidates `/api/config`, the task started by
//!    [`SiteRuntime::watch_invalidations`] calls [`SiteRuntime::refresh`],
//!    which repeats steps 1 to 3;
//! 6. when a background refetch stores a newer document, the same task
//!    repeats steps 2 and 3 from the cached value.

use crate::client::{CacheEvent, ClientError, ConfigClient, UnauthorizedPolicy};
use crate::editor::InlineEditor;
use crate::modules::{gate_state, GateState};
use crate::schema::SiteSettings;
use crate::theme::state::ThemeState;
use crate::theme::ThemeController;
use serde_json::{Map, Value};
use sitekit_core::constants::api_paths;
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Config document with its resolved settings
#[derive(Debug)]
struct Loaded {
    document: Value,
    settings: Arc<SiteSettings>,
}

/// Client-side site runtime
pub struct SiteRuntime {
    client: ConfigClient,
    theme: Arc<ThemeState>,
    loaded: watch::Sender<Option<Arc<Loaded>>>,
}

impl SiteRuntime {
    /// Runtime in the pending state; nothing is fetched until [`Self::boot`]
    #[must_use]
    pub fn new(client: ConfigClient) -> Self {
        let (loaded, _rx) = watch::channel(None);
        Self {
            client,
            theme: Arc::new(ThemeState::new()),
            loaded,
        }
    }

    /// Load the config and apply the theme
    ///
    /// # Errors
    ///
    /// Returns the fetch failure; routes stay pending
    pub async fn boot(&self) -> Result<Arc<SiteSettings>, ClientError> {
        let settings = self.refresh().await?;
        info!(
            preset = %settings.active_preset,
            disabled_modules = ?settings.modules.disabled().collect::<Vec<_>>(),
            "Site runtime booted"
        );
        Ok(settings)
    }

    /// Read the config through the cache and re-apply settings and theme
    ///
    /// A 401 is treated as an empty document. On failure the previous
    /// settings stay in place.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode failure
    pub async fn refresh(&self) -> Result<Arc<SiteSettings>, ClientError> {
        let document = match self.client.get_config(UnauthorizedPolicy::ReturnNull).await? {
            Some(record) => record.config,
            None => {
                warn!("Config read unauthorized, rendering with defaults");
                Value::Object(Map::new())
            }
        };

        Ok(self.apply(document))
    }

    /// Re-apply from the cached config when it differs from the loaded one
    async fn apply_cached(&self) -> Result<(), ClientError> {
        let Some(record) = self.client.cached_config().await? else {
            return Ok(());
        };
        let unchanged = self
            .loaded
            .borrow()
            .as_ref()
            .is_some_and(|loaded| loaded.document == record.config);
        if !unchanged {
            debug!("Applying config from background refetch");
            self.apply(record.config);
        }
        Ok(())
    }

    fn apply(&self, document: Value) -> Arc<SiteSettings> {
        let settings = Arc::new(SiteSettings::resolve(&document));
        self.theme.apply_appearance(&settings.appearance);
        self.theme.restore_preset(Some(&settings.active_preset));

        self.loaded.send_replace(Some(Arc::new(Loaded {
            document,
            settings: Arc::clone(&settings),
        })));
        settings
    }

    /// Gate state for a route; `Pending` until the first load completes
    #[must_use]
    pub fn route_state(&self, route_id: &str) -> GateState {
        let loaded = self.loaded.borrow();
        gate_state(route_id, loaded.as_ref().map(|loaded| &loaded.document))
    }

    /// Resolved settings, if loaded
    #[must_use]
    pub fn settings(&self) -> Option<Arc<SiteSettings>> {
        self.loaded
            .borrow()
            .as_ref()
            .map(|loaded| Arc::clone(&loaded.settings))
    }

    /// Raw config document, if loaded
    #[must_use]
    pub fn document(&self) -> Option<Value> {
        self.loaded
            .borrow()
            .as_ref()
            .map(|loaded| loaded.document.clone())
    }

    /// Theme state owned by this runtime
    #[must_use]
    pub const fn theme(&self) -> &Arc<ThemeState> {
        &self.theme
    }

    /// Typed API client
    #[must_use]
    pub const fn client(&self) -> &ConfigClient {
        &self.client
    }

    /// Inline editor writing through the shared client
    #[must_use]
    pub fn editor(&self) -> InlineEditor<ConfigClient> {
        InlineEditor::new(self.client.clone())
    }

    /// Preset switcher writing through the shared client
    #[must_use]
    pub fn theme_controller(&self) -> ThemeController<ConfigClient> {
        ThemeController::new(Arc::clone(&self.theme), self.editor())
    }

    /// Follow changes to the cached config entry
    ///
    /// An invalidation triggers [`Self::refresh`]; a value stored by a
    /// background refetch is applied from the cache without another request.
    /// The task holds only a weak reference and ends once the runtime is
    /// dropped.
    pub fn watch_invalidations(self: &Arc<Self>) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let mut events = self.client.query().subscribe();
        let mut loaded = self.loaded.subscribe();
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    event = events.recv() => event,
                    changed = loaded.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                };
                let Some(runtime) = weak.upgrade() else {
                    break;
                };
                let result = match event {
                    Ok(CacheEvent::Invalidated(key)) if key == api_paths::CONFIG => {
                        runtime.refresh().await.map(|_| ())
                    }
                    Ok(CacheEvent::Updated(key)) if key == api_paths::CONFIG => {
                        runtime.apply_cached().await
                    }
                    Ok(_) => Ok(()),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Cache events lagged, refreshing");
                        runtime.refresh().await.map(|_| ())
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if let Err(e) = result {
                    warn!(error = %e, "Config refresh failed");
                }
            }
            debug!("Config watcher stopped");
        })
    }
}
