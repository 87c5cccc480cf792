// ABOUTME: Inline editing of the site configuration by privileged users
// ABOUTME: Role-gated save with fetch-merge-write, plus a per-field edit state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Inline Editor
//!
//! [`InlineEditor::save`] performs one edit:
//!
//! 1. reject callers without a privileged role before any network traffic;
//! 2. fetch the latest document;
//! 3. merge the new value at its path;
//! 4. send the merged document as a full replace;
//! 5. the backend invalidates the cached config on success.
//!
//! Concurrent saves are last-writer-wins. Fetching right before merging keeps
//! the window small but does not close it; `PATCH /api/config` merges on the
//! server inside a transaction for callers that need that.

/// Path parsing and structural merge
pub mod merge;

use crate::client::ClientError;
use merge::{merge_at_path, value_at, ConfigPath};
use serde_json::Value;
use sitekit_core::permissions::Role;
use tracing::{info, warn};

/// Source of truth for the configuration document
#[async_trait::async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Fetch the current document, bypassing any cache
    async fn fetch_latest(&self) -> Result<Value, ClientError>;

    /// Replace the document and invalidate cached copies; returns the stored document
    async fn replace(&self, config: Value) -> Result<Value, ClientError>;
}

/// Saves single-field edits into the configuration document
pub struct InlineEditor<B> {
    backend: B,
}

impl<B: ConfigBackend> InlineEditor<B> {
    /// Create an editor over a backend
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Backend used for reads and writes
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Merge `value` at `path` and persist the whole document
    ///
    /// # Errors
    ///
    /// - [`ClientError::Forbidden`] when `role` is not privileged (no request is sent)
    /// - [`ClientError::InvalidPath`] when the path does not resolve
    /// - the fetch or write failure otherwise; writes are not retried
    pub async fn save(&self, role: Role, path: &str, value: Value) -> Result<Value, ClientError> {
        if !role.is_privileged() {
            warn!(%role, path, "Inline edit rejected: role lacks edit permission");
            return Err(ClientError::Forbidden);
        }
        let path = ConfigPath::parse(path)?;

        let latest = self.backend.fetch_latest().await?;
        let merged = merge_at_path(&latest, &path, value)?;
        let stored = self.backend.replace(merged).await?;

        info!(path = %path, "Inline edit saved");
        Ok(stored)
    }
}

/// Edit state of one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState {
    /// Showing the stored value
    Viewing,
    /// User is changing the draft
    Editing {
        /// Unsaved value
        draft: Value,
    },
    /// Draft is being written
    Saving {
        /// Value being written
        draft: Value,
    },
}

/// One editable field bound to a config path
#[derive(Debug, Clone)]
pub struct FieldEditor {
    path: ConfigPath,
    displayed: Value,
    state: FieldState,
    last_error: Option<ClientError>,
}

impl FieldEditor {
    /// Field showing `displayed`, stored at `path`
    #[must_use]
    pub const fn new(path: ConfigPath, displayed: Value) -> Self {
        Self {
            path,
            displayed,
            state: FieldState::Viewing,
            last_error: None,
        }
    }

    /// Field reading its current value from `document`; missing values show as null
    #[must_use]
    pub fn from_document(path: ConfigPath, document: &Value) -> Self {
        let displayed = value_at(document, &path).cloned().unwrap_or(Value::Null);
        Self::new(path, displayed)
    }

    /// Path this field edits
    #[must_use]
    pub const fn path(&self) -> &ConfigPath {
        &self.path
    }

    /// Value currently rendered
    #[must_use]
    pub const fn displayed(&self) -> &Value {
        &self.displayed
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &FieldState {
        &self.state
    }

    /// Error from the last failed save, cleared by the next edit or success
    #[must_use]
    pub const fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    /// Start editing with the displayed value as draft
    pub fn begin_edit(&mut self) {
        if self.state == FieldState::Viewing {
            self.state = FieldState::Editing {
                draft: self.displayed.clone(),
            };
        }
    }

    /// Replace the draft; ignored unless editing
    pub fn set_draft(&mut self, value: Value) {
        if let FieldState::Editing { draft } = &mut self.state {
            *draft = value;
            self.last_error = None;
        }
    }

    /// Drop the draft and go back to the displayed value
    pub fn cancel(&mut self) {
        if matches!(self.state, FieldState::Editing { .. }) {
            self.state = FieldState::Viewing;
            self.last_error = None;
        }
    }

    /// Save the draft through `editor`
    ///
    /// On success the draft becomes the displayed value. On failure the
    /// displayed value is unchanged and the field returns to editing with the
    /// error recorded.
    ///
    /// # Errors
    ///
    /// Returns the save failure, or `InvalidPath` when not editing
    pub async fn save<B: ConfigBackend>(
        &mut self,
        editor: &InlineEditor<B>,
        role: Role,
    ) -> Result<(), ClientError> {
        let FieldState::Editing { draft } = &self.state else {
            return Err(ClientError::InvalidPath(format!(
                "field '{}' is not being edited",
                self.path
            )));
        };
        let draft = draft.clone();
        self.state = FieldState::Saving {
            draft: draft.clone(),
        };

        match editor.save(role, &self.path.to_string(), draft.clone()).await {
            Ok(stored) => {
                self.displayed = value_at(&stored, &self.path).cloned().unwrap_or(draft);
                self.state = FieldState::Viewing;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.state = FieldState::Editing { draft };
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}
