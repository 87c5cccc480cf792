// ABOUTME: Role model for privileged site operations
// ABOUTME: Admin is the only role allowed to edit config, content, and media
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of the caller performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Anonymous visitor, read-only
    #[default]
    Visitor,
    /// Site administrator
    Admin,
}

impl Role {
    /// Whether the role may write configuration, content, and media
    #[must_use]
    pub const fn is_privileged(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visitor => f.write_str("visitor"),
            Self::Admin => f.write_str("admin"),
        }
    }
}
