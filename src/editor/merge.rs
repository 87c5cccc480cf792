// ABOUTME: Path-scoped structural merge into the nested configuration document
// ABOUTME: Parses dotted paths with array element selectors and merges without touching siblings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Config paths look like `pagesContent.conocenos.hero.title` or
//! `pagesContent.conocenos.team[id=ana].name`. A selector `[value]` is short
//! for `[id=value]`. Array elements are located by that field, never by
//! position, so reordering a list does not redirect an edit.

use crate::client::ClientError;
use crate::errors::AppError;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field used by `[value]` selectors
pub const DEFAULT_SELECTOR_FIELD: &str = "id";

/// Failure to parse or resolve a config path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    /// The path has no segments
    #[error("config path is empty")]
    Empty,
    /// The path text is malformed
    #[error("malformed config path '{path}': {reason}")]
    Syntax {
        /// Offending path
        path: String,
        /// What is wrong
        reason: String,
    },
    /// A key segment hit a non-object value
    #[error("'{at}' is not an object")]
    NotAnObject {
        /// Path prefix that was reached
        at: String,
    },
    /// A selector hit a non-array value
    #[error("'{at}' is not an array")]
    NotAnArray {
        /// Path prefix that was reached
        at: String,
    },
    /// No array element carries the selected identifier
    #[error("no element of '{at}' has {field} = {value}")]
    ElementNotFound {
        /// Path prefix of the array
        at: String,
        /// Selector field
        field: String,
        /// Selector value
        value: String,
    },
}

impl From<MergeError> for AppError {
    fn from(error: MergeError) -> Self {
        Self::invalid_input(error.to_string())
    }
}

impl From<MergeError> for ClientError {
    fn from(error: MergeError) -> Self {
        Self::InvalidPath(error.to_string())
    }
}

/// One step of a [`ConfigPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object member
    Key(String),
    /// Array element whose `field` equals `value`
    Select {
        /// Identifier field
        field: String,
        /// Identifier value, compared as text
        value: String,
    },
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Select { field, value } => write!(f, "[{field}={value}]"),
        }
    }
}

/// Parsed path into the configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    segments: Vec<PathSegment>,
}

impl ConfigPath {
    /// Parse a dotted path with optional `[field=value]` selectors
    ///
    /// # Errors
    ///
    /// Returns [`MergeError`] for empty paths, empty keys, or unbalanced brackets
    pub fn parse(path: &str) -> Result<Self, MergeError> {
        let syntax = |reason: &str| MergeError::Syntax {
            path: path.to_owned(),
            reason: reason.to_owned(),
        };
        if path.trim().is_empty() {
            return Err(MergeError::Empty);
        }

        let mut segments = Vec::new();
        for part in split_outside_brackets(path) {
            let (key, mut rest) = part.find('[').map_or((part, ""), |i| part.split_at(i));
            if key.contains(']') {
                return Err(syntax("unexpected ']'"));
            }
            if key.is_empty() && rest.is_empty() {
                return Err(syntax("empty segment"));
            }
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_owned()));
            } else if segments.is_empty() {
                return Err(syntax("path cannot start with a selector"));
            }

            while !rest.is_empty() {
                let inner_end = rest.find(']').ok_or_else(|| syntax("unclosed '['"))?;
                let inner = &rest[1..inner_end];
                if inner.is_empty() || inner.contains('[') {
                    return Err(syntax("empty or nested selector"));
                }
                let (field, value) = inner
                    .split_once('=')
                    .unwrap_or((DEFAULT_SELECTOR_FIELD, inner));
                if field.is_empty() || value.is_empty() {
                    return Err(syntax("selector needs a field and a value"));
                }
                segments.push(PathSegment::Select {
                    field: field.to_owned(),
                    value: value.to_owned(),
                });
                rest = &rest[inner_end + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(syntax("text after selector"));
                }
            }
        }
        Ok(Self { segments })
    }

    /// Path from explicit segments
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Empty`] when `segments` is empty
    pub fn from_segments(segments: Vec<PathSegment>) -> Result<Self, MergeError> {
        if segments.is_empty() {
            return Err(MergeError::Empty);
        }
        Ok(Self { segments })
    }

    /// Path segments in order
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Extend with an object key
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    fn prefix(&self, len: usize) -> String {
        Self {
            segments: self.segments[..len].to_vec(),
        }
        .to_string()
    }
}

/// Split on the dots that are not inside a `[...]` selector
fn split_outside_brackets(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&path[start..]);
    parts
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ConfigPath {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn matches_selector(element: &Value, field: &str, value: &str) -> bool {
    match element.get(field) {
        Some(Value::String(s)) => s == value,
        Some(Value::Number(n)) => n.to_string() == value,
        Some(Value::Bool(b)) => b.to_string() == value,
        _ => false,
    }
}

/// Merge `patch` into `target`: objects merge member-wise, everything else replaces
pub fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, patch_value),
                    None => {
                        target_map.insert(key, patch_value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Return a copy of `document` with `value` merged at `path`
///
/// Missing objects along the path are created. Object values merge
/// member-wise into the target; a path ending in a selector replaces that
/// array element. Elements are edited in place, so order is preserved.
/// Nothing outside the path changes.
///
/// # Errors
///
/// Returns [`MergeError`] when the path crosses a value of the wrong shape or
/// selects an element that does not exist
pub fn merge_at_path(document: &Value, path: &ConfigPath, value: Value) -> Result<Value, MergeError> {
    let mut merged = document.clone();
    let mut cursor = &mut merged;

    for (depth, segment) in path.segments.iter().enumerate() {
        cursor = match segment {
            PathSegment::Key(key) => {
                if cursor.is_null() {
                    *cursor = Value::Object(Map::new());
                }
                let map = cursor.as_object_mut().ok_or_else(|| MergeError::NotAnObject {
                    at: path.prefix(depth),
                })?;
                map.entry(key.clone()).or_insert(Value::Null)
            }
            PathSegment::Select { field, value: wanted } => {
                let at = path.prefix(depth);
                let items = cursor
                    .as_array_mut()
                    .ok_or_else(|| MergeError::NotAnArray { at: at.clone() })?;
                items
                    .iter_mut()
                    .find(|item| matches_selector(item, field, wanted))
                    .ok_or_else(|| MergeError::ElementNotFound {
                        at,
                        field: field.clone(),
                        value: wanted.clone(),
                    })?
            }
        };
    }

    match path.segments.last() {
        Some(PathSegment::Select { field, .. }) => replace_element(cursor, field, value),
        _ => deep_merge(cursor, value),
    }
    Ok(merged)
}

/// Replace a selected array element, keeping its identifier when the new value omits it
fn replace_element(element: &mut Value, field: &str, mut value: Value) {
    if let (Some(id), Some(map)) = (element.get(field).cloned(), value.as_object_mut()) {
        map.entry(field.to_owned()).or_insert(id);
    }
    *element = value;
}

/// Value at `path`, if every step resolves
#[must_use]
pub fn value_at<'a>(document: &'a Value, path: &ConfigPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(document, |cursor, segment| match segment {
            PathSegment::Key(key) => cursor.get(key),
            PathSegment::Select { field, value } => cursor
                .as_array()?
                .iter()
                .find(|item| matches_selector(item, field, value)),
        })
}
