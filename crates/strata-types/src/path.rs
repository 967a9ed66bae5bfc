//! Store path validation.
//!
//! A path names a location in the value store, e.g. `test` or `test/items`.
//! Valid paths:
//! - Must be non-empty
//! - Must not contain whitespace
//! - Must not start or end with `/`
//! - Must not contain consecutive slashes (`//`)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters that are forbidden anywhere in a path.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r'];

/// A validated location name in the value store.
///
/// Segments are separated by `/`. Child schema nodes are addressed by
/// appending a segment, e.g. `test/items` for the element schema of the
/// array registered at `test`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(String);

impl Path {
    /// Parse and validate a path.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        validate(&raw)?;
        Ok(Self(raw))
    }

    /// The full path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a segment, producing a child path.
    pub fn child(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }

    /// The first segment (the registered root name).
    pub fn first_segment(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// The path consisting of only the first segment.
    pub fn root(&self) -> Path {
        Self(self.first_segment().to_string())
    }

    /// The last segment (the innermost name).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Whether this path is `prefix` itself or a descendant of it.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0 == prefix.0 || self.0.starts_with(&format!("{}/", prefix.0))
    }
}

fn validate(raw: &str) -> Result<(), TypeError> {
    if raw.is_empty() {
        return Err(TypeError::InvalidPath {
            path: raw.to_string(),
            reason: "path must not be empty".into(),
        });
    }
    for ch in FORBIDDEN_CHARS {
        if raw.contains(*ch) {
            return Err(TypeError::InvalidPath {
                path: raw.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }
    if raw.starts_with('/') || raw.ends_with('/') {
        return Err(TypeError::InvalidPath {
            path: raw.to_string(),
            reason: "must not start or end with '/'".into(),
        });
    }
    if raw.contains("//") {
        return Err(TypeError::InvalidPath {
            path: raw.to_string(),
            reason: "must not contain consecutive slashes".into(),
        });
    }
    Ok(())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}
