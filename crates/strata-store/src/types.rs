//! Request and result types for the store's public operations.
//!
//! Result types serialize so a persistence collaborator can snapshot `get`
//! and `set` output; `SetResult::error` stays in-process and is skipped.

use serde::Serialize;
use strata_schema::{SchemaEntry, SchemaKind};
use strata_types::{Path, Value};

use crate::error::StoreError;
use crate::listener::{EventKind, Listener};

/// Registration request for [`crate::Store::add`].
#[derive(Clone, Debug)]
pub struct AddRequest {
    /// Store path to register.
    pub id: Path,
    /// Kind of the value at the path.
    pub kind: SchemaKind,
    /// Initial value; the kind's canonical empty value when absent.
    pub default: Option<Value>,
    /// Schema nodes to register, including the path's own node.
    pub schema: Vec<SchemaEntry>,
}

impl AddRequest {
    pub fn new(id: Path, kind: SchemaKind) -> Self {
        Self {
            id,
            kind,
            default: None,
            schema: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_schema(mut self, entry: SchemaEntry) -> Self {
        self.schema.push(entry);
        self
    }
}

/// Read options for [`crate::Store::get`].
#[derive(Clone, Debug, Default)]
pub struct GetOptions {
    /// Index into the retrieved value's entries.
    pub position: Option<usize>,
    /// Resolve relation edges into [`GetResult::related`].
    pub expand: bool,
}

/// Read request for [`crate::Store::get`].
#[derive(Clone, Debug)]
pub struct GetRequest {
    pub name: Path,
    /// Collection document id to retrieve.
    pub id: Option<String>,
    /// Affix prepended to `id` for the first lookup probe.
    pub prefix_id: Option<String>,
    /// Affix appended to `id` for the first lookup probe.
    pub suffix_id: Option<String>,
    pub options: GetOptions,
}

impl GetRequest {
    pub fn new(name: Path) -> Self {
        Self {
            name,
            id: None,
            prefix_id: None,
            suffix_id: None,
            options: GetOptions::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_prefix_id(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_id = Some(prefix.into());
        self
    }

    pub fn with_suffix_id(mut self, suffix: impl Into<String>) -> Self {
        self.suffix_id = Some(suffix.into());
        self
    }

    pub fn with_options(mut self, options: GetOptions) -> Self {
        self.options = options;
        self
    }
}

/// A document resolved through a relation edge during expansion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RelatedItem {
    /// Target collection path.
    pub path: Path,
    /// Referenced document id.
    pub id: String,
    /// The referenced document, when it exists.
    pub item: Option<Value>,
}

/// Result of [`crate::Store::get`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct GetResult {
    /// No value was found.
    pub is_empty: bool,
    /// The caller-affixed lookup probe missed.
    pub is_affix_empty: bool,
    /// The document id the value was resolved under.
    pub id: Option<String>,
    /// The retrieved value (cloned; never aliases store internals).
    pub item: Option<Value>,
    /// Documents resolved through relation edges (`options.expand`).
    pub related: Vec<RelatedItem>,
}

impl GetResult {
    pub(crate) fn empty() -> Self {
        Self {
            is_empty: true,
            ..Self::default()
        }
    }
}

/// Repositioning target for option handlers.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetOptions {
    /// Entry index the write applies to.
    pub position: usize,
}

/// Source addressing for collection option handlers.
#[derive(Clone, Debug, Default)]
pub struct SourceOptions {
    /// Document id the source is assigned to or merged into.
    pub id: Option<String>,
}

/// Write options for [`crate::Store::set`].
#[derive(Clone, Debug, Default)]
pub struct SetOptions {
    /// Schema depth at which these options apply (1 when omitted).
    pub depth: Option<usize>,
    /// Merge the source into the existing value instead of replacing it.
    pub merge: bool,
    /// Append the source as a new element/document.
    pub push: bool,
    /// Prepend the source as a new element/document.
    pub unshift: bool,
    /// Explicit collection document identifier.
    pub id: Option<String>,
    /// Overrides the schema's id prefix for this write.
    pub prefix_id: Option<String>,
    /// Overrides the schema's id suffix for this write.
    pub suffix_id: Option<String>,
    /// Reposition the mutation target by entry index.
    pub target: Option<TargetOptions>,
    /// Source document addressing.
    pub source: Option<SourceOptions>,
}

impl SetOptions {
    pub fn merge() -> Self {
        Self {
            merge: true,
            ..Self::default()
        }
    }

    pub fn push() -> Self {
        Self {
            push: true,
            ..Self::default()
        }
    }

    pub fn unshift() -> Self {
        Self {
            unshift: true,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_target_position(mut self, position: usize) -> Self {
        self.target = Some(TargetOptions { position });
        self
    }

    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.source = Some(SourceOptions {
            id: Some(id.into()),
        });
        self
    }
}

/// Write request for [`crate::Store::set`].
#[derive(Clone, Debug)]
pub struct SetRequest {
    pub name: Path,
    pub source: Value,
    pub options: Option<SetOptions>,
}

impl SetRequest {
    pub fn new(name: Path, source: Value) -> Self {
        Self {
            name,
            source,
            options: None,
        }
    }

    pub fn with_options(mut self, options: SetOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Result of [`crate::Store::set`].
///
/// `set` never propagates validation errors; they land in `error` with
/// `valid: false`.
#[derive(Debug, Serialize)]
pub struct SetResult {
    pub valid: bool,
    pub name: Option<Path>,
    /// Document id produced by the write, if any.
    pub id: Option<String>,
    /// The full value now stored at the path.
    pub value: Option<Value>,
    /// The inserted/updated document or element, if the write produced one.
    pub item: Option<Value>,
    #[serde(skip)]
    pub error: Option<StoreError>,
}

impl SetResult {
    pub(crate) fn invalid(name: Path, error: StoreError) -> Self {
        Self {
            valid: false,
            name: Some(name),
            id: None,
            value: None,
            item: None,
            error: Some(error),
        }
    }
}

/// Deletion request for [`crate::Store::delete`].
#[derive(Clone, Debug)]
pub struct DeleteRequest {
    pub name: Path,
    /// Document id to remove.
    pub id: String,
}

/// Result of [`crate::Store::delete`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    /// The document is referenced through a relation edge and was kept.
    pub in_use: bool,
    /// The document existed and was removed.
    pub deleted: bool,
}

/// Listener registration for [`crate::Store::add_listener`].
pub struct ListenerRequest {
    pub name: Path,
    pub on: EventKind,
    /// Scope to a single document; path-wide when absent.
    pub id: Option<String>,
    /// Caller-supplied reference id used to deduplicate registrations.
    pub ref_id: String,
    pub listener: Box<dyn Listener>,
}
