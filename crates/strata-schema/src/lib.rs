//! Schema descriptors and type checking for the Strata data layer.
//!
//! A [`SchemaNode`] describes the shape of the value allowed at a store
//! path: its kind, declared properties, pattern properties, element schema,
//! insert/merge options, id-affix rule, and relation target. Nodes are
//! registered once in a [`SchemaRegistry`] and never mutated afterwards.
//!
//! Validation failures are structured [`SchemaError`] values carrying the
//! offending schema path and the violated keyword, so callers can surface
//! them without parsing message strings.

pub mod check;
pub mod error;
pub mod node;
pub mod registry;

pub use check::check_kind;
pub use error::{Keyword, SchemaError};
pub use node::{
    AffixRule, AffixSource, NodeOptions, PatternProperty, Property, SchemaKind, SchemaNode,
};
pub use registry::{SchemaEntry, SchemaRegistry};
