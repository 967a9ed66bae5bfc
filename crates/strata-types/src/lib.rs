//! Foundation types for the Strata data layer.
//!
//! This crate provides the value model and path types used throughout the
//! Strata system. Every other Strata crate depends on `strata-types`.
//!
//! # Key Types
//!
//! - [`Value`] — Tagged union over the seven runtime kinds the data layer
//!   stores (string, number, boolean, node, object, array, collection)
//! - [`ValueKind`] — The kind tag on its own, used for type checking
//! - [`Path`] — Validated location name in the value store (e.g. `test/items`)
//! - [`NodeValue`] — Handle to a platform render node
//! - [`generate_id`] — Random opaque identifier generation

pub mod error;
pub mod id;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use id::generate_id;
pub use path::Path;
pub use value::{NodeValue, Value, ValueKind, ValueMap};
