//! Schema-validated document store for the Strata data layer.
//!
//! [`Store`] is the in-process value store shared by client and server
//! runtimes. A caller registers a schema once ([`Store::add`]), then reads
//! and writes values through [`Store::get`] and [`Store::set`]. Writes walk
//! the schema tree in lock-step with the source value, validating every
//! nested container, computing collection document ids, and applying the
//! caller's insert/merge options before the result is stored and update
//! listeners fire.
//!
//! # Design Rules
//!
//! 1. Values are owned by the store and replaced wholesale on every write;
//!    `get` hands out clones, so no caller ever aliases store internals.
//! 2. `set` is the single recovery boundary: validation failures are
//!    returned as `SetResult { valid: false, error }`, never panics.
//! 3. Listener dispatch is synchronous, in registration order, strictly
//!    after the store slot has been updated.
//! 4. The store is single-writer by construction; no interior mutability.

pub mod affix;
pub mod error;
pub mod expand;
pub mod listener;
pub mod options;
pub mod set;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use listener::{ChangeEvent, EventKind, Listener};
pub use store::Store;
pub use types::{
    AddRequest, DeleteRequest, DeleteResult, GetOptions, GetRequest, GetResult, ListenerRequest,
    RelatedItem, SetOptions, SetRequest, SetResult, SourceOptions, TargetOptions,
};
