use strata_schema::SchemaError;
use strata_types::Path;

/// Errors from store operations.
///
/// Structured validation failures pass through as [`SchemaError`]; the
/// remaining variants are the store's own lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A value violated its schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// No schema is registered for the written path.
    #[error("schema not found: {name}")]
    SchemaNotFound { name: Path },

    /// `options.position` pointed outside the retrieved value.
    #[error("get data value by index was out of range: {position} (len {len}) at {name}")]
    IndexOutOfRange {
        name: Path,
        position: usize,
        len: usize,
    },

    /// A listener was registered for a path that was never added.
    #[error("no {event} listeners registered for path: {name}")]
    ListenerPathNotRegistered { event: String, name: Path },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
