//! Update/delete listener registry.
//!
//! Listeners are registered per path, optionally scoped to a single
//! document id. Registration is deduplicated by the caller's `ref_id`, so
//! re-registering the same logical listener (e.g. on component re-render)
//! stores it once. Dispatch is synchronous and in registration order,
//! within the call stack of the triggering write.

use std::collections::{HashMap, HashSet};
use std::fmt;

use strata_types::{Path, Value};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// The event a listener subscribes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A value at the path was written.
    Update,
    /// A document at the path was removed.
    Delete,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A change delivered to listeners.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub kind: EventKind,
    pub name: Path,
    /// Document id the change applies to, if the write produced one.
    pub id: Option<String>,
    /// Path-wide listeners receive the whole stored value; id-scoped
    /// listeners receive the affected document.
    pub value: Value,
}

/// Callback invoked on matching store changes.
pub trait Listener: Send + Sync {
    fn on_event(&self, event: &ChangeEvent);
}

impl<F> Listener for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn on_event(&self, event: &ChangeEvent) {
        self(event)
    }
}

struct Entry {
    ref_key: String,
    listener: Box<dyn Listener>,
}

#[derive(Default)]
struct PathListeners {
    wide: Vec<Entry>,
    by_id: HashMap<String, Vec<Entry>>,
    refs: HashSet<String>,
}

/// Per-event listener tables, keyed by path.
#[derive(Default)]
pub struct ListenerRegistry {
    update: HashMap<Path, PathListeners>,
    delete: HashMap<Path, PathListeners>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed empty listener lists for a newly added path, for both events.
    pub fn seed(&mut self, path: &Path) {
        self.update.entry(path.clone()).or_default();
        self.delete.entry(path.clone()).or_default();
    }

    fn table_mut(&mut self, kind: EventKind) -> &mut HashMap<Path, PathListeners> {
        match kind {
            EventKind::Update => &mut self.update,
            EventKind::Delete => &mut self.delete,
        }
    }

    fn table(&self, kind: EventKind) -> &HashMap<Path, PathListeners> {
        match kind {
            EventKind::Update => &self.update,
            EventKind::Delete => &self.delete,
        }
    }

    /// Register a listener. Duplicate `id + ref_id` registrations for the
    /// same path and event are ignored.
    pub fn register(
        &mut self,
        kind: EventKind,
        path: &Path,
        id: Option<String>,
        ref_id: String,
        listener: Box<dyn Listener>,
    ) -> StoreResult<()> {
        let table = self.table_mut(kind);
        let Some(listeners) = table.get_mut(path) else {
            return Err(StoreError::ListenerPathNotRegistered {
                event: kind.to_string(),
                name: path.clone(),
            });
        };
        let ref_key = format!("{}{}", id.as_deref().unwrap_or(""), ref_id);
        if !listeners.refs.insert(ref_key.clone()) {
            debug!(path = %path, %ref_key, "duplicate listener registration ignored");
            return Ok(());
        }
        let entry = Entry { ref_key, listener };
        match id {
            Some(id) => listeners.by_id.entry(id).or_default().push(entry),
            None => listeners.wide.push(entry),
        }
        Ok(())
    }

    /// Remove a listener by its `id + ref_id`. Returns `true` if one was
    /// removed.
    pub fn remove(&mut self, kind: EventKind, path: &Path, id: Option<&str>, ref_id: &str) -> bool {
        let table = self.table_mut(kind);
        let Some(listeners) = table.get_mut(path) else {
            return false;
        };
        let ref_key = format!("{}{}", id.unwrap_or(""), ref_id);
        if !listeners.refs.remove(&ref_key) {
            return false;
        }
        match id {
            Some(id) => {
                if let Some(scoped) = listeners.by_id.get_mut(id) {
                    scoped.retain(|e| e.ref_key != ref_key);
                }
            }
            None => listeners.wide.retain(|e| e.ref_key != ref_key),
        }
        true
    }

    /// Invoke listeners for a change, path-wide first, then id-scoped.
    pub fn notify(
        &self,
        kind: EventKind,
        path: &Path,
        id: Option<&str>,
        value: &Value,
        item: Option<&Value>,
    ) {
        let Some(listeners) = self.table(kind).get(path) else {
            return;
        };
        if !listeners.wide.is_empty() {
            let event = ChangeEvent {
                kind,
                name: path.clone(),
                id: id.map(str::to_string),
                value: value.clone(),
            };
            for entry in &listeners.wide {
                entry.listener.on_event(&event);
            }
        }
        if let Some(id) = id {
            if let Some(scoped) = listeners.by_id.get(id) {
                let event = ChangeEvent {
                    kind,
                    name: path.clone(),
                    id: Some(id.to_string()),
                    value: item.cloned().unwrap_or_else(|| value.clone()),
                };
                for entry in scoped {
                    entry.listener.on_event(&event);
                }
            }
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("update_paths", &self.update.len())
            .field("delete_paths", &self.delete.len())
            .finish()
    }
}
