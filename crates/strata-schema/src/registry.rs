use std::collections::HashMap;

use strata_types::Path;
use tracing::debug;

use crate::node::SchemaNode;

/// One schema registration: a path, its node, and an optional relation
/// target recorded alongside the node's own declaration.
#[derive(Clone, Debug)]
pub struct SchemaEntry {
    pub id: Path,
    pub entry: SchemaNode,
    pub relation: Option<Path>,
}

impl SchemaEntry {
    pub fn new(id: Path, entry: SchemaNode) -> Self {
        Self {
            id,
            entry,
            relation: None,
        }
    }

    pub fn with_relation(mut self, target: Path) -> Self {
        self.relation = Some(target);
        self
    }
}

/// Maps store paths to their schema nodes and tracks relation edges.
///
/// Nodes are registered once and never mutated afterwards. The registry is
/// single-writer by construction; all lookups are shared borrows.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    nodes: HashMap<Path, SchemaNode>,
    /// Relation edges as `(source property path, target path)`.
    relations: Vec<(Path, Path)>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema entry.
    ///
    /// Relation edges declared on the entry, the node itself, its declared
    /// properties, and its items are recorded in the relation table.
    pub fn register(&mut self, entry: SchemaEntry) {
        if let Some(target) = entry.relation {
            self.record_relation(entry.id.clone(), target);
        }
        self.collect_relations(&entry.id, &entry.entry);
        debug!(path = %entry.id, kind = %entry.entry.kind, "schema registered");
        self.nodes.insert(entry.id, entry.entry);
    }

    fn collect_relations(&mut self, path: &Path, node: &SchemaNode) {
        if let Some(target) = &node.relation {
            self.record_relation(path.clone(), target.clone());
        }
        for property in &node.properties {
            self.collect_relations(&path.child(&property.name), &property.node);
        }
        if let Some(items) = &node.items {
            self.collect_relations(&path.child("items"), items);
        }
    }

    fn record_relation(&mut self, source: Path, target: Path) {
        if !self.relations.iter().any(|(s, t)| *s == source && *t == target) {
            self.relations.push((source, target));
        }
    }

    /// Look up the node registered at a path.
    pub fn get(&self, path: &Path) -> Option<&SchemaNode> {
        self.nodes.get(path)
    }

    /// Resolve the element schema for an array or collection at `path`.
    ///
    /// Prefers the node's inline `items`; falls back to a node registered
    /// at the named descendant path `<path>/items`.
    pub fn items_of<'a>(&'a self, path: &Path, node: &'a SchemaNode) -> Option<&'a SchemaNode> {
        node.items
            .as_deref()
            .or_else(|| self.nodes.get(&path.child("items")))
    }

    /// All relation edges whose source lies at or under `prefix`.
    pub fn relations_under(&self, prefix: &Path) -> impl Iterator<Item = &(Path, Path)> + '_ {
        let prefix = prefix.clone();
        self.relations
            .iter()
            .filter(move |(s, _)| s.starts_with(&prefix))
    }

    /// All relation edges pointing at `target`.
    pub fn relations_targeting(&self, target: &Path) -> impl Iterator<Item = &(Path, Path)> + '_ {
        let target = target.clone();
        self.relations.iter().filter(move |(_, t)| *t == target)
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
