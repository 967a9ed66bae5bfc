//! Recursive set dispatcher.
//!
//! [`set_data`] walks the schema tree in lock-step with the source value.
//! At each node it first gives the kind's option handler a chance to apply
//! caller-requested insert/merge semantics; if the handler does not finish
//! the write, the kind-specific validator recurses into children at the
//! next depth, handing each child its previous value as the mutation
//! target. Primitives are type-checked and assigned verbatim.
//!
//! Every error propagates unguarded; `Store::set` is the recovery boundary.

use strata_schema::{check_kind, Keyword, SchemaError, SchemaKind, SchemaNode, SchemaRegistry};
use strata_types::{Path, Value, ValueMap};

use crate::affix;
use crate::error::StoreResult;
use crate::options::{self, OptionFlow};
use crate::types::SetOptions;

/// Outcome of a (possibly nested) set operation.
#[derive(Clone, Debug)]
pub struct SetOutcome {
    /// The full validated value for the node.
    pub value: Value,
    /// Document id produced by a collection insert, if any.
    pub id: Option<String>,
    /// The inserted/updated document or element, if one was produced.
    pub item: Option<Value>,
}

impl SetOutcome {
    fn plain(value: Value) -> Self {
        Self {
            value,
            id: None,
            item: None,
        }
    }
}

/// Whether option handlers run at this node.
///
/// They run when the node itself declares options, when the caller asked
/// for this exact depth, or at the root when no explicit depth was given.
fn options_apply(node: &SchemaNode, options: &SetOptions, depth: usize) -> bool {
    node.options.any() || options.depth == Some(depth) || (options.depth.is_none() && depth == 1)
}

/// Validate and apply `source` against the schema node at `path`.
///
/// `target` is the unfrozen previous value (or a fresh default); option
/// handlers mutate it in place, the generic validators rebuild from
/// `source` while threading previous child values down as targets.
pub fn set_data(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    source: Value,
    target: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<SetOutcome> {
    match node.kind {
        SchemaKind::Array => {
            let mut elements = unfreeze_array(target);
            let mut source = source;
            if options_apply(node, options, depth) {
                match options::apply_array(registry, path, node, &mut elements, source, options, depth)? {
                    OptionFlow::Done { id, item } => {
                        return Ok(SetOutcome {
                            value: Value::Array(elements),
                            id,
                            item,
                        })
                    }
                    OptionFlow::Continue(next) => source = next,
                }
            }
            set_array(registry, path, node, elements, source, options, depth + 1)
        }
        SchemaKind::Object => {
            let mut entries = unfreeze_map(target);
            let mut source = source;
            if options_apply(node, options, depth) {
                match options::apply_object(registry, path, node, &mut entries, source, options, depth)? {
                    OptionFlow::Done { id, item } => {
                        return Ok(SetOutcome {
                            value: Value::Object(entries),
                            id,
                            item,
                        })
                    }
                    OptionFlow::Continue(next) => source = next,
                }
            }
            set_object(registry, path, node, entries, source, options, depth + 1)
        }
        SchemaKind::Collection => {
            let mut documents = unfreeze_map(target);
            let mut source = source;
            if options_apply(node, options, depth) {
                match options::apply_collection(
                    registry, path, node, &mut documents, source, options, depth,
                )? {
                    OptionFlow::Done { id, item } => {
                        return Ok(SetOutcome {
                            value: Value::Collection(documents),
                            id,
                            item,
                        })
                    }
                    OptionFlow::Continue(next) => source = next,
                }
            }
            set_collection(registry, path, node, documents, source, options, depth + 1)
        }
        _ => {
            check_kind(path, &source, node.kind)?;
            Ok(SetOutcome::plain(source))
        }
    }
}

fn unfreeze_array(target: Value) -> Vec<Value> {
    match target {
        Value::Array(elements) => elements,
        _ => Vec::new(),
    }
}

fn unfreeze_map(target: Value) -> ValueMap {
    match target {
        Value::Object(map) | Value::Collection(map) => map,
        _ => ValueMap::new(),
    }
}

fn child_target(node: &SchemaNode, previous: Option<&Value>) -> Value {
    previous
        .cloned()
        .unwrap_or_else(|| Value::default_of(node.kind.value_kind()))
}

/// Validate a whole array against the element schema.
///
/// Without an element schema the array is accepted unvalidated.
fn set_array(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    previous: Vec<Value>,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<SetOutcome> {
    check_kind(path, &source, SchemaKind::Array)?;
    let elements = match source {
        Value::Array(elements) => elements,
        _ => unreachable!("kind checked above"),
    };
    let Some(items_node) = registry.items_of(path, node) else {
        return Ok(SetOutcome::plain(Value::Array(elements)));
    };
    let items_path = path.child("items");
    let mut result = Vec::with_capacity(elements.len());
    let mut id = None;
    let mut item = None;
    for (index, element) in elements.into_iter().enumerate() {
        let child = set_data(
            registry,
            &items_path,
            items_node,
            element,
            child_target(items_node, previous.get(index)),
            options,
            depth,
        )?;
        if node.options.unique_items && result.contains(&child.value) {
            return Err(SchemaError::new(
                items_path.clone(),
                Keyword::UniqueItems,
                "array items must be unique",
            )
            .into());
        }
        id = id.or(child.id);
        item = item.or(child.item);
        result.push(child.value);
    }
    Ok(SetOutcome {
        value: Value::Array(result),
        id,
        item,
    })
}

/// Validate a whole object: declared properties in declaration order, then
/// pattern properties for undeclared keys. Keys on the node's
/// additional-property allow-list carry no schema and pass through verbatim.
fn set_object(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    previous: ValueMap,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<SetOutcome> {
    check_kind(path, &source, SchemaKind::Object)?;
    let source_map = match source {
        Value::Object(map) => map,
        _ => unreachable!("kind checked above"),
    };

    let mut result = ValueMap::new();
    let mut id = None;
    let mut item = None;
    for property in &node.properties {
        let property_path = path.child(&property.name);
        match source_map.get(&property.name) {
            Some(value) => {
                let child = set_data(
                    registry,
                    &property_path,
                    &property.node,
                    value.clone(),
                    child_target(&property.node, previous.get(&property.name)),
                    options,
                    depth,
                )?;
                id = id.or(child.id);
                item = item.or(child.item);
                result.insert(property.name.clone(), child.value);
            }
            None => {
                if let Some(default) = &property.default {
                    result.insert(property.name.clone(), default.clone());
                } else if property.required {
                    return Err(SchemaError::new(
                        property_path,
                        Keyword::Required,
                        format!("required property missing: {}", property.name),
                    )
                    .into());
                }
            }
        }
    }

    for (key, value) in &source_map {
        if node.property(key).is_some() {
            continue;
        }
        if let Some(pattern) = node.matching_pattern(key) {
            let child = set_data(
                registry,
                &path.child(key),
                &pattern.node,
                value.clone(),
                child_target(&pattern.node, previous.get(key)),
                options,
                depth,
            )?;
            result.insert(key.clone(), child.value);
        } else if node
            .options
            .additional_properties
            .as_ref()
            .is_some_and(|allowed| allowed.iter().any(|k| k == key))
        {
            result.insert(key.clone(), value.clone());
        } else {
            return Err(SchemaError::new(
                path.child(key),
                Keyword::PatternProperty,
                format!("property \"{key}\" matches no declared property or pattern"),
            )
            .into());
        }
    }
    Ok(SetOutcome {
        value: Value::Object(result),
        id,
        item,
    })
}

/// First-insert path for collections: compute a fresh affixed document id
/// and validate the source against the items schema.
fn set_collection(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    mut documents: ValueMap,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<SetOutcome> {
    let id = affix::fresh_id(node.id.as_ref(), &documents);
    let document = match registry.items_of(path, node) {
        Some(items_node) => {
            set_data(
                registry,
                &path.child("items"),
                items_node,
                source,
                Value::default_of(items_node.kind.value_kind()),
                options,
                depth,
            )?
            .value
        }
        None => source,
    };
    documents.insert(id.clone(), document.clone());
    Ok(SetOutcome {
        value: Value::Collection(documents),
        id: Some(id),
        item: Some(document),
    })
}
