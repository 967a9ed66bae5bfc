//! Per-kind option handlers.
//!
//! These implement the caller-requested insert/merge/reposition semantics
//! of a write: push/unshift, positional targets, uniqueness and
//! additional-property enforcement, and collection document addressing.
//! A handler either finishes the write itself ([`OptionFlow::Done`]) or
//! hands a possibly transformed source back to the generic validator
//! ([`OptionFlow::Continue`]).

use strata_schema::{check_kind, Keyword, SchemaError, SchemaKind, SchemaNode, SchemaRegistry};
use strata_types::{Path, Value, ValueMap};

use crate::affix;
use crate::error::StoreResult;
use crate::set::set_data;
use crate::types::SetOptions;

/// Control flow returned by an option handler.
#[derive(Debug)]
pub enum OptionFlow {
    /// Not fully handled; continue with the (possibly transformed) source.
    Continue(Value),
    /// The write is complete; skip the generic recursion at this node.
    Done {
        id: Option<String>,
        item: Option<Value>,
    },
}

/// Validate a single element/document against the items schema, if any.
fn validate_item(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    source: Value,
    depth: usize,
) -> StoreResult<Value> {
    match registry.items_of(path, node) {
        Some(items_node) => Ok(set_data(
            registry,
            &path.child("items"),
            items_node,
            source,
            Value::default_of(items_node.kind.value_kind()),
            &SetOptions::default(),
            depth + 1,
        )?
        .value),
        None => Ok(source),
    }
}

/// Array option handler: positional replace, push, unshift, uniqueness.
pub fn apply_array(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    target: &mut Vec<Value>,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<OptionFlow> {
    if !(options.push || options.unshift || options.target.is_some()) {
        return Ok(OptionFlow::Continue(source));
    }

    let element = validate_item(registry, path, node, source, depth)?;
    if node.options.unique_items && target.contains(&element) {
        return Err(SchemaError::new(
            path.child("items"),
            Keyword::UniqueItems,
            "array items must be unique",
        )
        .into());
    }

    if let Some(reposition) = options.target {
        if reposition.position >= target.len() {
            return Err(SchemaError::new(
                path.clone(),
                Keyword::TargetPosition,
                format!("target position {} is out of range", reposition.position),
            )
            .into());
        }
        target[reposition.position] = element.clone();
    } else if options.unshift {
        target.insert(0, element.clone());
    } else {
        target.push(element.clone());
    }
    Ok(OptionFlow::Done {
        id: None,
        item: Some(element),
    })
}

/// Object option handler: additional-property enforcement, positional
/// property writes, merge.
pub fn apply_object(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    target: &mut ValueMap,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<OptionFlow> {
    // Allow-list check first: it applies to every shaped write at this
    // node, including merges. patternProperties reduce the restriction.
    if let (Some(allowed), Value::Object(map)) = (&node.options.additional_properties, &source) {
        for key in map.keys() {
            if node.property(key).is_none()
                && !allowed.iter().any(|k| k == key)
                && node.matching_pattern(key).is_none()
            {
                return Err(SchemaError::new(
                    path.child(key),
                    Keyword::AdditionalProperties,
                    format!("property \"{key}\" is not permitted"),
                )
                .into());
            }
        }
    }

    if let Some(reposition) = options.target {
        let position = reposition.position;
        let Some(key) = target.get_index(position).map(|(k, _)| k.clone()) else {
            return Err(SchemaError::new(
                path.clone(),
                Keyword::TargetPosition,
                format!("target position {position} is out of range"),
            )
            .into());
        };
        let value = match node.property(&key) {
            Some(property) => {
                set_data(
                    registry,
                    &path.child(&key),
                    &property.node,
                    source,
                    Value::default_of(property.node.kind.value_kind()),
                    &SetOptions::default(),
                    depth + 1,
                )?
                .value
            }
            None => source,
        };
        target[position] = value.clone();
        return Ok(OptionFlow::Done {
            id: None,
            item: Some(value),
        });
    }

    if options.merge {
        check_kind(path, &source, SchemaKind::Object)?;
        let incoming = match source {
            Value::Object(map) => map,
            _ => unreachable!("kind checked above"),
        };
        let mut merged = target.clone();
        for (key, value) in incoming {
            merged.insert(key, value);
        }
        // The generic object walk validates the merged whole.
        return Ok(OptionFlow::Continue(Value::Object(merged)));
    }

    Ok(OptionFlow::Continue(source))
}

/// Collection option handler: explicit-id insert or merge, named merge,
/// push/unshift with generated ids, direct source-id assignment.
pub fn apply_collection(
    registry: &SchemaRegistry,
    path: &Path,
    node: &SchemaNode,
    target: &mut ValueMap,
    source: Value,
    options: &SetOptions,
    depth: usize,
) -> StoreResult<OptionFlow> {
    if let Some(explicit) = &options.id {
        let full = affix::affixed_id(
            explicit,
            options.prefix_id.as_deref(),
            options.suffix_id.as_deref(),
            node.id.as_ref(),
        );
        if options.source.is_none() {
            // Brand-new document under the caller's id.
            let document = validate_item(registry, path, node, source, depth)?;
            target.insert(full.clone(), document.clone());
            return Ok(OptionFlow::Done {
                id: Some(full),
                item: Some(document),
            });
        }
        // Reposition to the addressed document and merge the source in.
        let Some(existing) = target.get(&full).cloned() else {
            return Err(SchemaError::new(
                path.clone(),
                Keyword::TargetPosition,
                format!("no document \"{full}\" to merge into"),
            )
            .into());
        };
        let document = validate_item(registry, path, node, merge_values(existing, source), depth)?;
        target.insert(full.clone(), document.clone());
        return Ok(OptionFlow::Done {
            id: Some(full),
            item: Some(document),
        });
    }

    if options.merge {
        let Some(named) = options.source.as_ref().and_then(|s| s.id.clone()) else {
            return Err(SchemaError::new(
                path.clone(),
                Keyword::TargetPosition,
                "merge requires a source document id",
            )
            .into());
        };
        let full = affix::affixed_id(
            &named,
            options.prefix_id.as_deref(),
            options.suffix_id.as_deref(),
            node.id.as_ref(),
        );
        let Some(existing) = target.get(&full).cloned() else {
            return Err(SchemaError::new(
                path.clone(),
                Keyword::TargetPosition,
                format!("no document \"{full}\" to merge into"),
            )
            .into());
        };
        let document = validate_item(registry, path, node, merge_values(existing, source), depth)?;
        target.insert(full.clone(), document.clone());
        return Ok(OptionFlow::Done {
            id: Some(full),
            item: Some(document),
        });
    }

    if options.push || options.unshift {
        let document = validate_item(registry, path, node, source, depth)?;
        let id = affix::fresh_id(node.id.as_ref(), target);
        if options.unshift {
            target.shift_insert(0, id.clone(), document.clone());
        } else {
            target.insert(id.clone(), document.clone());
        }
        return Ok(OptionFlow::Done {
            id: Some(id),
            item: Some(document),
        });
    }

    if let Some(named) = options.source.as_ref().and_then(|s| s.id.clone()) {
        // Direct assignment under the source-supplied id.
        let document = validate_item(registry, path, node, source, depth)?;
        target.insert(named.clone(), document.clone());
        return Ok(OptionFlow::Done {
            id: Some(named),
            item: Some(document),
        });
    }

    Ok(OptionFlow::Continue(source))
}

/// Recursive property merge: object keys from `incoming` override or merge
/// into `existing`; any other kind is replaced by `incoming`.
fn merge_values(existing: Value, incoming: Value) -> Value {
    match (existing, incoming) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.shift_remove(&key) {
                    Some(previous) => merge_values(previous, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}
