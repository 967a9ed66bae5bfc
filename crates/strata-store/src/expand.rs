//! Read-time relation expansion.
//!
//! A relation edge declares that a property under one path holds the
//! document id of an entry in another collection (e.g. `posts/items/author`
//! → `users`). Expansion resolves those references for a retrieved item;
//! it never enforces integrity at write time.

use std::collections::HashMap;

use strata_schema::SchemaRegistry;
use strata_types::{Path, Value};

use crate::types::RelatedItem;

/// Resolve every relation edge rooted under `name` against a retrieved
/// item.
///
/// Edges whose property is absent from the item, or holds a non-string
/// value, are skipped. A dangling reference still yields a [`RelatedItem`]
/// with `item: None` so callers can tell "missing document" from "no
/// reference".
pub fn expand_related(
    registry: &SchemaRegistry,
    values: &HashMap<Path, Value>,
    name: &Path,
    item: &Value,
) -> Vec<RelatedItem> {
    let mut related = Vec::new();
    let Some(entries) = item.as_object() else {
        return related;
    };
    for (source, target) in registry.relations_under(name) {
        let property = source.last_segment();
        let Some(Value::String(ref_id)) = entries.get(property) else {
            continue;
        };
        let resolved = values
            .get(target)
            .and_then(Value::as_collection)
            .and_then(|documents| documents.get(ref_id))
            .cloned();
        related.push(RelatedItem {
            path: target.clone(),
            id: ref_id.clone(),
            item: resolved,
        });
    }
    related
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_schema::{Property, SchemaEntry, SchemaNode};
    use strata_types::ValueMap;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    fn object(entries: &[(&str, Value)]) -> Value {
        let mut map = ValueMap::new();
        for (k, v) in entries {
            map.insert((*k).to_string(), v.clone());
        }
        Value::Object(map)
    }

    fn relation_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register(SchemaEntry::new(
            path("posts"),
            SchemaNode::collection().with_items(
                SchemaNode::object().with_property(Property::new(
                    "author",
                    SchemaNode::string().with_relation(path("users")),
                )),
            ),
        ));
        registry.register(SchemaEntry::new(path("users"), SchemaNode::collection()));
        registry
    }

    #[test]
    fn resolves_referenced_document() {
        let registry = relation_registry();
        let mut users = ValueMap::new();
        users.insert("u1".into(), object(&[("name", Value::from("ada"))]));
        let mut values = HashMap::new();
        values.insert(path("users"), Value::Collection(users));

        let item = object(&[("author", Value::from("u1"))]);
        let related = expand_related(&registry, &values, &path("posts"), &item);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].path, path("users"));
        assert_eq!(related[0].id, "u1");
        assert_eq!(
            related[0].item.as_ref().unwrap().as_object().unwrap().get("name"),
            Some(&Value::from("ada"))
        );
    }

    #[test]
    fn dangling_reference_yields_empty_item() {
        let registry = relation_registry();
        let mut values = HashMap::new();
        values.insert(path("users"), Value::Collection(ValueMap::new()));

        let item = object(&[("author", Value::from("ghost"))]);
        let related = expand_related(&registry, &values, &path("posts"), &item);
        assert_eq!(related.len(), 1);
        assert!(related[0].item.is_none());
    }

    #[test]
    fn absent_property_is_skipped() {
        let registry = relation_registry();
        let values = HashMap::new();
        let item = object(&[("title", Value::from("no author"))]);
        assert!(expand_related(&registry, &values, &path("posts"), &item).is_empty());
    }

    #[test]
    fn non_object_item_expands_to_nothing() {
        let registry = relation_registry();
        let values = HashMap::new();
        assert!(expand_related(&registry, &values, &path("posts"), &Value::from("x")).is_empty());
    }
}
