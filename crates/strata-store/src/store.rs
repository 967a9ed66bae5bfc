//! The store facade: schema registration, reads, writes, deletes, and
//! listener management.

use std::collections::HashMap;
use std::fmt;

use strata_schema::SchemaRegistry;
use strata_types::{generate_id, Path, Value};
use tracing::debug;

use crate::affix;
use crate::error::{StoreError, StoreResult};
use crate::expand;
use crate::listener::{EventKind, ListenerRegistry};
use crate::set::set_data;
use crate::types::{
    AddRequest, DeleteRequest, DeleteResult, GetRequest, GetResult, ListenerRequest, SetRequest,
    SetResult,
};

/// Schema-validated, hierarchically-typed document store.
///
/// The store owns two maps — schema nodes and current values — plus the
/// listener registry. Values are replaced wholesale on every successful
/// write and handed out as clones, so a caller can never observe or
/// corrupt a value mid-mutation.
#[derive(Default)]
pub struct Store {
    schemas: SchemaRegistry,
    values: HashMap<Path, Value>,
    listeners: ListenerRegistry,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a path: seed its value and listener lists, and register
    /// its schema nodes.
    pub fn add(&mut self, request: AddRequest) {
        let AddRequest {
            id,
            kind,
            default,
            schema,
        } = request;
        let value = default.unwrap_or_else(|| Value::default_of(kind.value_kind()));
        debug!(path = %id, kind = %kind, "path added");
        self.values.insert(id.clone(), value);
        self.listeners.seed(&id);
        for entry in schema {
            self.schemas.register(entry);
        }
    }

    /// Retrieve a value.
    ///
    /// Absent values are reported through `is_empty`, never as errors; the
    /// only error is an out-of-range `options.position`.
    pub fn get(&self, request: GetRequest) -> StoreResult<GetResult> {
        let GetRequest {
            name,
            id,
            prefix_id,
            suffix_id,
            options,
        } = request;
        let Some(stored) = self.values.get(&name) else {
            return Ok(GetResult::empty());
        };

        let mut is_affix_empty = false;
        let (resolved_id, mut item) = match id {
            Some(id) => {
                let Some(documents) = stored.as_collection() else {
                    return Ok(GetResult::empty());
                };
                let mut found: Option<(String, Value)> = None;
                if prefix_id.is_some() || suffix_id.is_some() {
                    let candidate = format!(
                        "{}{}{}",
                        prefix_id.as_deref().unwrap_or(""),
                        id,
                        suffix_id.as_deref().unwrap_or("")
                    );
                    match documents.get(&candidate) {
                        Some(value) => found = Some((candidate, value.clone())),
                        None => is_affix_empty = true,
                    }
                }
                if found.is_none() {
                    if let Some(value) = documents.get(&id) {
                        found = Some((id.clone(), value.clone()));
                    }
                }
                if found.is_none() {
                    if let Some(rule) = self.schemas.get(&name).and_then(|n| n.id.as_ref()) {
                        let candidate = affix::affixed_id(&id, None, None, Some(rule));
                        if let Some(value) = documents.get(&candidate) {
                            found = Some((candidate, value.clone()));
                        }
                    }
                }
                match found {
                    Some((resolved, value)) => (Some(resolved), value),
                    None => {
                        return Ok(GetResult {
                            is_empty: true,
                            is_affix_empty,
                            ..GetResult::default()
                        })
                    }
                }
            }
            None => (None, stored.clone()),
        };

        if let Some(position) = options.position {
            item = index_into(&name, &item, position)?;
        }

        let related = if options.expand {
            expand::expand_related(&self.schemas, &self.values, &name, &item)
        } else {
            Vec::new()
        };

        Ok(GetResult {
            is_empty: false,
            is_affix_empty,
            id: resolved_id,
            item: Some(item),
            related,
        })
    }

    /// Write a value.
    ///
    /// This is the single recovery boundary: every validation error raised
    /// anywhere in the recursive walk is caught here and returned as
    /// `SetResult { valid: false, error }`. On success the new value is
    /// stored before update listeners fire, synchronously, in
    /// registration order.
    pub fn set(&mut self, request: SetRequest) -> SetResult {
        let name = request.name.clone();
        match self.apply_set(request) {
            Ok(result) => result,
            Err(error) => {
                debug!(path = %name, %error, "set rejected");
                SetResult::invalid(name, error)
            }
        }
    }

    fn apply_set(&mut self, request: SetRequest) -> StoreResult<SetResult> {
        let SetRequest {
            name,
            source,
            options,
        } = request;
        let options = options.unwrap_or_default();
        let node = self
            .schemas
            .get(&name)
            .ok_or_else(|| StoreError::SchemaNotFound { name: name.clone() })?;

        // Unfreeze: clone the previous value (or seed a fresh default).
        let target = self
            .values
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Value::default_of(node.kind.value_kind()));

        let outcome = set_data(&self.schemas, &name, node, source, target, &options, 1)?;

        debug!(path = %name, id = outcome.id.as_deref().unwrap_or(""), "value set");
        self.values.insert(name.clone(), outcome.value.clone());
        self.listeners.notify(
            EventKind::Update,
            &name,
            outcome.id.as_deref(),
            &outcome.value,
            outcome.item.as_ref(),
        );

        Ok(SetResult {
            valid: true,
            name: Some(name),
            id: outcome.id,
            value: Some(outcome.value),
            item: outcome.item,
            error: None,
        })
    }

    /// Remove a collection document.
    ///
    /// The document is kept when any relation edge targeting this path
    /// still references its id; the result reports that through `in_use`.
    /// Delete listeners fire only on actual removal.
    pub fn delete(&mut self, request: DeleteRequest) -> StoreResult<DeleteResult> {
        let DeleteRequest { name, id } = request;

        for (source, _) in self.schemas.relations_targeting(&name) {
            let owner = source.root();
            let property = source.last_segment();
            let Some(documents) = self.values.get(&owner).and_then(Value::as_collection) else {
                continue;
            };
            let referenced = documents.values().any(|document| {
                document
                    .as_object()
                    .and_then(|entries| entries.get(property))
                    .and_then(Value::as_str)
                    == Some(id.as_str())
            });
            if referenced {
                debug!(path = %name, %id, referrer = %owner, "delete refused, document in use");
                return Ok(DeleteResult {
                    in_use: true,
                    deleted: false,
                });
            }
        }

        let removed = self
            .values
            .get_mut(&name)
            .and_then(Value::as_collection_mut)
            .and_then(|documents| documents.shift_remove(&id));
        let deleted = removed.is_some();
        if deleted {
            debug!(path = %name, %id, "document deleted");
            let value = self.values.get(&name).cloned().unwrap_or_else(|| {
                Value::default_of(strata_types::ValueKind::Collection)
            });
            self.listeners
                .notify(EventKind::Delete, &name, Some(&id), &value, removed.as_ref());
        }
        Ok(DeleteResult {
            in_use: false,
            deleted,
        })
    }

    /// Register an update/delete listener.
    ///
    /// Fails when the path was never added. Registrations sharing
    /// `id + ref_id` are stored once.
    pub fn add_listener(&mut self, request: ListenerRequest) -> StoreResult<()> {
        let ListenerRequest {
            name,
            on,
            id,
            ref_id,
            listener,
        } = request;
        self.listeners.register(on, &name, id, ref_id, listener)
    }

    /// Remove a listener by its `id + ref_id`. Returns `true` if one was
    /// removed.
    pub fn remove_listener(
        &mut self,
        on: EventKind,
        name: &Path,
        id: Option<&str>,
        ref_id: &str,
    ) -> bool {
        self.listeners.remove(on, name, id, ref_id)
    }

    /// Generate an opaque unique identifier.
    pub fn generate_id(&self) -> String {
        generate_id()
    }

    /// Number of registered value paths.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no path is registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted list of all registered value paths.
    pub fn paths(&self) -> Vec<Path> {
        let mut paths: Vec<Path> = self.values.keys().cloned().collect();
        paths.sort();
        paths
    }
}

fn index_into(name: &Path, value: &Value, position: usize) -> StoreResult<Value> {
    let (len, picked) = match value {
        Value::Array(elements) => (elements.len(), elements.get(position).cloned()),
        Value::Object(entries) | Value::Collection(entries) => (
            entries.len(),
            entries.get_index(position).map(|(_, v)| v.clone()),
        ),
        _ => (0, None),
    };
    picked.ok_or(StoreError::IndexOutOfRange {
        name: name.clone(),
        position,
        len,
    })
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path_count", &self.values.len())
            .field("schema_count", &self.schemas.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use strata_schema::{
        AffixRule, AffixSource, Keyword, NodeOptions, Property, SchemaEntry, SchemaKind, SchemaNode,
    };
    use strata_types::ValueMap;

    use crate::listener::ChangeEvent;
    use crate::types::{GetOptions, SetOptions};

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

    fn page_item() -> SchemaNode {
        SchemaNode::object()
            .with_property(Property::new("title", SchemaNode::string()).required())
            .with_property(
                Property::new("visible", SchemaNode::boolean()).with_default(Value::from(true)),
            )
    }

    /// Store with a `pages` collection (`p_` prefixed ids) and a `users`
    /// collection referenced from `pages/items/author`.
    fn seeded_store() -> Store {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("pages"), SchemaKind::Collection).with_schema(SchemaEntry::new(
                path("pages"),
                SchemaNode::collection()
                    .with_id_rule(AffixRule::new().with_prefix(AffixSource::value("p_")))
                    .with_items(page_item().with_property(Property::new(
                        "author",
                        SchemaNode::string().with_relation(path("users")),
                    ))),
            )),
        );
        store.add(
            AddRequest::new(path("users"), SchemaKind::Collection).with_schema(SchemaEntry::new(
                path("users"),
                SchemaNode::collection(),
            )),
        );
        store
    }

    // -----------------------------------------------------------------------
    // add / get basics
    // -----------------------------------------------------------------------

    #[test]
    fn add_seeds_default_value() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("flag"), SchemaKind::Boolean)
                .with_schema(SchemaEntry::new(path("flag"), SchemaNode::boolean())),
        );

        let result = store.get(GetRequest::new(path("flag"))).unwrap();
        assert!(!result.is_empty);
        assert_eq!(result.item, Some(Value::from(false)));
    }

    #[test]
    fn add_with_explicit_default() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("greeting"), SchemaKind::String)
                .with_default(Value::from("hello"))
                .with_schema(SchemaEntry::new(path("greeting"), SchemaNode::string())),
        );
        let result = store.get(GetRequest::new(path("greeting"))).unwrap();
        assert_eq!(result.item, Some(Value::from("hello")));
    }

    #[test]
    fn get_unregistered_path_is_empty() {
        let store = Store::new();
        let result = store.get(GetRequest::new(path("nope"))).unwrap();
        assert!(result.is_empty);
        assert!(result.item.is_none());
    }

    // -----------------------------------------------------------------------
    // Round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get_by_id_round_trips() {
        let mut store = seeded_store();
        let source = object(&[
            ("title", Value::from("home")),
            ("visible", Value::from(false)),
            ("author", Value::from("u1")),
        ]);

        let result = store.set(SetRequest::new(path("pages"), source.clone()));
        assert!(result.valid);
        let id = result.id.unwrap();

        let got = store
            .get(GetRequest::new(path("pages")).with_id(&id))
            .unwrap();
        assert!(!got.is_empty);
        assert_eq!(got.id.as_deref(), Some(id.as_str()));
        assert_eq!(got.item, Some(source));
    }

    // -----------------------------------------------------------------------
    // Immutability of returned containers
    // -----------------------------------------------------------------------

    #[test]
    fn mutating_a_get_result_does_not_affect_the_store() {
        let mut store = seeded_store();
        let result = store.set(SetRequest::new(
            path("pages"),
            object(&[("title", Value::from("home")), ("author", Value::from("u1"))]),
        ));
        let id = result.id.unwrap();

        let mut first = store
            .get(GetRequest::new(path("pages")).with_id(&id))
            .unwrap()
            .item
            .unwrap();
        if let Value::Object(entries) = &mut first {
            entries.insert("title".into(), Value::from("tampered"));
        }

        let second = store
            .get(GetRequest::new(path("pages")).with_id(&id))
            .unwrap()
            .item
            .unwrap();
        assert_eq!(
            second.as_object().unwrap().get("title"),
            Some(&Value::from("home"))
        );
    }

    // -----------------------------------------------------------------------
    // Validation failures surface through SetResult
    // -----------------------------------------------------------------------

    #[test]
    fn set_without_schema_reports_schema_not_found() {
        let mut store = Store::new();
        let result = store.set(SetRequest::new(path("ghost"), Value::from(1.0)));
        assert!(!result.valid);
        assert!(matches!(
            result.error,
            Some(StoreError::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn type_mismatch_reports_expected_and_actual() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("count"), SchemaKind::Number)
                .with_schema(SchemaEntry::new(path("count"), SchemaNode::number())),
        );
        let result = store.set(SetRequest::new(path("count"), Value::from("x")));
        assert!(!result.valid);
        match result.error {
            Some(StoreError::Schema(schema)) => {
                assert_eq!(schema.keyword, Keyword::Type);
                assert!(schema.message.contains("expected \"number\" but got \"string\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn required_property_missing_is_invalid() {
        let mut store = seeded_store();
        let result = store.set(SetRequest::new(path("pages"), object(&[])));
        assert!(!result.valid);
        match result.error {
            Some(StoreError::Schema(schema)) => {
                assert_eq!(schema.keyword, Keyword::Required);
                assert!(schema.message.contains("required property missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn additional_properties_violation_is_invalid() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("config"), SchemaKind::Object).with_schema(SchemaEntry::new(
                path("config"),
                SchemaNode::object()
                    .with_property(Property::new("theme", SchemaNode::string()))
                    .with_options(NodeOptions {
                        additional_properties: Some(vec![]),
                        ..Default::default()
                    }),
            )),
        );
        let result = store.set(SetRequest::new(
            path("config"),
            object(&[("rogue", Value::from("x"))]),
        ));
        assert!(!result.valid);
        match result.error {
            Some(StoreError::Schema(schema)) => {
                assert_eq!(schema.keyword, Keyword::AdditionalProperties)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn allow_listed_additional_property_is_accepted() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("config"), SchemaKind::Object).with_schema(SchemaEntry::new(
                path("config"),
                SchemaNode::object()
                    .with_property(Property::new("theme", SchemaNode::string()))
                    .with_options(NodeOptions {
                        additional_properties: Some(vec!["extra".into()]),
                        ..Default::default()
                    }),
            )),
        );
        let result = store.set(SetRequest::new(
            path("config"),
            object(&[("theme", Value::from("dark")), ("extra", Value::from("x"))]),
        ));
        assert!(result.valid);
        let map = result.value.unwrap();
        let map = map.as_object().unwrap();
        assert_eq!(map.get("theme"), Some(&Value::from("dark")));
        assert_eq!(map.get("extra"), Some(&Value::from("x")));
    }

    #[test]
    fn unique_items_violation_is_invalid() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("tags"), SchemaKind::Array).with_schema(SchemaEntry::new(
                path("tags"),
                SchemaNode::array()
                    .with_items(SchemaNode::string())
                    .with_options(NodeOptions {
                        unique_items: true,
                        ..Default::default()
                    }),
            )),
        );
        assert!(
            store
                .set(
                    SetRequest::new(path("tags"), Value::from("a"))
                        .with_options(SetOptions::push())
                )
                .valid
        );
        let result = store.set(
            SetRequest::new(path("tags"), Value::from("a")).with_options(SetOptions::push()),
        );
        assert!(!result.valid);
        match result.error {
            Some(StoreError::Schema(schema)) => {
                assert_eq!(schema.keyword, Keyword::UniqueItems)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn failed_set_leaves_previous_value_intact() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("count"), SchemaKind::Number)
                .with_schema(SchemaEntry::new(path("count"), SchemaNode::number())),
        );
        assert!(store.set(SetRequest::new(path("count"), Value::from(7.0))).valid);
        assert!(!store.set(SetRequest::new(path("count"), Value::from("x"))).valid);

        let result = store.get(GetRequest::new(path("count"))).unwrap();
        assert_eq!(result.item, Some(Value::from(7.0)));
    }

    // -----------------------------------------------------------------------
    // Merge semantics
    // -----------------------------------------------------------------------

    #[test]
    fn object_merge_accumulates_properties() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("state"), SchemaKind::Object).with_schema(SchemaEntry::new(
                path("state"),
                SchemaNode::object()
                    .with_property(Property::new("a", SchemaNode::number()))
                    .with_property(Property::new("b", SchemaNode::number())),
            )),
        );
        assert!(
            store
                .set(SetRequest::new(
                    path("state"),
                    object(&[("a", Value::from(1.0))])
                ))
                .valid
        );
        let result = store.set(
            SetRequest::new(path("state"), object(&[("b", Value::from(2.0))]))
                .with_options(SetOptions::merge()),
        );
        assert!(result.valid);
        let map = result.value.unwrap();
        let map = map.as_object().unwrap();
        assert_eq!(map.get("a"), Some(&Value::from(1.0)));
        assert_eq!(map.get("b"), Some(&Value::from(2.0)));
    }

    // -----------------------------------------------------------------------
    // Collection ids and affixes
    // -----------------------------------------------------------------------

    #[test]
    fn generated_ids_carry_prefix_and_are_distinct() {
        let mut store = seeded_store();
        let source = object(&[("title", Value::from("a")), ("author", Value::from("u"))]);
        let first = store.set(SetRequest::new(path("pages"), source.clone()));
        let second = store.set(SetRequest::new(path("pages"), source));

        let first_id = first.id.unwrap();
        let second_id = second.id.unwrap();
        assert!(first_id.starts_with("p_"));
        assert!(second_id.starts_with("p_"));
        assert_ne!(first_id, second_id);
    }

    #[test]
    fn get_affix_ladder_falls_back_to_bare_id() {
        let mut store = seeded_store();
        let result = store.set(
            SetRequest::new(
                path("pages"),
                object(&[("title", Value::from("t")), ("author", Value::from("u"))]),
            )
            .with_options(SetOptions::default().with_id("home")),
        );
        assert!(result.valid);
        assert_eq!(result.id.as_deref(), Some("p_home"));

        // Bare id resolves through the schema's own affix rule.
        let got = store
            .get(GetRequest::new(path("pages")).with_id("home"))
            .unwrap();
        assert!(!got.is_empty);
        assert_eq!(got.id.as_deref(), Some("p_home"));

        // A caller-affixed probe that misses reports is_affix_empty and
        // still falls back.
        let got = store
            .get(
                GetRequest::new(path("pages"))
                    .with_id("p_home")
                    .with_prefix_id("wrong_"),
            )
            .unwrap();
        assert!(!got.is_empty);
        assert!(got.is_affix_empty);
        assert_eq!(got.id.as_deref(), Some("p_home"));
    }

    #[test]
    fn get_position_indexes_into_the_value() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("tags"), SchemaKind::Array).with_schema(SchemaEntry::new(
                path("tags"),
                SchemaNode::array().with_items(SchemaNode::string()),
            )),
        );
        store.set(SetRequest::new(
            path("tags"),
            Value::Array(vec![Value::from("a"), Value::from("b")]),
        ));

        let got = store
            .get(GetRequest::new(path("tags")).with_options(GetOptions {
                position: Some(1),
                expand: false,
            }))
            .unwrap();
        assert_eq!(got.item, Some(Value::from("b")));

        let err = store
            .get(GetRequest::new(path("tags")).with_options(GetOptions {
                position: Some(5),
                expand: false,
            }))
            .unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { .. }));
        assert!(err.to_string().contains("out of range"));
    }

    // -----------------------------------------------------------------------
    // Relation expansion
    // -----------------------------------------------------------------------

    #[test]
    fn get_with_expand_resolves_related_documents() {
        let mut store = seeded_store();
        let author = store.set(
            SetRequest::new(path("users"), object(&[("name", Value::from("ada"))]))
                .with_options(SetOptions::default().with_source_id("u1")),
        );
        assert!(author.valid);

        let page = store.set(SetRequest::new(
            path("pages"),
            object(&[("title", Value::from("t")), ("author", Value::from("u1"))]),
        ));
        let id = page.id.unwrap();

        let got = store
            .get(
                GetRequest::new(path("pages"))
                    .with_id(&id)
                    .with_options(GetOptions {
                        position: None,
                        expand: true,
                    }),
            )
            .unwrap();
        assert_eq!(got.related.len(), 1);
        assert_eq!(got.related[0].path, path("users"));
        assert_eq!(got.related[0].id, "u1");
        assert!(got.related[0].item.is_some());
    }

    // -----------------------------------------------------------------------
    // Listener dispatch
    // -----------------------------------------------------------------------

    fn recording_listener() -> (Arc<Mutex<Vec<ChangeEvent>>>, Box<dyn crate::Listener>) {
        let seen: Arc<Mutex<Vec<ChangeEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener = Box::new(move |event: &ChangeEvent| {
            sink.lock().unwrap().push(event.clone());
        });
        (seen, listener)
    }

    #[test]
    fn update_listener_fires_once_per_set_with_new_value() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("count"), SchemaKind::Number)
                .with_schema(SchemaEntry::new(path("count"), SchemaNode::number())),
        );
        let (seen, listener) = recording_listener();
        store
            .add_listener(ListenerRequest {
                name: path("count"),
                on: EventKind::Update,
                id: None,
                ref_id: "widget-1".into(),
                listener,
            })
            .unwrap();

        store.set(SetRequest::new(path("count"), Value::from(9.0)));
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Update);
        assert_eq!(events[0].value, Value::from(9.0));
    }

    #[test]
    fn duplicate_ref_id_registration_fires_once() {
        let mut store = Store::new();
        store.add(
            AddRequest::new(path("count"), SchemaKind::Number)
                .with_schema(SchemaEntry::new(path("count"), SchemaNode::number())),
        );
        let (seen, listener) = recording_listener();
        let (_, second) = recording_listener();
        for listener in [listener, second] {
            store
                .add_listener(ListenerRequest {
                    name: path("count"),
                    on: EventKind::Update,
                    id: None,
                    ref_id: "widget-1".into(),
                    listener,
                })
                .unwrap();
        }

        store.set(SetRequest::new(path("count"), Value::from(1.0)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn listener_on_unadded_path_is_an_error() {
        let mut store = Store::new();
        let (_, listener) = recording_listener();
        let err = store
            .add_listener(ListenerRequest {
                name: path("ghost"),
                on: EventKind::Update,
                id: None,
                ref_id: "r".into(),
                listener,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::ListenerPathNotRegistered { .. }));
    }

    #[test]
    fn id_scoped_listener_receives_the_document() {
        let mut store = seeded_store();
        let (seen, listener) = recording_listener();
        store
            .add_listener(ListenerRequest {
                name: path("pages"),
                on: EventKind::Update,
                id: Some("p_home".into()),
                ref_id: "detail".into(),
                listener,
            })
            .unwrap();

        store.set(
            SetRequest::new(
                path("pages"),
                object(&[("title", Value::from("t")), ("author", Value::from("u"))]),
            )
            .with_options(SetOptions::default().with_id("home")),
        );
        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id.as_deref(), Some("p_home"));
        assert_eq!(
            events[0].value.as_object().unwrap().get("title"),
            Some(&Value::from("t"))
        );
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_removes_document_and_notifies() {
        let mut store = seeded_store();
        store.set(
            SetRequest::new(path("users"), object(&[("name", Value::from("ada"))]))
                .with_options(SetOptions::default().with_source_id("u1")),
        );
        let (seen, listener) = recording_listener();
        store
            .add_listener(ListenerRequest {
                name: path("users"),
                on: EventKind::Delete,
                id: Some("u1".into()),
                ref_id: "teardown".into(),
                listener,
            })
            .unwrap();

        let result = store
            .delete(DeleteRequest {
                name: path("users"),
                id: "u1".into(),
            })
            .unwrap();
        assert_eq!(
            result,
            DeleteResult {
                in_use: false,
                deleted: true
            }
        );
        assert_eq!(seen.lock().unwrap().len(), 1);

        let got = store
            .get(GetRequest::new(path("users")).with_id("u1"))
            .unwrap();
        assert!(got.is_empty);
    }

    #[test]
    fn delete_refuses_documents_still_referenced() {
        let mut store = seeded_store();
        store.set(
            SetRequest::new(path("users"), object(&[("name", Value::from("ada"))]))
                .with_options(SetOptions::default().with_source_id("u1")),
        );
        store.set(SetRequest::new(
            path("pages"),
            object(&[("title", Value::from("t")), ("author", Value::from("u1"))]),
        ));

        let result = store
            .delete(DeleteRequest {
                name: path("users"),
                id: "u1".into(),
            })
            .unwrap();
        assert_eq!(
            result,
            DeleteResult {
                in_use: true,
                deleted: false
            }
        );
        // Still present.
        let got = store
            .get(GetRequest::new(path("users")).with_id("u1"))
            .unwrap();
        assert!(!got.is_empty);
    }

    #[test]
    fn delete_of_missing_document_is_a_no_op() {
        let mut store = seeded_store();
        let result = store
            .delete(DeleteRequest {
                name: path("users"),
                id: "ghost".into(),
            })
            .unwrap();
        assert_eq!(
            result,
            DeleteResult {
                in_use: false,
                deleted: false
            }
        );
    }

    // -----------------------------------------------------------------------
    // Utilities
    // -----------------------------------------------------------------------

    #[test]
    fn generate_id_is_unique_per_call() {
        let store = Store::new();
        assert_ne!(store.generate_id(), store.generate_id());
    }

    #[test]
    fn len_paths_and_debug() {
        let mut store = seeded_store();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
        assert_eq!(store.paths(), vec![path("pages"), path("users")]);

        store.remove_listener(EventKind::Update, &path("pages"), None, "none");
        let debug = format!("{store:?}");
        assert!(debug.contains("Store"));
        assert!(debug.contains("path_count"));
    }
}
