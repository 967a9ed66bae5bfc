use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered map used for object and collection values.
///
/// Insertion order is semantically significant: option handlers address
/// entries by position, so the backing map must preserve it.
pub type ValueMap = IndexMap<String, Value>;

/// The runtime kind of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// UTF-8 text.
    String,
    /// Double-precision number.
    Number,
    /// True/false flag.
    Boolean,
    /// Platform render-node handle.
    Node,
    /// Named properties in declaration order.
    Object,
    /// Ordered sequence of elements.
    Array,
    /// Map from document id to per-document value.
    Collection,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Node => write!(f, "node"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
            Self::Collection => write!(f, "collection"),
        }
    }
}

/// Handle to a platform render node.
///
/// The data layer never interprets node internals; it only guarantees the
/// node name is present and never rewritten after storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeValue {
    /// Immutable tag name of the node (e.g. `DIV`).
    pub node_name: String,
}

impl NodeValue {
    /// Create a node handle with the given tag name.
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
        }
    }
}

/// A value stored in the data layer.
///
/// Objects and collections share the same backing map type; they are kept
/// as distinct variants because the schema layer treats them differently
/// (declared properties vs. generated document ids).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Number(f64),
    Boolean(bool),
    Node(NodeValue),
    Object(ValueMap),
    Array(Vec<Value>),
    Collection(ValueMap),
}

impl Value {
    /// The runtime kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Number(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Node(_) => ValueKind::Node,
            Self::Object(_) => ValueKind::Object,
            Self::Array(_) => ValueKind::Array,
            Self::Collection(_) => ValueKind::Collection,
        }
    }

    /// Canonical empty value for a kind.
    ///
    /// Used to seed unset paths: `""`, `0`, `false`, an unnamed node, `{}`,
    /// `[]`, or an empty collection.
    pub fn default_of(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => Self::String(String::new()),
            ValueKind::Number => Self::Number(0.0),
            ValueKind::Boolean => Self::Boolean(false),
            ValueKind::Node => Self::Node(NodeValue::default()),
            ValueKind::Object => Self::Object(ValueMap::new()),
            ValueKind::Array => Self::Array(Vec::new()),
            ValueKind::Collection => Self::Collection(ValueMap::new()),
        }
    }

    /// Borrow as a string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow as a number, if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as an object map, if this is an object value.
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as an array, if this is an array value.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as a collection map, if this is a collection value.
    pub fn as_collection(&self) -> Option<&ValueMap> {
        match self {
            Self::Collection(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable borrow as a collection map, if this is a collection value.
    pub fn as_collection_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Self::Collection(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
