use std::fmt;
use std::sync::Arc;

use regex::Regex;
use strata_types::{Path, Value, ValueKind};

/// The declared kind of a schema node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Node,
    Object,
    Array,
    Collection,
}

impl SchemaKind {
    /// The runtime value kind a value of this schema kind must have.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Number => ValueKind::Number,
            Self::Boolean => ValueKind::Boolean,
            Self::Node => ValueKind::Node,
            Self::Object => ValueKind::Object,
            Self::Array => ValueKind::Array,
            Self::Collection => ValueKind::Collection,
        }
    }

    /// Whether values of this kind contain nested values.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Object | Self::Array | Self::Collection)
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value_kind())
    }
}

/// A declared object property.
#[derive(Clone, Debug)]
pub struct Property {
    /// Property key.
    pub name: String,
    /// Schema for the property value.
    pub node: SchemaNode,
    /// Whether a write must supply this property (or a default must exist).
    pub required: bool,
    /// Value used when a write omits this property.
    pub default: Option<Value>,
}

impl Property {
    pub fn new(name: impl Into<String>, node: SchemaNode) -> Self {
        Self {
            name: name.into(),
            node,
            required: false,
            default: None,
        }
    }

    /// Mark this property as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Supply a default applied when the property is absent from a write.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A pattern-matched property: undeclared keys matching `pattern` are
/// validated against `node`.
#[derive(Clone, Debug)]
pub struct PatternProperty {
    pub pattern: Regex,
    pub node: SchemaNode,
}

/// Per-node insert/merge options.
///
/// Any set option makes the node's option handler run on every write to
/// the node, regardless of caller depth.
#[derive(Clone, Debug, Default)]
pub struct NodeOptions {
    /// Reject inserting an element equal to an existing one.
    pub unique_items: bool,
    /// Allow-list of keys permitted beyond declared properties.
    pub additional_properties: Option<Vec<String>>,
    /// Node accepts in-place repositioned writes.
    pub mutable: bool,
}

impl NodeOptions {
    /// Whether any option is set.
    pub fn any(&self) -> bool {
        self.unique_items || self.additional_properties.is_some() || self.mutable
    }
}

/// One side of a document id affix: a static string or a resolver evaluated
/// at id-computation time.
#[derive(Clone)]
pub enum AffixSource {
    Value(String),
    Resolver(Arc<dyn Fn() -> String + Send + Sync>),
}

impl AffixSource {
    /// Create a static affix.
    pub fn value(s: impl Into<String>) -> Self {
        Self::Value(s.into())
    }

    /// Create a dynamically-evaluated affix.
    pub fn resolver(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self::Resolver(Arc::new(f))
    }

    /// Evaluate the affix.
    pub fn resolve(&self) -> String {
        match self {
            Self::Value(s) => s.clone(),
            Self::Resolver(f) => f(),
        }
    }
}

impl fmt::Debug for AffixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(s) => f.debug_tuple("Value").field(s).finish(),
            Self::Resolver(_) => f.debug_tuple("Resolver").field(&"<fn>").finish(),
        }
    }
}

/// Document id rule for a collection: `prefix + identifier + suffix`.
///
/// The identifier is the caller-supplied id, then `default`, then a random
/// one.
#[derive(Clone, Debug, Default)]
pub struct AffixRule {
    pub prefix: Option<AffixSource>,
    pub suffix: Option<AffixSource>,
    pub default: Option<String>,
}

impl AffixRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: AffixSource) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_suffix(mut self, suffix: AffixSource) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The type/constraint descriptor registered for a store path.
#[derive(Clone, Debug)]
pub struct SchemaNode {
    /// Declared kind.
    pub kind: SchemaKind,
    /// Declared object properties, in declaration order.
    pub properties: Vec<Property>,
    /// Patterns validating undeclared object keys.
    pub pattern_properties: Vec<PatternProperty>,
    /// Element schema for arrays and collections.
    pub items: Option<Box<SchemaNode>>,
    /// Insert/merge options.
    pub options: NodeOptions,
    /// Document id rule (collections only).
    pub id: Option<AffixRule>,
    /// Relation target for read-time expansion.
    pub relation: Option<Path>,
}

impl SchemaNode {
    /// Create a bare node of the given kind.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            pattern_properties: Vec::new(),
            items: None,
            options: NodeOptions::default(),
            id: None,
            relation: None,
        }
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn node() -> Self {
        Self::new(SchemaKind::Node)
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::Object)
    }

    pub fn array() -> Self {
        Self::new(SchemaKind::Array)
    }

    pub fn collection() -> Self {
        Self::new(SchemaKind::Collection)
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_pattern_property(mut self, pattern: Regex, node: SchemaNode) -> Self {
        self.pattern_properties.push(PatternProperty { pattern, node });
        self
    }

    pub fn with_items(mut self, items: SchemaNode) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_options(mut self, options: NodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_id_rule(mut self, rule: AffixRule) -> Self {
        self.id = Some(rule);
        self
    }

    pub fn with_relation(mut self, target: Path) -> Self {
        self.relation = Some(target);
        self
    }

    /// Look up a declared property by key.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// First pattern property matching an undeclared key.
    pub fn matching_pattern(&self, key: &str) -> Option<&PatternProperty> {
        self.pattern_properties.iter().find(|p| p.pattern.is_match(key))
    }
}
