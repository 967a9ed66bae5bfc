use strata_types::{Path, Value};

use crate::error::{Keyword, SchemaError};
use crate::node::SchemaKind;

/// Verify that a value's runtime kind matches the declared schema kind.
///
/// Node values are special-cased: the value must expose a non-empty
/// `node_name`. All other kinds compare the runtime kind tag directly.
pub fn check_kind(schema_path: &Path, value: &Value, expected: SchemaKind) -> Result<(), SchemaError> {
    if expected == SchemaKind::Node {
        return match value {
            Value::Node(node) if !node.node_name.is_empty() => Ok(()),
            Value::Node(_) => Err(SchemaError::new(
                schema_path.clone(),
                Keyword::Type,
                "node value is missing a nodeName",
            )),
            other => Err(mismatch(schema_path, expected, other)),
        };
    }

    let actual = value.kind();
    if actual == expected.value_kind() {
        Ok(())
    } else {
        Err(mismatch(schema_path, expected, value))
    }
}

fn mismatch(schema_path: &Path, expected: SchemaKind, value: &Value) -> SchemaError {
    SchemaError::new(
        schema_path.clone(),
        Keyword::Type,
        format!("expected \"{expected}\" but got \"{}\"", value.kind()),
    )
}
