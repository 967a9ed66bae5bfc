use std::fmt;

use strata_types::Path;
use thiserror::Error;

/// The schema keyword a validation failure violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Type,
    Required,
    AdditionalProperties,
    PatternProperty,
    UniqueItems,
    TargetPosition,
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Required => write!(f, "required"),
            Self::AdditionalProperties => write!(f, "additionalProperties"),
            Self::PatternProperty => write!(f, "patternProperty"),
            Self::UniqueItems => write!(f, "uniqueItems"),
            Self::TargetPosition => write!(f, "targetPosition"),
        }
    }
}

/// Structured validation failure.
///
/// Carries the schema path the value was checked against and the violated
/// keyword, so error handling never needs to parse the message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("schema violation at {schema_path} ({keyword}): {message}")]
pub struct SchemaError {
    /// Path of the schema node that rejected the value.
    pub schema_path: Path,
    /// The violated keyword.
    pub keyword: Keyword,
    /// Human-readable description.
    pub message: String,
}

impl SchemaError {
    /// Create a validation failure for a schema path.
    pub fn new(schema_path: Path, keyword: Keyword, message: impl Into<String>) -> Self {
        Self {
            schema_path,
            keyword,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path_keyword_and_message() {
        let err = SchemaError::new(
            Path::parse("test/items").unwrap(),
            Keyword::Type,
            "expected \"number\" but got \"string\"",
        );
        let text = err.to_string();
        assert!(text.contains("test/items"));
        assert!(text.contains("(type)"));
        assert!(text.contains("expected \"number\""));
    }

    #[test]
    fn keyword_display_uses_schema_spelling() {
        assert_eq!(Keyword::AdditionalProperties.to_string(), "additionalProperties");
        assert_eq!(Keyword::UniqueItems.to_string(), "uniqueItems");
        assert_eq!(Keyword::PatternProperty.to_string(), "patternProperty");
    }
}
