//! # Schema Model
//!
//! The subset of JSON Schema this validator evaluates, plus the
//! non-standard `requires` keyword (property co-occurrence). Schemas are
//! deserialized from their JSON source with serde; keywords outside this
//! model are ignored rather than rejected, so schema files may carry
//! annotations (`description`, `$id`, …) freely.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// A single type name as used by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    /// JSON object.
    Object,
    /// JSON array.
    Array,
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A number with no fractional part.
    Integer,
    /// JSON boolean.
    Boolean,
    /// JSON null.
    Null,
}

impl TypeName {
    /// Does `node` inhabit this type?
    pub fn matches(self, node: &Value) -> bool {
        match self {
            Self::Object => node.is_object(),
            Self::Array => node.is_array(),
            Self::String => node.is_string(),
            Self::Number => node.is_number(),
            Self::Integer => match node {
                Value::Number(n) => {
                    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                }
                _ => false,
            },
            Self::Boolean => node.is_boolean(),
            Self::Null => node.is_null(),
        }
    }

    /// Canonical keyword spelling, used in failure parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

/// The `type` keyword: one type name or a union of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeConstraint {
    /// `"type": "string"`
    One(TypeName),
    /// `"type": ["string", "number"]`
    Union(Vec<TypeName>),
}

impl TypeConstraint {
    /// Does `node` satisfy the constraint?
    pub fn matches(&self, node: &Value) -> bool {
        match self {
            Self::One(name) => name.matches(node),
            Self::Union(names) => names.iter().any(|name| name.matches(node)),
        }
    }

    /// Render the expected type(s) for failure parameters.
    pub fn describe(&self) -> String {
        match self {
            Self::One(name) => name.as_str().to_string(),
            Self::Union(names) => names
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// The `additionalProperties` keyword: a blanket policy or a schema that
/// undeclared property values must satisfy.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` permits undeclared keys; `false` rejects them.
    Policy(bool),
    /// Undeclared property values are validated against this schema.
    Schema(Box<SchemaNode>),
}

/// One node of a schema tree.
///
/// Combinator keywords (`allOf`/`anyOf`/`oneOf`) may appear alongside each
/// other and alongside primitive keywords; every declared keyword is
/// evaluated independently and failures are unioned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaNode {
    /// The `type` keyword.
    #[serde(rename = "type")]
    pub ty: Option<TypeConstraint>,
    /// Property names that must be present on object nodes.
    pub required: Vec<String>,
    /// Declared properties of object nodes.
    pub properties: HashMap<String, SchemaNode>,
    /// Policy for keys not named in `properties`. Absent means permitted.
    pub additional_properties: Option<AdditionalProperties>,
    /// Non-standard: presence of the property carrying this keyword
    /// requires the named sibling property to also be present.
    pub requires: Option<String>,
    /// Regex that string nodes must match.
    pub pattern: Option<String>,
    /// Minimum length (in characters) of string nodes.
    pub min_length: Option<u64>,
    /// Maximum length (in characters) of string nodes.
    pub max_length: Option<u64>,
    /// Inclusive lower bound on number nodes.
    pub minimum: Option<f64>,
    /// Inclusive upper bound on number nodes.
    pub maximum: Option<f64>,
    /// Exclusive lower bound on number nodes.
    pub exclusive_minimum: Option<f64>,
    /// Exclusive upper bound on number nodes.
    pub exclusive_maximum: Option<f64>,
    /// Closed set of permitted values.
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<Value>>,
    /// Schema for array elements.
    pub items: Option<Box<SchemaNode>>,
    /// Every subschema must match.
    pub all_of: Vec<SchemaNode>,
    /// At least one subschema must match.
    pub any_of: Vec<SchemaNode>,
    /// Exactly one subschema must match.
    pub one_of: Vec<SchemaNode>,
}

impl SchemaNode {
    /// Deserialize a schema from its JSON representation.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_core_keywords() {
        let schema = SchemaNode::from_value(json!({
            "type": "object",
            "required": ["groups"],
            "properties": {
                "groups": { "type": "object" },
                "associatedLayer": { "type": "string", "requires": "image" }
            },
            "additionalProperties": false
        }))
        .unwrap();
        assert!(matches!(schema.ty, Some(TypeConstraint::One(TypeName::Object))));
        assert_eq!(schema.required, ["groups"]);
        assert_eq!(
            schema.properties["associatedLayer"].requires.as_deref(),
            Some("image")
        );
        assert!(matches!(
            schema.additional_properties,
            Some(AdditionalProperties::Policy(false))
        ));
    }

    #[test]
    fn deserializes_type_union_and_combinators() {
        let schema = SchemaNode::from_value(json!({
            "type": ["string", "number"],
            "anyOf": [ { "type": "string" }, { "type": "number" } ]
        }))
        .unwrap();
        assert!(matches!(schema.ty, Some(TypeConstraint::Union(_))));
        assert_eq!(schema.any_of.len(), 2);
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let schema = SchemaNode::from_value(json!({
            "$id": "mapdoc://schemas/v17.3.json",
            "description": "top-level map document",
            "type": "object"
        }))
        .unwrap();
        assert!(schema.ty.is_some());
    }

    #[test]
    fn integer_matches_whole_floats() {
        assert!(TypeName::Integer.matches(&json!(4)));
        assert!(TypeName::Integer.matches(&json!(4.0)));
        assert!(!TypeName::Integer.matches(&json!(4.5)));
        assert!(!TypeName::Integer.matches(&json!("4")));
    }

    #[test]
    fn type_union_matches_any_member() {
        let union = TypeConstraint::Union(vec![TypeName::String, TypeName::Null]);
        assert!(union.matches(&json!("bg.png")));
        assert!(union.matches(&json!(null)));
        assert!(!union.matches(&json!(7)));
        assert_eq!(union.describe(), "string|null");
    }
}
