//! # Primitive-Keyword Delegate
//!
//! The combinator evaluator does not check leaf keywords itself; it
//! delegates them through [`KeywordDelegate`]. The built-in
//! [`PrimitiveKeywordChecker`] covers the keywords the map schemas use;
//! tests substitute scripted delegates to pin down combinator semantics in
//! isolation.
//!
//! Failures carry *raw keyword codes* (`"required"`, `"pattern"`, …), not
//! localization message codes — the `anyOf` retention heuristic keys on
//! the `required` code, and the structural validator maps raw codes to
//! message codes afterwards.

use mapdoc_core::{Pointer, ReportEntry};
use serde_json::Value;

use crate::schema::SchemaNode;

/// Raw keyword codes attached to failures during schema evaluation.
pub mod keyword {
    pub const TYPE: &str = "type";
    pub const REQUIRED: &str = "required";
    pub const PATTERN: &str = "pattern";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const MINIMUM: &str = "minimum";
    pub const MAXIMUM: &str = "maximum";
    pub const EXCLUSIVE_MINIMUM: &str = "exclusiveMinimum";
    pub const EXCLUSIVE_MAXIMUM: &str = "exclusiveMaximum";
    pub const ENUM: &str = "enum";
    pub const REQUIRES: &str = "requires";
    pub const ADDITIONAL_PROP: &str = "additionalProp";
    pub const ALL_OF: &str = "allOf";
    pub const ANY_OF: &str = "anyOf";
    pub const ONE_OF: &str = "oneOf";
}

/// Capability checking the leaf keywords of one schema node against one
/// document node. Returns the failures of that single attempt; an empty
/// list means the node satisfied every leaf keyword.
///
/// Implementations must not recurse into `properties`, `items`, or the
/// combinators — the evaluator owns recursion and combinator policy.
pub trait KeywordDelegate: Send + Sync {
    /// Check `node` against the leaf keywords of `schema`.
    fn check(&self, node: &Value, schema: &SchemaNode, scope: &Pointer) -> Vec<ReportEntry>;
}

/// Built-in leaf-keyword checker covering `type`, `required`, `pattern`,
/// string lengths, numeric bounds, and `enum`.
#[derive(Debug, Default)]
pub struct PrimitiveKeywordChecker;

impl PrimitiveKeywordChecker {
    /// A checker with default behavior.
    pub fn new() -> Self {
        Self
    }
}

impl KeywordDelegate for PrimitiveKeywordChecker {
    fn check(&self, node: &Value, schema: &SchemaNode, scope: &Pointer) -> Vec<ReportEntry> {
        let mut failures = Vec::new();

        if let Some(ty) = &schema.ty {
            if !ty.matches(node) {
                failures.push(ReportEntry::new(
                    keyword::TYPE,
                    scope.clone(),
                    vec![ty.describe(), json_kind(node).to_string()],
                ));
            }
        }

        if let Value::Object(map) = node {
            for name in &schema.required {
                if !map.contains_key(name) {
                    failures.push(ReportEntry::new(
                        keyword::REQUIRED,
                        scope.clone(),
                        vec![name.clone()],
                    ));
                }
            }
        }

        if let Value::String(text) = node {
            check_string(text, schema, scope, &mut failures);
        }

        if let Value::Number(number) = node {
            if let Some(value) = number.as_f64() {
                check_number(value, schema, scope, &mut failures);
            }
        }

        if let Some(permitted) = &schema.enumeration {
            if !permitted.contains(node) {
                failures.push(ReportEntry::new(
                    keyword::ENUM,
                    scope.clone(),
                    vec![node.to_string()],
                ));
            }
        }

        failures
    }
}

fn check_string(text: &str, schema: &SchemaNode, scope: &Pointer, failures: &mut Vec<ReportEntry>) {
    let length = text.chars().count() as u64;

    if let Some(min) = schema.min_length {
        if length < min {
            failures.push(ReportEntry::new(
                keyword::MIN_LENGTH,
                scope.clone(),
                vec![min.to_string()],
            ));
        }
    }
    if let Some(max) = schema.max_length {
        if length > max {
            failures.push(ReportEntry::new(
                keyword::MAX_LENGTH,
                scope.clone(),
                vec![max.to_string()],
            ));
        }
    }
    if let Some(pattern) = &schema.pattern {
        match regex::Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(text) {
                    failures.push(ReportEntry::new(
                        keyword::PATTERN,
                        scope.clone(),
                        vec![pattern.clone()],
                    ));
                }
            }
            Err(error) => {
                // A malformed pattern is a schema-authoring defect; skip the
                // keyword rather than failing the document for it.
                tracing::warn!(pattern = %pattern, %error, "skipping unparseable schema pattern");
            }
        }
    }
}

fn check_number(value: f64, schema: &SchemaNode, scope: &Pointer, failures: &mut Vec<ReportEntry>) {
    if let Some(min) = schema.minimum {
        if value < min {
            failures.push(ReportEntry::new(
                keyword::MINIMUM,
                scope.clone(),
                vec![min.to_string()],
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if value > max {
            failures.push(ReportEntry::new(
                keyword::MAXIMUM,
                scope.clone(),
                vec![max.to_string()],
            ));
        }
    }
    if let Some(min) = schema.exclusive_minimum {
        if value <= min {
            failures.push(ReportEntry::new(
                keyword::EXCLUSIVE_MINIMUM,
                scope.clone(),
                vec![min.to_string()],
            ));
        }
    }
    if let Some(max) = schema.exclusive_maximum {
        if value >= max {
            failures.push(ReportEntry::new(
                keyword::EXCLUSIVE_MAXIMUM,
                scope.clone(),
                vec![max.to_string()],
            ));
        }
    }
}

/// Human-readable kind name of a JSON value, used in `type` failure params.
pub fn json_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(node: Value, schema: Value) -> Vec<ReportEntry> {
        let schema = SchemaNode::from_value(schema).unwrap();
        PrimitiveKeywordChecker::new().check(&node, &schema, &Pointer::root())
    }

    fn codes(failures: &[ReportEntry]) -> Vec<&str> {
        failures.iter().map(|f| f.code.as_str()).collect()
    }

    #[test]
    fn type_mismatch_reports_expected_and_actual() {
        let failures = check(json!(5), json!({ "type": "string" }));
        assert_eq!(codes(&failures), ["type"]);
        assert_eq!(failures[0].params, ["string", "number"]);
    }

    #[test]
    fn required_reports_each_missing_property() {
        let failures = check(
            json!({ "groups": {} }),
            json!({ "type": "object", "required": ["groups", "markers", "settings"] }),
        );
        assert_eq!(codes(&failures), ["required", "required"]);
        assert_eq!(failures[0].params, ["markers"]);
        assert_eq!(failures[1].params, ["settings"]);
    }

    #[test]
    fn required_is_skipped_for_non_objects() {
        let failures = check(json!("text"), json!({ "required": ["x"] }));
        assert!(failures.is_empty());
    }

    #[test]
    fn string_length_and_pattern() {
        let failures = check(
            json!(""),
            json!({ "type": "string", "minLength": 1 }),
        );
        assert_eq!(codes(&failures), ["minLength"]);
        assert_eq!(failures[0].params, ["1"]);

        let failures = check(
            json!("not a layer"),
            json!({ "type": "string", "pattern": "^bg:[a-z0-9]+$" }),
        );
        assert_eq!(codes(&failures), ["pattern"]);
    }

    #[test]
    fn unparseable_pattern_is_skipped() {
        let failures = check(json!("x"), json!({ "pattern": "(" }));
        assert!(failures.is_empty());
    }

    #[test]
    fn numeric_bounds() {
        let failures = check(
            json!(-20),
            json!({ "type": "number", "minimum": -16, "maximum": 6 }),
        );
        assert_eq!(codes(&failures), ["minimum"]);
        assert_eq!(failures[0].params, ["-16"]);

        let failures = check(json!(0), json!({ "exclusiveMinimum": 0 }));
        assert_eq!(codes(&failures), ["exclusiveMinimum"]);
    }

    #[test]
    fn enum_membership() {
        let schema = json!({ "enum": ["dark", "light"] });
        assert!(check(json!("dark"), schema.clone()).is_empty());
        assert_eq!(codes(&check(json!("sepia"), schema)), ["enum"]);
    }

    #[test]
    fn multiple_keyword_failures_accumulate() {
        let failures = check(
            json!({}),
            json!({ "type": "array", "required": ["id"] }),
        );
        // `required` only applies to object nodes, which this is, so both
        // the type mismatch and the missing property are reported.
        assert_eq!(codes(&failures), ["type", "required"]);
    }
}
