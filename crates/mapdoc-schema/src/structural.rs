//! # Structural Validator
//!
//! Front door of the structural phase: resolves the schema for the
//! document's declared revision, runs the combinator evaluator over the
//! tree, and converts raw keyword failures into a [`ValidationReport`] of
//! stable message codes the caller can localize.
//!
//! Fragment documents are validated permissively: required-property
//! failures are suppressed (a fragment is allowed to be partial) and
//! combinator mismatches are downgraded to warnings.

use mapdoc_core::{DocumentTree, MapVersionInfo, Pointer, ReportEntry, ValidationReport};

use crate::delegate::{keyword, KeywordDelegate, PrimitiveKeywordChecker};
use crate::evaluator::SchemaCombinatorEvaluator;
use crate::registry::{SchemaError, SchemaResolver};

/// Hard cap on structural errors kept in one report. Beyond this the
/// report stops being readable; the rest is dropped with a log line.
pub const MAX_VALIDATION_ERROR_COUNT: usize = 40;

/// Message codes the structural phase emits.
pub mod message {
    pub const REQUIRED: &str = "validate-constraint-required";
    pub const TYPE: &str = "validate-constraint-type";
    pub const UNEXPECTED: &str = "validate-constraint-unexpected";
    pub const REGEX: &str = "validate-constraint-regex";
    pub const EMPTY: &str = "validate-constraint-empty";
    pub const MIN_LENGTH: &str = "validate-constraint-minlength";
    pub const MINIMUM: &str = "validate-constraint-minimum";
    pub const MAXIMUM: &str = "validate-constraint-maximum";
    pub const REQUIRES: &str = "validate-constraint-requires";
    pub const FALLBACK: &str = "validate-constraint-fallback";
}

/// Runs the structural phase for one document.
pub struct StructuralValidator {
    resolver: Box<dyn SchemaResolver>,
    delegate: Box<dyn KeywordDelegate>,
}

impl StructuralValidator {
    /// Validator using the built-in leaf-keyword checker.
    pub fn new(resolver: Box<dyn SchemaResolver>) -> Self {
        Self::with_delegate(resolver, Box::new(PrimitiveKeywordChecker::new()))
    }

    /// Validator with a caller-supplied leaf-keyword delegate.
    pub fn with_delegate(
        resolver: Box<dyn SchemaResolver>,
        delegate: Box<dyn KeywordDelegate>,
    ) -> Self {
        Self { resolver, delegate }
    }

    /// Validate `tree` against the schema for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when no schema is registered for the
    /// declared revision — a configuration problem, not a document defect.
    pub fn validate(
        &self,
        tree: &DocumentTree,
        version: &MapVersionInfo,
    ) -> Result<ValidationReport, SchemaError> {
        let schema = self.resolver.resolve(version)?;
        let evaluator = SchemaCombinatorEvaluator::new(&*self.delegate);
        let failures = evaluator.evaluate(tree.root(), schema, &Pointer::root());

        let mut report = ValidationReport::new();
        for failure in failures {
            map_failure(version, failure, &mut report);
        }

        let discarded = report.truncate_errors(MAX_VALIDATION_ERROR_COUNT);
        if discarded > 0 {
            tracing::warn!(discarded, "structural error report truncated");
        }
        Ok(report)
    }
}

/// Convert one raw keyword failure into a report entry, applying the
/// fragment downgrades and the message-code mapping.
fn map_failure(version: &MapVersionInfo, raw: ReportEntry, report: &mut ValidationReport) {
    let mut reduce_to_warning = false;
    if version.is_fragment {
        // Fragments are allowed to be partial.
        if raw.code == keyword::REQUIRED {
            return;
        }
        if raw.code == keyword::ANY_OF || raw.code == keyword::ONE_OF {
            // A root-level oneOf mismatch on a fragment just restates that
            // the fragment is not a whole map.
            if raw.code == keyword::ONE_OF && raw.pointer.is_root() {
                return;
            }
            reduce_to_warning = true;
        }
    }

    let entry = remap(raw);
    if reduce_to_warning {
        report.push_warning(entry);
    } else {
        report.push_error(entry);
    }
}

fn remap(raw: ReportEntry) -> ReportEntry {
    let ReportEntry {
        code,
        pointer,
        mut params,
    } = raw;

    let code: &str = match code.as_str() {
        keyword::REQUIRED => message::REQUIRED,
        keyword::ANY_OF | keyword::ONE_OF | keyword::ALL_OF | keyword::TYPE | keyword::ENUM => {
            message::TYPE
        }
        keyword::ADDITIONAL_PROP => message::UNEXPECTED,
        keyword::PATTERN => message::REGEX,
        keyword::REQUIRES => message::REQUIRES,
        keyword::MIN_LENGTH => {
            // A one-character minimum really means "must not be empty";
            // narrow it so the caller can show a clearer message.
            if params.first().map(String::as_str) == Some("1") {
                params.clear();
                message::EMPTY
            } else {
                message::MIN_LENGTH
            }
        }
        keyword::MINIMUM | keyword::EXCLUSIVE_MINIMUM => message::MINIMUM,
        keyword::MAXIMUM | keyword::EXCLUSIVE_MAXIMUM => message::MAXIMUM,
        _ => message::FALLBACK,
    };

    // Unexpected-property findings point at the offending key itself.
    let pointer = if code == message::UNEXPECTED && !params.is_empty() {
        let key = params.remove(0);
        pointer.child_key(key)
    } else {
        pointer
    };

    ReportEntry::new(code, pointer, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use mapdoc_core::SchemaRevision;
    use serde_json::json;

    fn registry_with(schema: serde_json::Value) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register_value(SchemaRevision::V17_3, schema)
            .unwrap();
        registry
    }

    fn map_schema() -> serde_json::Value {
        json!({
            "type": "object",
            "required": ["groups"],
            "properties": {
                "groups": { "type": "object" },
                "settings": {
                    "type": "object",
                    "properties": {
                        "zoom": {
                            "type": "object",
                            "properties": {
                                "min": { "type": "number" },
                                "max": { "type": "number" }
                            }
                        }
                    }
                },
                "background": {
                    "anyOf": [
                        { "type": "string", "minLength": 1 },
                        { "type": "object", "required": ["image"] }
                    ]
                }
            },
            "additionalProperties": false
        })
    }

    fn validate(document: serde_json::Value, version: MapVersionInfo) -> ValidationReport {
        let validator = StructuralValidator::new(Box::new(registry_with(map_schema())));
        validator
            .validate(&DocumentTree::new(document), &version)
            .unwrap()
    }

    #[test]
    fn clean_document_passes() {
        let report = validate(
            json!({ "groups": {}, "settings": { "zoom": { "min": 2, "max": 5 } } }),
            MapVersionInfo::full(SchemaRevision::V17_3),
        );
        assert!(report.is_ok());
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn missing_required_maps_to_message_code() {
        let report = validate(json!({}), MapVersionInfo::full(SchemaRevision::V17_3));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code, message::REQUIRED);
        assert_eq!(report.errors()[0].params, ["groups"]);
    }

    #[test]
    fn unexpected_property_pointer_names_the_key() {
        let report = validate(
            json!({ "groups": {}, "leaflet": {} }),
            MapVersionInfo::full(SchemaRevision::V17_3),
        );
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].code, message::UNEXPECTED);
        assert_eq!(report.errors()[0].pointer.to_string(), "/leaflet");
        assert!(report.errors()[0].params.is_empty());
    }

    #[test]
    fn min_length_one_narrows_to_empty() {
        // The intended background branch fails on the required `image`,
        // so per the anyOf retention rule the report carries that branch.
        let report = validate(
            json!({ "groups": {}, "background": {} }),
            MapVersionInfo::full(SchemaRevision::V17_3),
        );
        let codes: Vec<&str> = report.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, [message::REQUIRED, message::TYPE]);
        assert_eq!(report.errors()[0].params, ["image"]);

        // Direct minLength narrowing: neither branch has a required miss,
        // so both branches' failures accumulate plus the synthetic anyOf.
        let report = validate(
            json!({ "groups": {}, "background": "" }),
            MapVersionInfo::full(SchemaRevision::V17_3),
        );
        let codes: Vec<&str> = report.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, [message::EMPTY, message::TYPE, message::TYPE]);
        assert!(report.errors()[0].params.is_empty());
    }

    #[test]
    fn fragment_skips_required_and_downgrades_combinators() {
        let report = validate(
            json!({ "background": 7 }),
            MapVersionInfo::fragment(SchemaRevision::V17_3),
        );
        // `groups` is required but suppressed; both background branches
        // fail without a required miss, so the type failures stay errors
        // while the synthetic anyOf becomes a warning.
        let error_codes: Vec<&str> = report.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(error_codes, [message::TYPE, message::TYPE]);
        let warning_codes: Vec<&str> = report.warnings().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(warning_codes, [message::TYPE]);
    }

    #[test]
    fn error_report_is_truncated() {
        let mut huge = serde_json::Map::new();
        huge.insert("groups".to_string(), json!({}));
        for i in 0..60 {
            huge.insert(format!("stray{i}"), json!(true));
        }
        let report = validate(
            serde_json::Value::Object(huge),
            MapVersionInfo::full(SchemaRevision::V17_3),
        );
        assert_eq!(report.errors().len(), MAX_VALIDATION_ERROR_COUNT);
    }

    #[test]
    fn unknown_revision_fails_construction_not_report() {
        let validator = StructuralValidator::new(Box::new(SchemaRegistry::new()));
        let result = validator.validate(
            &DocumentTree::new(json!({})),
            &MapVersionInfo::full(SchemaRevision::V17),
        );
        assert!(matches!(result, Err(SchemaError::UnknownRevision(_))));
    }
}
