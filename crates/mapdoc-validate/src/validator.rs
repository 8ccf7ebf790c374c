//! # Validation Facade
//!
//! Single entry point for callers holding raw document source: parse,
//! detect the declared schema revision, run the structural phase, and —
//! only once the tree is structurally sound — run the semantic
//! constraint pipeline over the same tree.

use std::str::FromStr;

use mapdoc_constraints::{
    standard_catalog, ConstraintPipeline, FileLookup, PipelineConfig, PipelineError,
};
use mapdoc_core::{
    DocumentTree, MapVersionInfo, Pointer, SchemaRevision, ValidationReport,
};
use mapdoc_schema::{SchemaResolver, StructuralValidator};
use serde_json::Value;

/// Message codes emitted by the facade itself.
pub mod message {
    /// The source is not well-formed JSON.
    pub const INVALID_JSON: &str = "validate-invalid-json";
    /// `$schema` is absent or does not name a supported revision.
    pub const BAD_SCHEMA: &str = "validate-bad-schema";
}

/// Result of one full validation call.
#[derive(Debug)]
pub struct ValidationOutcome {
    /// Detected version, absent when `$schema` could not be resolved.
    pub version: Option<MapVersionInfo>,
    /// Findings of parsing, revision detection and the structural phase.
    pub structural: ValidationReport,
    /// Findings of the constraint pipeline; `None` when the structural
    /// phase failed and the pipeline was skipped.
    pub semantic: Option<ValidationReport>,
}

impl ValidationOutcome {
    /// Whether the document is acceptable: no errors in either phase.
    pub fn is_ok(&self) -> bool {
        self.structural.is_ok() && self.semantic.as_ref().map_or(true, ValidationReport::is_ok)
    }

    /// Both phases folded into one report, structural findings first.
    pub fn merged(self) -> ValidationReport {
        let mut merged = self.structural;
        if let Some(semantic) = self.semantic {
            merged.merge(semantic);
        }
        merged
    }

    fn fatal(code: &str, params: Vec<String>) -> Self {
        let mut structural = ValidationReport::new();
        structural.add_error(code, Pointer::root(), params);
        Self {
            version: None,
            structural,
            semantic: None,
        }
    }
}

/// Two-phase validator for map documents.
pub struct MapDocumentValidator {
    structural: StructuralValidator,
    pipeline: ConstraintPipeline,
}

impl MapDocumentValidator {
    /// Validator with the standard rule catalog.
    pub fn new(
        resolver: Box<dyn SchemaResolver>,
        config: PipelineConfig,
        file_lookup: Box<dyn FileLookup>,
    ) -> Result<Self, PipelineError> {
        let pipeline = ConstraintPipeline::new(standard_catalog(config, file_lookup))?;
        Ok(Self::with_pipeline(StructuralValidator::new(resolver), pipeline))
    }

    /// Validator from pre-built phases, for callers with a custom keyword
    /// delegate or rule catalog.
    pub fn with_pipeline(structural: StructuralValidator, pipeline: ConstraintPipeline) -> Self {
        Self { structural, pipeline }
    }

    /// Parse and validate raw document source.
    ///
    /// Malformed JSON yields a single fatal finding rather than an `Err`:
    /// a bad document is a validation outcome, not a caller mistake.
    pub fn validate_source(&self, source: &str, is_fragment: bool) -> ValidationOutcome {
        match DocumentTree::from_source(source) {
            Ok(tree) => self.validate(&tree, is_fragment),
            Err(error) => {
                tracing::debug!(%error, "document source failed to parse");
                ValidationOutcome::fatal(message::INVALID_JSON, vec![])
            }
        }
    }

    /// Validate an already-parsed tree.
    pub fn validate(&self, tree: &DocumentTree, is_fragment: bool) -> ValidationOutcome {
        let Some(revision) = detect_revision(tree.root()) else {
            return ValidationOutcome::fatal(message::BAD_SCHEMA, vec![supported_revisions()]);
        };
        let version = if is_fragment {
            MapVersionInfo::fragment(revision)
        } else {
            MapVersionInfo::full(revision)
        };

        let structural = match self.structural.validate(tree, &version) {
            Ok(report) => report,
            Err(error) => {
                // A supported revision with no registered schema is a setup
                // gap, surfaced to the editor the same way as a bad URL.
                tracing::warn!(%error, "no schema available for declared revision");
                return ValidationOutcome::fatal(message::BAD_SCHEMA, vec![supported_revisions()]);
            }
        };

        if !structural.is_ok() {
            return ValidationOutcome {
                version: Some(version),
                structural,
                semantic: None,
            };
        }

        let semantic = self.pipeline.run(&version, tree);
        ValidationOutcome {
            version: Some(version),
            structural,
            semantic: Some(semantic),
        }
    }

    /// Run only the constraint pipeline, regardless of structural state.
    ///
    /// Rules guard their own preconditions, so this is safe on trees the
    /// structural phase rejected; findings may be less precise.
    pub fn validate_semantics_only(
        &self,
        tree: &DocumentTree,
        version: &MapVersionInfo,
    ) -> ValidationReport {
        self.pipeline.run(version, tree)
    }
}

/// Revision named by the document's `$schema` URL: the file stem of its
/// last path segment.
fn detect_revision(root: &Value) -> Option<SchemaRevision> {
    let url = root.get("$schema")?.as_str()?;
    let stem = url
        .rsplit('/')
        .next()
        .and_then(|name| name.strip_suffix(".json").or(Some(name)))?;
    SchemaRevision::from_str(stem).ok()
}

fn supported_revisions() -> String {
    SchemaRevision::SUPPORTED
        .iter()
        .map(|revision| revision.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_detected_from_schema_url_stem() {
        let root = serde_json::json!({
            "$schema": "https://example.org/schemas/v17.3.json"
        });
        assert_eq!(detect_revision(&root), Some(SchemaRevision::V17_3));
    }

    #[test]
    fn bare_revision_name_accepted() {
        let root = serde_json::json!({ "$schema": "v17" });
        assert_eq!(detect_revision(&root), Some(SchemaRevision::V17));
    }

    #[test]
    fn unknown_or_missing_schema_is_rejected() {
        assert_eq!(
            detect_revision(&serde_json::json!({ "$schema": "https://example.org/v99.json" })),
            None
        );
        assert_eq!(detect_revision(&serde_json::json!({})), None);
        assert_eq!(detect_revision(&serde_json::json!({ "$schema": 17 })), None);
    }

    #[test]
    fn supported_revision_list_is_ordered() {
        let listed = supported_revisions();
        assert!(listed.starts_with("v16.4"));
        assert!(listed.ends_with("v17.3"));
    }
}
