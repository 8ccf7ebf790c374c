//! # mapdoc-constraints — Semantic Validation
//!
//! The second validation phase: cross-field and cross-entity rules the
//! schema language cannot express, such as "every bucket's group must be
//! declared" or "marker ids are globally unique". Rules implement the
//! [`Constraint`] trait and run inside a [`ConstraintPipeline`], which
//! resolves declared dependencies into a stable execution order and
//! merges every finding into one report.
//!
//! ## Design
//!
//! The pipeline never stops early; the complete picture of a document's
//! problems arrives in one pass. Rules are pure readers over the
//! document tree and guard their own preconditions, so the pipeline may
//! be run even over trees the structural phase rejected.

pub mod capability;
pub mod config;
pub mod constraint;
pub mod pipeline;
pub mod rules;

pub use capability::{AllFilesPresent, FileLookup};
pub use config::PipelineConfig;
pub use constraint::{Constraint, ConstraintDescriptor, ReportSink};
pub use pipeline::{ConstraintPipeline, PipelineError};
pub use rules::standard_catalog;

#[cfg(test)]
mod tests {
    use super::*;
    use mapdoc_core::{DocumentTree, MapVersionInfo, SchemaRevision};
    use serde_json::json;

    fn standard_pipeline() -> ConstraintPipeline {
        let catalog = standard_catalog(PipelineConfig::default(), Box::new(AllFilesPresent));
        ConstraintPipeline::new(catalog).unwrap()
    }

    #[test]
    fn standard_catalog_builds_in_registration_order() {
        assert_eq!(
            standard_pipeline().execution_order(),
            vec![
                "group-exists",
                "background-layer-exists",
                "collectible-dependent-fields",
                "deprecated-fields",
                "layer-id-no-overlap",
                "marker-uid-no-overlap",
                "required-files-exist",
                "search-dependent-fields",
                "zoom-min-max",
            ]
        );
    }

    #[test]
    fn clean_document_yields_empty_report() {
        let document = DocumentTree::new(json!({
            "groups": { "ore": { "name": "Ores" } },
            "background": "plains.png",
            "markers": { "ore bg:0": [ { "id": "m1", "lat": 0.0, "lon": 0.0 } ] }
        }));
        let version = MapVersionInfo::full(SchemaRevision::RECOMMENDED);
        let report = standard_pipeline().run(&version, &document);
        assert!(report.is_ok());
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let document = DocumentTree::new(json!({
            "markers": { "ghost": [ { "id": "a" }, { "id": "a" } ] }
        }));
        let version = MapVersionInfo::full(SchemaRevision::RECOMMENDED);
        let pipeline = standard_pipeline();
        let first = pipeline.run(&version, &document);
        let second = pipeline.run(&version, &document);
        assert_eq!(first.errors().len(), second.errors().len());
        for (a, b) in first.errors().iter().zip(second.errors()) {
            assert_eq!(a.code, b.code);
            assert_eq!(a.pointer.to_string(), b.pointer.to_string());
            assert_eq!(a.params, b.params);
        }
    }

    #[test]
    fn findings_from_multiple_rules_accumulate() {
        let document = DocumentTree::new(json!({
            "groups": { "a": {} },
            "markers": { "b": [] },
            "settings": { "zoom": { "min": 5, "max": 2 } }
        }));
        let version = MapVersionInfo::full(SchemaRevision::RECOMMENDED);
        let report = standard_pipeline().run(&version, &document);
        let codes: Vec<&str> = report.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(
            codes,
            vec![
                rules::message::GROUP_EXISTS,
                rules::message::ZOOM_MIN_MAX,
            ]
        );
    }
}
