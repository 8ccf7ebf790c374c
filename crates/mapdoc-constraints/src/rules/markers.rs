//! Marker identity rules.

use mapdoc_core::{DocumentTree, MapVersionInfo};
use serde_json::Value;

use crate::constraint::{Constraint, ConstraintDescriptor, ReportSink};

use super::{bucket_pointer, message, root_object};

/// Explicit marker `id`s must be unique across the whole document.
///
/// The first occurrence of an id is never flagged; each later occurrence
/// gets its own error at its own pointer. String and numeric ids live in
/// separate namespaces, so `"1"` does not collide with `1`.
pub struct MarkerUidNoOverlap;

impl MarkerUidNoOverlap {
    fn uid(marker: &Value) -> Option<(String, String)> {
        match marker.get("id") {
            Some(Value::String(id)) => Some((format!("s:{id}"), id.clone())),
            Some(Value::Number(id)) => Some((format!("n:{id}"), id.to_string())),
            _ => None,
        }
    }
}

impl Constraint for MarkerUidNoOverlap {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("marker-uid-no-overlap")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let Some(buckets) = root_object(document.root(), "markers") else {
            return true;
        };

        let mut passed = true;
        let mut seen = std::collections::HashSet::new();
        for (association, markers) in buckets {
            let Some(markers) = markers.as_array() else {
                continue;
            };
            for (index, marker) in markers.iter().enumerate() {
                let Some((key, display)) = Self::uid(marker) else {
                    continue;
                };
                if !seen.insert(key) {
                    sink.emit_error(
                        message::MARKER_UID_OVERLAP,
                        bucket_pointer(association).child_index(index).child_key("id"),
                        vec![display],
                    );
                    passed = false;
                }
            }
        }
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapdoc_core::{SchemaRevision, ValidationReport};
    use serde_json::json;

    fn run(root: serde_json::Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, false);
        let version = MapVersionInfo::full(SchemaRevision::RECOMMENDED);
        MarkerUidNoOverlap.evaluate(&mut sink, &version, &DocumentTree::new(root));
        report
    }

    #[test]
    fn only_later_occurrences_are_flagged() {
        let report = run(json!({
            "markers": {
                "a": [ { "id": "x" }, { "lat": 1.0 } ],
                "b": [ { "id": "x" } ]
            }
        }));
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].pointer.to_string(), "/markers/b/0/id");
        assert_eq!(report.errors()[0].params, vec!["x"]);
    }

    #[test]
    fn unique_ids_pass() {
        let report = run(json!({
            "markers": { "a": [ { "id": "x" }, { "id": "y" } ] }
        }));
        assert!(report.is_ok());
    }

    #[test]
    fn string_and_number_ids_do_not_collide() {
        let report = run(json!({
            "markers": { "a": [ { "id": "1" }, { "id": 1 } ] }
        }));
        assert!(report.is_ok());
    }

    #[test]
    fn third_occurrence_flagged_too() {
        let report = run(json!({
            "markers": { "a": [ { "id": 7 }, { "id": 7 }, { "id": 7 } ] }
        }));
        assert_eq!(report.errors().len(), 2);
        assert_eq!(report.errors()[0].pointer.to_string(), "/markers/a/1/id");
        assert_eq!(report.errors()[1].pointer.to_string(), "/markers/a/2/id");
    }
}
