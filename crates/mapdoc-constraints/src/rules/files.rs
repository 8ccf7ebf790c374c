//! File-reference rule backed by the [`FileLookup`] capability.

use mapdoc_core::{DocumentTree, MapVersionInfo, Pointer};
use serde_json::Value;

use crate::capability::FileLookup;
use crate::constraint::{Constraint, ConstraintDescriptor, ReportSink};

use super::{format_names, message, root_object};

/// Every field naming a file must name one that exists.
///
/// Walks group icons, category icon overrides, background images and
/// marker icons/images, and emits one aggregated error listing every
/// missing name. A failing lookup counts as missing (fail-closed) so one
/// broken lookup cannot block unrelated validation.
pub struct RequiredFilesExist {
    lookup: Box<dyn FileLookup>,
}

impl RequiredFilesExist {
    pub fn new(lookup: Box<dyn FileLookup>) -> Self {
        Self { lookup }
    }

    fn exists(&self, name: &str) -> bool {
        match self.lookup.file_exists(name) {
            Ok(exists) => exists,
            Err(error) => {
                tracing::warn!(file = name, %error, "file lookup failed, treating as missing");
                false
            }
        }
    }

    fn check(&self, value: Option<&Value>, missing: &mut Vec<String>) {
        if let Some(Value::String(name)) = value {
            if !self.exists(name) {
                missing.push(name.clone());
            }
        }
    }
}

impl Constraint for RequiredFilesExist {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("required-files-exist")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let root = document.root();
        let mut missing = Vec::new();

        if let Some(groups) = root_object(root, "groups") {
            for group in groups.values() {
                self.check(group.get("icon"), &mut missing);
            }
        }

        if let Some(categories) = root_object(root, "categories") {
            for category in categories.values() {
                self.check(category.get("overrideIcon"), &mut missing);
            }
        }

        match root.get("background") {
            Some(Value::String(name)) => {
                if !self.exists(name) {
                    missing.push(name.clone());
                }
            }
            Some(background) => self.check(background.get("image"), &mut missing),
            None => {}
        }

        if let Some(backgrounds) = root.get("backgrounds").and_then(Value::as_array) {
            for background in backgrounds {
                self.check(background.get("image"), &mut missing);
            }
        }

        if let Some(buckets) = root_object(root, "markers") {
            for markers in buckets.values().filter_map(Value::as_array) {
                for marker in markers {
                    self.check(marker.get("icon"), &mut missing);
                    self.check(marker.get("image"), &mut missing);
                }
            }
        }

        if missing.is_empty() {
            return true;
        }
        sink.emit_error(
            message::REQUIRED_FILE,
            Pointer::root(),
            vec![format_names(&missing)],
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapdoc_core::{SchemaRevision, ValidationReport};
    use serde_json::json;

    struct OnlyThese(Vec<&'static str>);

    impl FileLookup for OnlyThese {
        fn file_exists(
            &self,
            name: &str,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.0.contains(&name))
        }
    }

    struct BrokenLookup;

    impl FileLookup for BrokenLookup {
        fn file_exists(
            &self,
            _name: &str,
        ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
            Err("storage unreachable".into())
        }
    }

    fn run(lookup: Box<dyn FileLookup>, root: serde_json::Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, false);
        let version = MapVersionInfo::full(SchemaRevision::RECOMMENDED);
        RequiredFilesExist::new(lookup).evaluate(&mut sink, &version, &DocumentTree::new(root));
        report
    }

    #[test]
    fn missing_files_aggregate_into_one_error() {
        let report = run(
            Box::new(OnlyThese(vec!["ore.png"])),
            json!({
                "groups": { "ore": { "icon": "ore.png" }, "flora": { "icon": "flora.png" } },
                "background": "plains.png",
                "markers": { "ore": [ { "icon": "pin.png" } ] }
            }),
        );
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].pointer.is_root());
        assert_eq!(report.errors()[0].params, vec!["flora.png, plains.png, pin.png"]);
    }

    #[test]
    fn all_present_passes() {
        let report = run(
            Box::new(OnlyThese(vec!["a.png", "b.png"])),
            json!({
                "background": { "image": "a.png" },
                "categories": { "c": { "overrideIcon": "b.png" } }
            }),
        );
        assert!(report.is_ok());
    }

    #[test]
    fn lookup_failure_counts_as_missing() {
        let report = run(
            Box::new(BrokenLookup),
            json!({ "groups": { "g": { "icon": "g.png" } } }),
        );
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].params, vec!["g.png"]);
    }
}
