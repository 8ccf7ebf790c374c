//! Rules over top-level settings and per-group feature flags.

use mapdoc_core::{DocumentTree, MapVersionInfo, Pointer, SchemaRevision};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::constraint::{Constraint, ConstraintDescriptor, ReportSink};

use super::{format_names, is_truthy, message, root_object};

/// Declared zoom `max` must not be below `min`, with renderer defaults
/// substituted for absent bounds.
pub struct ZoomMinMax {
    config: PipelineConfig,
}

impl ZoomMinMax {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }
}

impl Constraint for ZoomMinMax {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("zoom-min-max")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let Some(zoom) = document
            .root()
            .get("settings")
            .and_then(|settings| settings.get("zoom"))
        else {
            return true;
        };

        let min = zoom
            .get("min")
            .and_then(Value::as_f64)
            .unwrap_or(self.config.default_zoom_min);
        let max = zoom
            .get("max")
            .and_then(Value::as_f64)
            .unwrap_or(self.config.default_zoom_max);

        if max < min {
            sink.emit_error(
                message::ZOOM_MIN_MAX,
                Pointer::root()
                    .child_key("settings")
                    .child_key("zoom")
                    .child_key("max"),
                vec!["/settings/zoom/min".to_owned()],
            );
            return false;
        }
        true
    }
}

/// Search-scoped group fields are meaningless while the map's search
/// feature is off.
pub struct SearchDependentFields;

const SEARCH_FIELDS: &[&str] = &["canSearchFor"];

impl Constraint for SearchDependentFields {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("search-dependent-fields")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let Some(settings) = root_object(document.root(), "settings") else {
            return true;
        };
        if is_truthy(settings, "enableSearch") {
            return true;
        }

        if let Some(groups) = root_object(document.root(), "groups") {
            for (id, group) in groups {
                let Some(group) = group.as_object() else {
                    continue;
                };
                let declared: Vec<&str> = SEARCH_FIELDS
                    .iter()
                    .copied()
                    .filter(|field| group.contains_key(*field))
                    .collect();
                if !declared.is_empty() {
                    sink.emit_warning(
                        message::SEARCH_DISABLED,
                        Pointer::root().child_key("groups").child_key(id),
                        vec![format_names(&declared)],
                    );
                }
            }
        }
        true
    }
}

/// Checklist-scoped group fields require the group to be collectible.
pub struct CollectibleDependentFields;

const COLLECTIBLE_FIELDS: &[&str] = &["autoNumberInChecklist"];

impl Constraint for CollectibleDependentFields {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("collectible-dependent-fields")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let Some(groups) = root_object(document.root(), "groups") else {
            return true;
        };
        for (id, group) in groups {
            let Some(group) = group.as_object() else {
                continue;
            };
            if is_truthy(group, "isCollectible") {
                continue;
            }
            let declared: Vec<&str> = COLLECTIBLE_FIELDS
                .iter()
                .copied()
                .filter(|field| group.contains_key(*field))
                .collect();
            if !declared.is_empty() {
                sink.emit_warning(
                    message::NOT_COLLECTIBLE,
                    Pointer::root().child_key("groups").child_key(id),
                    vec![format_names(&declared)],
                );
            }
        }
        true
    }
}

/// One retired field with its retirement window and optional
/// replacement.
struct Deprecation {
    path: &'static [&'static str],
    since: SchemaRevision,
    removed_in: &'static str,
    replacement: Option<&'static str>,
}

const DEPRECATIONS: &[Deprecation] = &[Deprecation {
    path: &["settings", "leaflet"],
    since: SchemaRevision::V17,
    removed_in: "v18",
    replacement: None,
}];

/// Warn about fields retired between two revisions, gated on the
/// document declaring a revision inside the retirement window.
pub struct DeprecatedFields;

impl Constraint for DeprecatedFields {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("deprecated-fields")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        for deprecation in DEPRECATIONS {
            if version.revision < deprecation.since {
                continue;
            }
            let mut pointer = Pointer::root();
            let mut node = Some(document.root());
            for segment in deprecation.path {
                pointer = pointer.child_key(*segment);
                node = node.and_then(|value| value.get(*segment));
            }
            if node.is_none() {
                continue;
            }
            let mut params = vec![
                deprecation.since.as_str().to_owned(),
                deprecation.removed_in.to_owned(),
            ];
            let code = match deprecation.replacement {
                Some(replacement) => {
                    params.push(replacement.to_owned());
                    message::DEPRECATED_INSTEAD
                }
                None => message::DEPRECATED_NO_ALT,
            };
            sink.emit_warning(code, pointer, params);
        }
        true
    }
}
