//! # Rule Catalog
//!
//! The concrete semantic rules. Each rule guards against absent or
//! mistyped fields by treating them as "not applicable" — shape
//! complaints belong to the structural phase, and the pipeline may be
//! run defensively over trees that failed it.

use mapdoc_core::Pointer;
use serde_json::Value;

use crate::capability::FileLookup;
use crate::config::PipelineConfig;
use crate::constraint::Constraint;

mod associations;
mod files;
mod markers;
mod settings;

pub use associations::{
    AssociationGroupExists, BackgroundLayerExists, LayerIdNoOverlap,
};
pub use files::RequiredFilesExist;
pub use markers::MarkerUidNoOverlap;
pub use settings::{
    CollectibleDependentFields, DeprecatedFields, SearchDependentFields, ZoomMinMax,
};

/// Localization message codes emitted by the catalog.
pub mod message {
    pub const GROUP_EXISTS: &str = "validate-constraint-groupexists";
    pub const BG_LAYER_EXISTS: &str = "validate-constraint-bglayerexists";
    pub const NOT_COLLECTIBLE: &str = "validate-constraint-notcollectible";
    pub const DEPRECATED_NO_ALT: &str = "validate-constraint-deprecated-noalt";
    pub const DEPRECATED_INSTEAD: &str = "validate-constraint-deprecated-instead";
    pub const LAYER_DECL_OVERLAP: &str = "validate-constraint-layerdecloverlap";
    pub const ASSOC_NON_UNIQUE: &str = "validate-constraint-assocnonuniqoverlap";
    pub const ASSOC_GROUP_OVERLAP: &str = "validate-constraint-assocgroupoverlap";
    pub const MARKER_UID_OVERLAP: &str = "validate-constraint-muidoverlap";
    pub const REQUIRED_FILE: &str = "validate-constraint-requiredfile";
    pub const SEARCH_DISABLED: &str = "validate-constraint-searchdisabled";
    pub const ZOOM_MIN_MAX: &str = "validate-constraint-zoomminmax";
}

/// The standard nine-rule catalog, in registration order.
pub fn standard_catalog(
    config: PipelineConfig,
    file_lookup: Box<dyn FileLookup>,
) -> Vec<Box<dyn Constraint>> {
    vec![
        Box::new(AssociationGroupExists),
        Box::new(BackgroundLayerExists),
        Box::new(CollectibleDependentFields),
        Box::new(DeprecatedFields),
        Box::new(LayerIdNoOverlap),
        Box::new(MarkerUidNoOverlap),
        Box::new(RequiredFilesExist::new(file_lookup)),
        Box::new(SearchDependentFields),
        Box::new(ZoomMinMax::new(config)),
    ]
}

// ---- shared readers ----

/// Object-valued field of the document root, if present and an object.
fn root_object<'a>(root: &'a Value, field: &str) -> Option<&'a serde_json::Map<String, Value>> {
    root.get(field)?.as_object()
}

/// Pointer to a marker bucket, `/markers/<association string>`.
fn bucket_pointer(association: &str) -> Pointer {
    Pointer::root().child_key("markers").child_key(association)
}

/// The group id named by an association string: everything before the
/// first space.
fn group_token(association: &str) -> &str {
    association.split(' ').next().unwrap_or(association)
}

/// Join referenced names for a single message parameter.
fn format_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field is present and neither `false` nor `null`.
fn is_truthy(object: &serde_json::Map<String, Value>, field: &str) -> bool {
    match object.get(field) {
        None | Some(Value::Bool(false)) | Some(Value::Null) => false,
        Some(_) => true,
    }
}
