//! Rules over association strings: the space-separated layer tokens
//! keying each marker bucket.

use mapdoc_core::{DocumentTree, MapVersionInfo, Pointer};
use serde_json::Value;

use crate::constraint::{Constraint, ConstraintDescriptor, ReportSink};

use super::{bucket_pointer, format_names, group_token, message, root_object};

/// Every bucket's group token must name a declared group.
///
/// Permissive-class: a fragment may associate markers with groups that
/// only exist in the including map.
pub struct AssociationGroupExists;

impl Constraint for AssociationGroupExists {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("group-exists")
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
        let groups = root_object(document.root(), "groups");

        let mut passed = true;
        for association in buckets.keys() {
            let group = group_token(association);
            let declared = groups.is_some_and(|g| g.contains_key(group));
            if !declared {
                sink.emit_error_permissive(
                    message::GROUP_EXISTS,
                    bucket_pointer(association),
                    vec![group.to_owned()],
                );
                passed = false;
            }
        }
        passed
    }
}

/// Every `bg:<layer>` token must match a layer produced by the declared
/// background(s).
pub struct BackgroundLayerExists;

impl BackgroundLayerExists {
    /// Layers the background declarations produce. A string background or
    /// one without an `associatedLayer` yields `bg:0`; entries of a
    /// `backgrounds` array default to their index.
    fn valid_layers(root: &Value) -> Vec<String> {
        match root.get("background") {
            Some(Value::String(_)) => return vec!["bg:0".to_owned()],
            Some(background) => {
                let layer =
                    Self::layer_name(background.get("associatedLayer")).unwrap_or_else(|| "0".into());
                return vec![format!("bg:{layer}")];
            }
            None => {}
        }
        let Some(backgrounds) = root.get("backgrounds").and_then(Value::as_array) else {
            return vec![];
        };
        backgrounds
            .iter()
            .enumerate()
            .map(|(index, background)| {
                match Self::layer_name(background.get("associatedLayer")) {
                    Some(layer) => format!("bg:{layer}"),
                    None => format!("bg:{index}"),
                }
            })
            .collect()
    }

    fn layer_name(value: Option<&Value>) -> Option<String> {
        match value {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        }
    }
}

impl Constraint for BackgroundLayerExists {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("background-layer-exists")
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
        let valid = Self::valid_layers(document.root());

        let mut passed = true;
        for association in buckets.keys() {
            let bad: Vec<&str> = association
                .split(' ')
                .filter(|token| token.starts_with("bg:"))
                .filter(|token| !valid.iter().any(|v| v == token))
                .collect();
            if !bad.is_empty() {
                sink.emit_error_permissive(
                    message::BG_LAYER_EXISTS,
                    bucket_pointer(association),
                    vec![format_names(&bad)],
                );
                passed = false;
            }
        }
        passed
    }
}

/// Three overlap checks on the layer namespace: a group id colliding
/// with a category id, duplicate tokens within one association string,
/// and an association string naming more than one group.
pub struct LayerIdNoOverlap;

impl Constraint for LayerIdNoOverlap {
    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor::new("layer-id-no-overlap")
    }

    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        _version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool {
        let root = document.root();
        let mut passed = true;

        if let (Some(groups), Some(categories)) =
            (root_object(root, "groups"), root_object(root, "categories"))
        {
            for id in groups.keys().filter(|id| categories.contains_key(*id)) {
                sink.emit_error(
                    message::LAYER_DECL_OVERLAP,
                    Pointer::root().child_key("groups").child_key(id),
                    vec![format!("/categories/{id}")],
                );
                passed = false;
            }
        }

        if let Some(buckets) = root_object(root, "markers") {
            let groups = root_object(root, "groups");
            for association in buckets.keys() {
                let tokens: Vec<&str> = association.split(' ').collect();

                let mut seen = std::collections::HashSet::new();
                if !tokens.iter().all(|token| seen.insert(*token)) {
                    sink.emit_error(message::ASSOC_NON_UNIQUE, bucket_pointer(association), vec![]);
                    passed = false;
                }

                let named_groups: Vec<&str> = tokens
                    .iter()
                    .copied()
                    .filter(|token| groups.is_some_and(|g| g.contains_key(*token)))
                    .collect();
                if named_groups.len() > 1 {
                    sink.emit_error(
                        message::ASSOC_GROUP_OVERLAP,
                        bucket_pointer(association),
                        vec![format_names(&named_groups)],
                    );
                    passed = false;
                }
            }
        }

        passed
    }
}
