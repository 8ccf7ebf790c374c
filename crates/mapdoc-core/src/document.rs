//! # Document Tree
//!
//! Immutable view over one parsed map document. The tree owns the parsed
//! value for the duration of a validation call and is never mutated by any
//! validator or constraint.
//!
//! Object member order is preserved by `serde_json`'s `preserve_order`
//! feature and is observable: constraints iterate marker buckets and group
//! declarations in document order, so report entries come out in a stable,
//! author-visible order.

use serde_json::Value;

use crate::pointer::Pointer;

/// Immutable, pointer-addressable view over a parsed map document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTree {
    root: Value,
}

impl DocumentTree {
    /// Wrap a parsed document.
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from JSON source.
    pub fn from_source(source: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(source)?))
    }

    /// The root node.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Resolve a pointer against this tree.
    pub fn resolve(&self, pointer: &Pointer) -> Option<&Value> {
        pointer.resolve(&self.root)
    }
}

impl From<Value> for DocumentTree {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_pointers() {
        let tree = DocumentTree::new(json!({ "settings": { "zoom": { "min": 2 } } }));
        let ptr = Pointer::root()
            .child_key("settings")
            .child_key("zoom")
            .child_key("min");
        assert_eq!(tree.resolve(&ptr), Some(&json!(2)));
    }

    #[test]
    fn object_order_is_preserved() {
        let tree = DocumentTree::from_source(r#"{ "zebra": 1, "apple": 2, "mango": 3 }"#).unwrap();
        let keys: Vec<&String> = tree.root().as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn from_source_rejects_bad_json() {
        assert!(DocumentTree::from_source("{ not json").is_err());
    }
}
