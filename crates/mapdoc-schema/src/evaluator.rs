//! # Schema Combinator Evaluator
//!
//! Evaluates `allOf` / `anyOf` / `oneOf` with the error-retention policy
//! the map editor's diagnostics depend on. The semantics here are
//! deliberately non-standard:
//!
//! - `allOf` collapses all sub-failures into one synthetic `allOf` entry.
//! - `anyOf` keeps the failures of the first alternative that failed on a
//!   missing required property, on the theory that such a branch is the one
//!   the author intended; other alternatives' noise is dropped.
//! - `oneOf` reports a synthetic `oneOf` entry even when several branches
//!   matched cleanly (the ambiguity itself is the defect).
//!
//! Leaf keywords are delegated through [`KeywordDelegate`]; this module
//! owns recursion into `properties` / `items` and the combinator policy.

use mapdoc_core::{Pointer, ReportEntry};
use serde_json::Value;

use crate::delegate::{keyword, KeywordDelegate};
use crate::objects::PropertyDependencyChecker;
use crate::schema::SchemaNode;

/// Evaluates one document node against one schema node, producing the
/// failures of that attempt. Stateless apart from the borrowed delegate;
/// safe to share across concurrent validations.
pub struct SchemaCombinatorEvaluator<'d> {
    delegate: &'d dyn KeywordDelegate,
}

impl<'d> SchemaCombinatorEvaluator<'d> {
    /// Build an evaluator over a leaf-keyword delegate.
    pub fn new(delegate: &'d dyn KeywordDelegate) -> Self {
        Self { delegate }
    }

    /// Validate `node` against `schema`, returning every failure of this
    /// attempt. An empty list means the node matched.
    pub fn evaluate(&self, node: &Value, schema: &SchemaNode, scope: &Pointer) -> Vec<ReportEntry> {
        let mut failures = self.delegate.check(node, schema, scope);

        if let Value::Object(members) = node {
            PropertyDependencyChecker::new(self).check(members, schema, scope, &mut failures);
        }

        if let (Value::Array(items), Some(item_schema)) = (node, &schema.items) {
            for (index, item) in items.iter().enumerate() {
                failures.extend(self.evaluate(item, item_schema, &scope.child_index(index)));
            }
        }

        if !schema.all_of.is_empty() {
            failures.extend(self.evaluate_all_of(node, &schema.all_of, scope));
        }
        if !schema.any_of.is_empty() {
            failures.extend(self.evaluate_any_of(node, &schema.any_of, scope));
        }
        if !schema.one_of.is_empty() {
            failures.extend(self.evaluate_one_of(node, &schema.one_of, scope));
        }

        failures
    }

    /// `allOf`: every subschema must match. Sub-failures are not retained;
    /// any failing subschema yields exactly one synthetic `allOf` entry.
    fn evaluate_all_of(
        &self,
        node: &Value,
        subschemas: &[SchemaNode],
        scope: &Pointer,
    ) -> Vec<ReportEntry> {
        let any_failed = subschemas
            .iter()
            .any(|sub| !self.evaluate(node, sub, scope).is_empty());
        if any_failed {
            vec![ReportEntry::new(keyword::ALL_OF, scope.clone(), vec![])]
        } else {
            vec![]
        }
    }

    /// `anyOf`: first clean match wins and discards everything accumulated.
    ///
    /// While no attempt has failed on a missing required property, failing
    /// attempts append their failures. The first attempt containing a
    /// `required` failure *replaces* the accumulation with exactly its own
    /// failures and freezes it — later attempts contribute nothing. If no
    /// attempt succeeds, the retained set is emitted plus one synthetic
    /// `anyOf` entry.
    fn evaluate_any_of(
        &self,
        node: &Value,
        subschemas: &[SchemaNode],
        scope: &Pointer,
    ) -> Vec<ReportEntry> {
        let mut accumulated: Vec<ReportEntry> = Vec::new();
        let mut discard = true;

        for sub in subschemas {
            let attempt = self.evaluate(node, sub, scope);
            if attempt.is_empty() {
                return vec![];
            }
            if discard {
                if attempt.iter().any(|f| f.code == keyword::REQUIRED) {
                    accumulated = attempt;
                    discard = false;
                } else {
                    accumulated.extend(attempt);
                }
            }
        }

        accumulated.push(ReportEntry::new(keyword::ANY_OF, scope.clone(), vec![]));
        accumulated
    }

    /// `oneOf`: all subschemas are attempted (no short-circuit) and exactly
    /// one must match. On a miscount, the combined failures of every
    /// attempt are emitted plus one synthetic `oneOf` entry — present even
    /// when the miscount came from *multiple clean matches*.
    fn evaluate_one_of(
        &self,
        node: &Value,
        subschemas: &[SchemaNode],
        scope: &Pointer,
    ) -> Vec<ReportEntry> {
        let mut combined: Vec<ReportEntry> = Vec::new();
        let mut matched = 0usize;

        for sub in subschemas {
            let attempt = self.evaluate(node, sub, scope);
            if attempt.is_empty() {
                matched += 1;
            }
            combined.extend(attempt);
        }

        if matched == 1 {
            return vec![];
        }
        combined.push(ReportEntry::new(keyword::ONE_OF, scope.clone(), vec![]));
        combined
    }
}
