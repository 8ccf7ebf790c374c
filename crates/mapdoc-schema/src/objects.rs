//! # Property-Dependency Checks
//!
//! Object-node policy the combinator evaluator delegates to: the
//! non-standard `requires` keyword (a declared property, when present,
//! demands a named sibling) and the `additionalProperties` policy for keys
//! the schema does not declare. Declared property values recurse through
//! the full evaluator so nested combinators apply.

use mapdoc_core::{Pointer, ReportEntry};
use serde_json::{Map, Value};

use crate::delegate::keyword;
use crate::evaluator::SchemaCombinatorEvaluator;
use crate::schema::{AdditionalProperties, SchemaNode};

/// Checks one object node's members against the declaring schema.
pub struct PropertyDependencyChecker<'e, 'd> {
    evaluator: &'e SchemaCombinatorEvaluator<'d>,
}

impl<'e, 'd> PropertyDependencyChecker<'e, 'd> {
    /// Build a checker recursing through `evaluator`.
    pub fn new(evaluator: &'e SchemaCombinatorEvaluator<'d>) -> Self {
        Self { evaluator }
    }

    /// Check every member of `members`, appending failures to `failures`.
    ///
    /// Members are visited in document order, so failure order is stable
    /// and author-visible.
    pub fn check(
        &self,
        members: &Map<String, Value>,
        schema: &SchemaNode,
        scope: &Pointer,
        failures: &mut Vec<ReportEntry>,
    ) {
        for (name, value) in members {
            match schema.properties.get(name) {
                Some(definition) => {
                    // Presence of this property may require a sibling.
                    if let Some(other) = &definition.requires {
                        if !members.contains_key(other) {
                            failures.push(ReportEntry::new(
                                keyword::REQUIRES,
                                scope.clone(),
                                vec![name.clone(), other.clone()],
                            ));
                        }
                    }
                    failures.extend(self.evaluator.evaluate(
                        value,
                        definition,
                        &scope.child_key(name),
                    ));
                }
                None => self.check_undeclared(name, value, schema, scope, failures),
            }
        }
    }

    fn check_undeclared(
        &self,
        name: &str,
        value: &Value,
        schema: &SchemaNode,
        scope: &Pointer,
        failures: &mut Vec<ReportEntry>,
    ) {
        match &schema.additional_properties {
            // Absent or `true`: undeclared keys are permitted as-is.
            None | Some(AdditionalProperties::Policy(true)) => {}
            Some(AdditionalProperties::Policy(false)) => {
                failures.push(ReportEntry::new(
                    keyword::ADDITIONAL_PROP,
                    scope.clone(),
                    vec![name.to_string()],
                ));
            }
            Some(AdditionalProperties::Schema(policy)) => {
                failures.extend(
                    self.evaluator
                        .evaluate(value, policy, &scope.child_key(name)),
                );
            }
        }
    }
}
