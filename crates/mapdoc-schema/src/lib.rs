//! # mapdoc-schema — Structural Validation
//!
//! The first of the two validation phases. Given a document tree and its
//! declared schema revision, this crate checks structural conformance:
//! leaf keywords through the [`KeywordDelegate`] capability, object policy
//! (the non-standard `requires` keyword and `additionalProperties`), and
//! the combinator keywords with their deliberately non-standard
//! error-retention semantics.
//!
//! ## Evaluation Policy
//!
//! `anyOf` keeps the failures of the first alternative that missed a
//! required property and drops the rest of the noise; `allOf` collapses
//! sub-failures into a single synthetic entry; `oneOf` flags ambiguity
//! even when several branches matched cleanly. These choices exist for
//! the quality of editor-facing diagnostics and are pinned by tests —
//! do not "correct" them toward standard JSON Schema.

pub mod delegate;
pub mod evaluator;
pub mod objects;
pub mod registry;
pub mod schema;
pub mod structural;

pub use delegate::{keyword, KeywordDelegate, PrimitiveKeywordChecker};
pub use evaluator::SchemaCombinatorEvaluator;
pub use objects::PropertyDependencyChecker;
pub use registry::{SchemaError, SchemaRegistry, SchemaResolver};
pub use schema::{AdditionalProperties, SchemaNode, TypeConstraint, TypeName};
pub use structural::{message, StructuralValidator, MAX_VALIDATION_ERROR_COUNT};
