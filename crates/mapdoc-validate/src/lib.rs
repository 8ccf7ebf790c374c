//! # mapdoc-validate — Validation Facade
//!
//! Ties the two phases together for callers holding raw map source:
//! parse, detect the declared schema revision from `$schema`, run the
//! structural phase, and run the semantic constraint pipeline once the
//! tree is structurally sound. Each phase's findings stay separately
//! inspectable in the [`ValidationOutcome`]; `merged()` folds them for
//! callers that only want one report.

pub mod validator;

pub use validator::{message, MapDocumentValidator, ValidationOutcome};
