//! # mapdoc-core — Foundational Types for the Map-Document Validation Stack
//!
//! Defines the primitives shared by both validation phases: the immutable
//! [`DocumentTree`], RFC 6901 [`Pointer`]s, the append-only
//! [`ValidationReport`], and schema revision / version gating types.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mapdoc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All state is either immutable or confined to one validation call, so
//!   concurrent validations need no locking.

pub mod document;
pub mod pointer;
pub mod report;
pub mod version;

pub use document::DocumentTree;
pub use pointer::{Pointer, PointerParseError, Segment};
pub use report::{ReportEntry, ValidationReport};
pub use version::{MapVersionInfo, SchemaRevision, UnknownRevision};
