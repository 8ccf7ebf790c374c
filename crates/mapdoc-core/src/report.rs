//! # Validation Report
//!
//! Append-only collection of findings produced by one validation run. Each
//! entry carries a stable message code (the caller's localization key), the
//! pointer of the offending node, and positional parameters for the message
//! template. Warnings never affect pass/fail.

use serde::Serialize;

use crate::pointer::Pointer;

/// One finding: a message code, the node it concerns, and template parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Stable message code, suitable for localization lookup by the caller.
    pub code: String,
    /// Node the finding concerns.
    pub pointer: Pointer,
    /// Ordered positional parameters for the message template.
    pub params: Vec<String>,
}

impl ReportEntry {
    /// Build an entry.
    pub fn new(code: impl Into<String>, pointer: Pointer, params: Vec<String>) -> Self {
        Self {
            code: code.into(),
            pointer,
            params,
        }
    }
}

/// Findings of one validation run, split into fatal errors and warnings.
///
/// Entries are only ever appended; nothing removes or reorders them. A
/// report passes iff it has no errors — warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<ReportEntry>,
    warnings: Vec<ReportEntry>,
}

impl ValidationReport {
    /// An empty (passing) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fatal error.
    pub fn add_error(
        &mut self,
        code: impl Into<String>,
        pointer: Pointer,
        params: impl IntoIterator<Item = String>,
    ) {
        self.errors
            .push(ReportEntry::new(code, pointer, params.into_iter().collect()));
    }

    /// Append a non-fatal warning.
    pub fn add_warning(
        &mut self,
        code: impl Into<String>,
        pointer: Pointer,
        params: impl IntoIterator<Item = String>,
    ) {
        self.warnings
            .push(ReportEntry::new(code, pointer, params.into_iter().collect()));
    }

    /// Append an already-built error entry.
    pub fn push_error(&mut self, entry: ReportEntry) {
        self.errors.push(entry);
    }

    /// Append an already-built warning entry.
    pub fn push_warning(&mut self, entry: ReportEntry) {
        self.warnings.push(entry);
    }

    /// True iff the run produced no errors. Warnings do not fail a report.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in emission order.
    pub fn errors(&self) -> &[ReportEntry] {
        &self.errors
    }

    /// Warnings in emission order.
    pub fn warnings(&self) -> &[ReportEntry] {
        &self.warnings
    }

    /// Concatenate another report onto this one, own entries first.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Drop errors beyond `limit`, returning how many were discarded.
    ///
    /// Used by the structural phase to bound report size on pathological
    /// documents. Warnings are never truncated.
    pub fn truncate_errors(&mut self, limit: usize) -> usize {
        let excess = self.errors.len().saturating_sub(limit);
        self.errors.truncate(limit);
        excess
    }
}
