//! # Constraint Trait & Report Sink
//!
//! A constraint is a pure reader over the document tree expressing a
//! cross-field invariant the schema language cannot. Constraints never
//! mutate the document and must treat absent or mistyped fields as "not
//! applicable" rather than failing — the structural phase owns shape
//! complaints.
//!
//! The boolean returned by [`Constraint::evaluate`] is diagnostic only;
//! the authoritative pass/fail signal is `ValidationReport::is_ok()` after
//! the whole pipeline has run. A constraint may emit only warnings and
//! still return `false`, or the reverse.

use mapdoc_core::{DocumentTree, MapVersionInfo, Pointer, ValidationReport};

/// Identity and ordering requirements of one constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintDescriptor {
    /// Stable identifier, unique within a catalog.
    pub id: &'static str,
    /// Ids of constraints that must run before this one. Currently empty
    /// for every catalog rule; the pipeline honors it regardless.
    pub depends_on: &'static [&'static str],
}

impl ConstraintDescriptor {
    /// Descriptor with no dependencies.
    pub const fn new(id: &'static str) -> Self {
        Self { id, depends_on: &[] }
    }
}

/// Write-side view of the shared report handed to constraints.
///
/// Wraps the report with the permissive flag so fragment validation can
/// downgrade selected errors to warnings without each rule re-deriving
/// the policy.
pub struct ReportSink<'a> {
    report: &'a mut ValidationReport,
    permissive: bool,
}

impl<'a> ReportSink<'a> {
    /// Wrap a report. `permissive` downgrades permissive-class errors.
    pub fn new(report: &'a mut ValidationReport, permissive: bool) -> Self {
        Self { report, permissive }
    }

    /// Emit a fatal error.
    pub fn emit_error(&mut self, code: &str, pointer: Pointer, params: Vec<String>) {
        self.report.add_error(code, pointer, params);
    }

    /// Emit a non-fatal warning.
    pub fn emit_warning(&mut self, code: &str, pointer: Pointer, params: Vec<String>) {
        self.report.add_warning(code, pointer, params);
    }

    /// Emit an error, downgraded to a warning under permissive validation.
    ///
    /// Used for findings that a fragment is allowed to leave unresolved
    /// (e.g. references satisfied only once the fragment is included into
    /// a full map).
    pub fn emit_error_permissive(&mut self, code: &str, pointer: Pointer, params: Vec<String>) {
        if self.permissive {
            self.report.add_warning(code, pointer, params);
        } else {
            self.report.add_error(code, pointer, params);
        }
    }
}

/// A semantic validation rule.
///
/// Implementations are stateless readers; one instance is shared across
/// every pipeline run and across threads.
pub trait Constraint: Send + Sync {
    /// Identity and declared dependencies.
    fn descriptor(&self) -> ConstraintDescriptor;

    /// Evaluate the rule, appending findings to `sink`.
    ///
    /// Returns whether the rule passed, for diagnostics and tests only —
    /// callers must rely on the report.
    fn evaluate(
        &self,
        sink: &mut ReportSink<'_>,
        version: &MapVersionInfo,
        document: &DocumentTree,
    ) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_sink_downgrades_to_warning() {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, true);
        sink.emit_error_permissive("code", Pointer::root(), vec![]);
        assert!(report.is_ok());
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn strict_sink_keeps_errors_fatal() {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, false);
        sink.emit_error_permissive("code", Pointer::root(), vec![]);
        assert!(!report.is_ok());
    }

    #[test]
    fn plain_error_ignores_permissive_flag() {
        let mut report = ValidationReport::new();
        let mut sink = ReportSink::new(&mut report, true);
        sink.emit_error("code", Pointer::root(), vec![]);
        assert!(!report.is_ok());
    }
}
