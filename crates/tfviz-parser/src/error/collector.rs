//! Collector for accumulating diagnostics during a processing phase.

use crate::error::{Diagnostic, ParseError, Severity};

/// Accumulates diagnostics so a phase can report every problem it meets
/// instead of stopping at the first one.
///
/// # Example
///
/// ```
/// # use tfviz_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// let mut collector = DiagnosticCollector::new();
/// collector.emit(Diagnostic::warning("missing `cidr_block`").with_code(ErrorCode::E100));
/// collector.emit(Diagnostic::error("invalid CIDR `10.0.0/8`").with_code(ErrorCode::E300));
///
/// assert_eq!(collector.len(), 2);
/// assert!(collector.has_errors());
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Moves every diagnostic of `other` into this collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.has_errors |= other.has_errors;
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics of the given severity, in emission order.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diag| diag.severity() == severity)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish a fatal phase.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - If there are no errors, returns the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
