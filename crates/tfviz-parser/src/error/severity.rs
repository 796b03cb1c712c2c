//! Severity levels for diagnostics.

use std::fmt;

/// The severity level of a diagnostic.
///
/// Neither level aborts a synthesis pass on its own; severity only decides
/// how a diagnostic is reported and whether `ignore_warnings` hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Something could not be processed and was skipped.
    Error,

    /// Something was processed with degraded information.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }

    /// Tag printed in front of user-facing messages, e.g. `[WARNING]`.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Error => "[ERROR]",
            Severity::Warning => "[WARNING]",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_tags() {
        assert_eq!(Severity::Error.tag(), "[ERROR]");
        assert_eq!(Severity::Warning.tag(), "[WARNING]");
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
