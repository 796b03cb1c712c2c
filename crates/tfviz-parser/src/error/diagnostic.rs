//! The core diagnostic type.
//!
//! A [`Diagnostic`] is a single error or warning with an optional error
//! code, the resource it concerns, and help text.

use std::fmt;

use crate::error::{ErrorCode, Severity};

/// A diagnostic message about a declaration or a synthesis step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    subject: Option<String>,
    message: String,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The resource (`kind.name`) or file the diagnostic is about.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            subject: None,
            message: message.into(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[E100]: aws_vpc.main: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        if let Some(subject) = &self.subject {
            write!(f, ": {subject}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.subject().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builders() {
        let diag = Diagnostic::warning("unknown reference")
            .with_code(ErrorCode::E101)
            .with_subject("aws_instance.web")
            .with_help("declare the referenced resource");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.subject(), Some("aws_instance.web"));
        assert_eq!(diag.help(), Some("declare the referenced resource"));
    }

    #[test]
    fn test_diagnostic_display() {
        assert_eq!(Diagnostic::error("boom").to_string(), "error: boom");
        assert_eq!(
            Diagnostic::error("boom").with_code(ErrorCode::E300).to_string(),
            "error[E300]: boom"
        );
        assert_eq!(
            Diagnostic::warning("boom")
                .with_subject("aws_vpc.main")
                .to_string(),
            "warning: aws_vpc.main: boom"
        );
    }
}
