//! Diagnostic system for declaration loading and decoding.
//!
//! This module provides:
//! - Error codes for documentation and searchability
//! - Severity levels
//! - A diagnostic collector for accumulating non-fatal findings
//! - [`ParseError`] for fatal loading failures
//!
//! # Overview
//!
//! Loading a module is the only fatal phase: unreadable input or invalid HCL
//! syntax aborts with a [`ParseError`]. Every later phase (decoding resource
//! bodies, placing nodes, resolving links) reports [`Diagnostic`]s into a
//! [`DiagnosticCollector`] and carries on with whatever could be decoded.
//!
//! # Example
//!
//! ```
//! # use tfviz_parser::error::{Diagnostic, ErrorCode};
//! let diag = Diagnostic::warning("missing required argument `cidr_block`")
//!     .with_code(ErrorCode::E100)
//!     .with_subject("aws_subnet.private")
//!     .with_help("add a `cidr_block` argument to the resource");
//!
//! assert_eq!(
//!     diag.to_string(),
//!     "warning[E100]: aws_subnet.private: missing required argument `cidr_block`"
//! );
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::{ParseError, Result};
pub use severity::Severity;
