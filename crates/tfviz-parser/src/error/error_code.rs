//! Error codes for the tfviz diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Loading errors
//! - `E1xx` - Decoding errors
//! - `E2xx` - Placement errors
//! - `E3xx` - Link resolution errors
//! - `E4xx` - Graph mutation errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Loading Errors (E0xx)
    // =========================================================================
    /// The input path could not be read.
    E001,

    /// A file is not valid HCL.
    E002,

    /// A directory contains no `.tf` file.
    E003,

    /// A file declares no managed resource.
    E004,

    /// A `resource`, `data` or `variable` block has the wrong number of labels.
    E005,

    /// A variable definitions file could not be loaded.
    E006,

    // =========================================================================
    // Decoding Errors (E1xx)
    // =========================================================================
    /// A required argument is missing.
    E100,

    /// An expression could not be evaluated, usually an unknown reference.
    E101,

    /// An argument has a value of the wrong type.
    E102,

    // =========================================================================
    // Placement Errors (E2xx)
    // =========================================================================
    /// A containment reference does not resolve to a declared container.
    ///
    /// The resource is placed in the default container of the same tier.
    E200,

    /// A database subnet group does not resolve to a declared subnetwork.
    E201,

    // =========================================================================
    // Link Resolution Errors (E3xx)
    // =========================================================================
    /// A rule's CIDR literal is not a valid IP network.
    E300,

    /// A declared network or subnetwork has an invalid CIDR block.
    E301,

    // =========================================================================
    // Graph Errors (E4xx)
    // =========================================================================
    /// A graph mutation was rejected.
    E400,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E400 => "E400",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unreadable input",
            ErrorCode::E002 => "invalid HCL syntax",
            ErrorCode::E003 => "no configuration files",
            ErrorCode::E004 => "no managed resources",
            ErrorCode::E005 => "malformed block labels",
            ErrorCode::E006 => "invalid variable definitions file",
            ErrorCode::E100 => "missing required argument",
            ErrorCode::E101 => "unresolvable expression",
            ErrorCode::E102 => "type mismatch",
            ErrorCode::E200 => "unresolved container reference",
            ErrorCode::E201 => "unresolved database subnet group",
            ErrorCode::E300 => "invalid CIDR literal",
            ErrorCode::E301 => "invalid container CIDR block",
            ErrorCode::E400 => "graph mutation rejected",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
