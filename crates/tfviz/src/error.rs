//! Error types for tfviz operations.
//!
//! [`TfvizError`] covers the setup failures that abort a run. Problems met
//! while synthesizing the topology are diagnostics, not errors, and never
//! reach this type.

use std::{io, path::PathBuf};

use thiserror::Error;

use tfviz_parser::error::ParseError;

/// The main error type for tfviz operations.
#[derive(Debug, Error)]
pub enum TfvizError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Loading the configuration module failed.
    #[error("{err}")]
    Parse { err: ParseError, path: PathBuf },

    #[error("output file `{}` already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for TfvizError {
    fn from(error: crate::export::Error) -> Self {
        match error {
            crate::export::Error::OutputExists(path) => Self::OutputExists(path),
            other => Self::Export(Box::new(other)),
        }
    }
}

impl TfvizError {
    /// Create a new `Parse` error for the module loaded from `path`.
    pub fn new_parse_error(err: ParseError, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            err,
            path: path.into(),
        }
    }
}
