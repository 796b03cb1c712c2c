//! Export of synthesized topologies.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! Configuration files
//!     ↓ load
//! Module
//!     ↓ decode
//! Resource store
//!     ↓ synthesize
//! Clustered graph
//!     ↓ export (this module)
//! Output file
//! ```
//!
//! # Available Backends
//!
//! - [`dot`]: Graphviz output, as DOT text or rendered by the `dot` executable

/// Graphviz export backend.
pub mod dot;

use std::{fmt, path::PathBuf, str::FromStr};

use tfviz_core::graph::Graph;

/// Abstraction for graph export backends.
pub trait Exporter {
    /// Exports `graph` to the backend's output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputExists`] if the output would overwrite a file,
    /// [`Error::Render`] if rendering fails and [`Error::Io`] if writing fails.
    fn export_graph(&mut self, graph: &Graph) -> Result<(), Error>;
}

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// DOT text, written without invoking graphviz.
    Dot,
    #[default]
    Png,
    Svg,
    Pdf,
    Jpg,
    Gif,
}

impl Format {
    /// File extension of the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Dot => "dot",
            Format::Png => "png",
            Format::Svg => "svg",
            Format::Pdf => "pdf",
            Format::Jpg => "jpg",
            Format::Gif => "gif",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(Format::Dot),
            "png" => Ok(Format::Png),
            "svg" => Ok(Format::Svg),
            "pdf" => Ok(Format::Pdf),
            "jpg" | "jpeg" => Ok(Format::Jpg),
            "gif" => Ok(Format::Gif),
            other => Err(format!(
                "unsupported format `{other}` (expected dot, png, svg, pdf, jpg or gif)"
            )),
        }
    }
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// The output path already exists.
    OutputExists(PathBuf),
    /// A rendering failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputExists(path) => write!(f, "output file `{}` already exists", path.display()),
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
