//! # tfviz Parser
//!
//! Loads Terraform configuration modules and decodes resource bodies into
//! typed records.
//!
//! Loading is the only fatal step: unreadable input, invalid HCL or a
//! configuration without managed resources abort with a
//! [`ParseError`](error::ParseError). Decoding ([`decode`]) never fails and
//! reports problems as [`Diagnostic`](error::Diagnostic)s instead.
//!
//! ## Usage
//!
//! ```
//! # use tfviz_parser::{parse_module, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let module = parse_module(r#"
//!         resource "aws_vpc" "main" {
//!           cidr_block = "10.0.0.0/16"
//!         }
//!     "#)?;
//!
//!     assert_eq!(module.resources()[0].address().qualified(), "aws_vpc.main");
//!     Ok(())
//! }
//! ```

pub mod decode;
pub mod error;
mod loader;
mod module;

use std::path::Path;

pub use hcl;
pub use module::{DataSource, Local, Module, ResourceBlock, Variable};

use error::Result;

/// Loads the configuration module at `path`.
///
/// `path` is either a single configuration file or a directory, in which
/// case every `*.tf` file of the directory is loaded in lexical order.
/// Variable definitions from `terraform.tfvars` and then `*.auto.tfvars` in
/// the module directory override variable defaults.
///
/// # Errors
///
/// Fails when the input cannot be read, is not valid HCL, a directory holds
/// no `.tf` file, or the configuration declares no managed resource.
pub fn load_module(path: impl AsRef<Path>) -> Result<Module> {
    loader::load(path.as_ref())
}

/// Parses configuration source text held in memory.
///
/// Unlike [`load_module`], a source without managed resources is accepted
/// and no variable definitions file is read.
pub fn parse_module(source: &str) -> Result<Module> {
    loader::parse(source)
}
