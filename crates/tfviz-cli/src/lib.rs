//! CLI logic for the tfviz topology tool.
//!
//! Loads a Terraform module, synthesizes its network topology and exports
//! the graph in the requested format.

pub mod error_adapter;
pub mod logging;

mod args;
mod config;

pub use args::Args;

use std::path::Path;

use log::info;

use tfviz::{TfvizError, TopologyBuilder, config::AppConfig};

/// Run the tfviz CLI application
///
/// # Errors
///
/// Returns `TfvizError` for:
/// - An output path that already exists, checked before anything is loaded
/// - Configuration loading errors
/// - Module loading errors
/// - Export errors
///
/// Problems found in the module itself are reported through the log and do
/// not fail the run.
pub fn run(args: &Args) -> Result<(), TfvizError> {
    let output = args.output_path();
    info!(
        input_path = args.input,
        output_path = output,
        format:% = args.format;
        "Processing module"
    );

    if Path::new(&output).exists() {
        return Err(TfvizError::OutputExists(output.into()));
    }

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_flags(&mut app_config, args);

    let builder = TopologyBuilder::new(app_config);
    let module = builder.load(&args.input)?;
    let topology = builder.synthesize(&module)?;
    topology.report(builder.config().synthesis());

    builder.export(&topology, args.format, &output)?;

    info!(output_file = output; "Topology exported successfully");

    Ok(())
}

/// Flags only switch settings on; they never undo the configuration file.
fn apply_flags(config: &mut AppConfig, args: &Args) {
    let synthesis = config.synthesis_mut();
    if args.ignore_ingress {
        synthesis.set_ignore_ingress(true);
    }
    if args.ignore_egress {
        synthesis.set_ignore_egress(true);
    }
    if args.ignore_warnings {
        synthesis.set_ignore_warnings(true);
    }
    if args.verbose {
        synthesis.set_verbose(true);
    }
}
