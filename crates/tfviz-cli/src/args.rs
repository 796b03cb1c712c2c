//! Command-line argument definitions for the tfviz CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Flags given here override the configuration file.

use clap::Parser;

use tfviz::export::Format;

/// Command-line arguments for the tfviz topology tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Terraform module directory or single `.tf` file
    #[arg(default_value = ".")]
    pub input: String,

    /// Path to the output file [default: tfviz.<format>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (dot, png, svg, pdf, jpg, gif)
    #[arg(short, long, default_value = "png")]
    pub format: Format,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not draw edges for ingress rules
    #[arg(long)]
    pub ignore_ingress: bool,

    /// Do not draw edges for egress rules
    #[arg(long)]
    pub ignore_egress: bool,

    /// Do not report warnings
    #[arg(long)]
    pub ignore_warnings: bool,

    /// Report unsupported resources and every graph change
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The output path, derived from the format when not given.
    pub fn output_path(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("tfviz.{}", self.format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["tfviz"]);
        assert_eq!(args.input, ".");
        assert_eq!(args.format, Format::Png);
        assert_eq!(args.output_path(), "tfviz.png");
        assert!(!args.verbose);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "tfviz",
            "infra",
            "-f",
            "svg",
            "--ignore-egress",
            "--verbose",
        ]);
        assert_eq!(args.input, "infra");
        assert_eq!(args.output_path(), "tfviz.svg");
        assert!(args.ignore_egress);
        assert!(!args.ignore_ingress);
        assert!(args.verbose);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["tfviz", "-f", "bmp"]).is_err());
    }
}
