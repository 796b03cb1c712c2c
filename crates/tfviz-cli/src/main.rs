//! tfviz CLI entry point.

use std::process;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use tfviz_cli::{Args, error_adapter::to_reportables, logging};

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = logging::resolve_level(&args.log_level, args.verbose).unwrap_or_else(|err| {
        eprintln!("{err}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    logging::init(log_level);

    info!(log_level:?; "Starting tfviz");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = tfviz_cli::run(&args) {
        let reporter = miette::GraphicalReportHandler::new();

        // Render each diagnostic independently
        for reportable in to_reportables(&err) {
            let mut writer = String::new();
            reporter
                .render_report(&mut writer, &reportable)
                .expect("Writing to String buffer is infallible");

            error!("{writer}");
        }

        process::exit(1);
    }

    info!("Completed successfully");
}
