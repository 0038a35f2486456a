#![allow(clippy::print_stderr, clippy::print_stdout)]

mod args;

use crate::args::Cli;
use anyhow::Context;
use clap::Parser;
use drvreg_logger::Logger;
use drvreg_registry::{GenerationReport, Generator, LAYOUT_FILE, Layout};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let builder = Logger::builder().name(env!("CARGO_BIN_NAME")).verbosity(cli.verbose, cli.quiet);
    let builder = match &cli.log_dir {
        Some(dir) => builder.log_dir(dir),
        None => builder,
    };
    let _logger = match builder.init() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        },
    };

    match generate(&cli) {
        Ok(report) => {
            if !cli.quiet {
                println!(
                    "✅ Generated {} and {} ({} of {} drivers enabled)",
                    report.build_fragment.display(),
                    report.header.display(),
                    report.enabled,
                    report.total
                );
            }
            ExitCode::SUCCESS
        },
        Err(err) => {
            for cause in err.chain().skip(1) {
                debug!(%cause, "Caused by");
            }
            eprintln!("error: {err}");
            ExitCode::FAILURE
        },
    }
}

/// Resolves paths from the flags and runs the generator once.
fn generate(cli: &Cli) -> anyhow::Result<GenerationReport> {
    let project_root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to determine the invocation directory")?,
    };

    let layout = match &cli.layout {
        Some(path) => Layout::load(path, true)?,
        None => Layout::load(project_root.join(LAYOUT_FILE), false)?,
    };

    let mut builder = Generator::builder().project_root(&project_root).layout(layout);
    if let Some(driver_root) = &cli.driver_root {
        builder = builder.driver_root(driver_root);
    }
    if let Some(registry) = &cli.registry {
        builder = builder.registry(registry);
    }

    debug!(project_root = %project_root.display(), "Starting generation");
    Ok(builder.build()?.run()?)
}
