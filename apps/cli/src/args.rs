//! # CLI Argument Definitions
//!
//! Every flag is optional: a bare `drvreg` run from the project root regenerates the
//! outputs using the default layout (or `drvreg.toml` when present).

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "drvreg")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generates the driver build fragment and enable header from the driver registry")]
pub(crate) struct Cli {
    /// Project root used to resolve the layout (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub(crate) project_root: Option<PathBuf>,

    /// Directory scanned for driver sources (defaults to `<project root>/drivers`)
    #[arg(long, value_name = "DIR")]
    pub(crate) driver_root: Option<PathBuf>,

    /// Registry document (defaults to `<driver root>/registry.toml`)
    #[arg(long, value_name = "FILE")]
    pub(crate) registry: Option<PathBuf>,

    /// Layout file; must exist when given (defaults to an optional `<project root>/drvreg.toml`)
    #[arg(long, value_name = "FILE")]
    pub(crate) layout: Option<PathBuf>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub(crate) verbose: u8,

    /// Only report errors; also suppresses the success summary
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Also write diagnostics to `<DIR>/drvreg.log`
    #[arg(long, value_name = "DIR")]
    pub(crate) log_dir: Option<PathBuf>,
}
