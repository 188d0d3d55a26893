//! # branch-site CLI
//!
//! This is the binary entry point for the `branch-site` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and running the build.
//! - Turning a failed run into a non-zero exit status.
//!
//! The pipeline itself lives in the `branch_site` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
