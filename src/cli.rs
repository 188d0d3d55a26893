//! CLI argument parsing and logging setup

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Build a documentation site per git branch and serve each one from its own
/// nginx location
#[derive(Parser, Debug)]
#[command(name = "branch-site")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    build: commands::build::BuildArgs,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["always", "never", "auto"]
    )]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        commands::build::execute(self.build, &self.color)
    }
}

/// Log to stderr at `level`, unless `RUST_LOG` says otherwise.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
