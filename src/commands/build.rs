//! Build command implementation
//!
//! Resolves the workspace and settings, then either prints the plan
//! (`--dry-run`) or runs the full pipeline:
//! 1. Clean `branch/` and `app/`
//! 2. Enumerate the remote branches matching the pattern
//! 3. Build and publish each branch
//! 4. Rewrite the proxy config
//!
//! Any failed branch makes the command exit with an error after the summary
//! is printed.

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::{Path, PathBuf};

use branch_site::config::{self, FailurePolicy, Settings};
use branch_site::exec::SystemRunner;
use branch_site::output::{render_plan, render_summary, OutputConfig};
use branch_site::pipeline::Pipeline;

/// Arguments for a build run
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Glob selecting the remote branches to build (e.g. `v*`, `release-*`)
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Workspace root (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Settings file, relative to the current directory (defaults to .branch-site.yaml in the workspace, if present)
    #[arg(short, long, value_name = "FILE", env = "BRANCH_SITE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Proxy config to rewrite, relative to the workspace
    #[arg(long, value_name = "FILE")]
    pub proxy_config: Option<PathBuf>,

    /// Remote whose branches are built
    #[arg(long, value_name = "NAME")]
    pub remote: Option<String>,

    /// Stop at the first failing branch and leave the proxy config untouched
    #[arg(long)]
    pub abort_on_failure: bool,

    /// List the branches and location blocks without building anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress the summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Merge CLI overrides into the loaded settings.
fn resolve_settings(args: &BuildArgs, workdir: &Path) -> Result<Settings> {
    let mut settings = config::load(workdir, args.config.as_deref())?;
    if let Some(proxy_config) = &args.proxy_config {
        settings.proxy_config = proxy_config.clone();
    }
    if let Some(remote) = &args.remote {
        settings.remote = remote.clone();
    }
    if args.abort_on_failure {
        settings.on_failure = FailurePolicy::Abort;
    }
    settings.validate()?;
    Ok(settings)
}

/// Execute the build command
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let workdir = match &args.workdir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let settings = resolve_settings(&args, &workdir)?;

    info!("Branch pattern: {}", args.pattern);
    let runner = SystemRunner;
    let pipeline = Pipeline::new(&runner, &settings, &workdir);

    if args.dry_run {
        let plan = pipeline.plan(&args.pattern)?;
        if !args.quiet {
            print!("{}", render_plan(&plan, &out));
        }
        return Ok(());
    }

    let summary = pipeline.run(&args.pattern)?;
    if !args.quiet {
        print!("{}", render_summary(&summary, &out));
    }

    if !summary.is_success() {
        anyhow::bail!(
            "{} of {} branch(es) failed",
            summary.failed.len(),
            summary.matched.len()
        );
    }
    Ok(())
}
