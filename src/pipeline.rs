//! Orchestrator for a complete multi-branch build
//!
//! This module drives every stage of a run in order:
//!
//! 1. Clean the scratch checkout and output directories
//! 2. Read the remote URL and list the branches selected by the pattern
//! 3. Check the proxy config template before spending time on builds
//! 4. Build each branch and copy its site into `app_dir/<name>`
//! 5. Rewrite the proxy config with the branches that succeeded
//!
//! A branch failure is recorded in the [`RunSummary`]; the
//! [`FailurePolicy`] decides whether the remaining branches still run.
//! Failing to find the remote, finding no branches, or an unusable proxy
//! config template abort the run before anything is rewritten.

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::aggregate::copy_overlay;
use crate::builder::BranchBuilder;
use crate::config::{FailurePolicy, Settings};
use crate::error::{BuildStep, Error, Result};
use crate::exec::CommandRunner;
use crate::git;
use crate::path::BranchPattern;
use crate::proxy;
use crate::workspace::{self, CleanOutcome};

/// A branch that did not make it into the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub branch: String,
    pub step: BuildStep,
    pub message: String,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Every branch selected by the pattern, in enumeration order.
    pub matched: Vec<String>,
    pub succeeded: Vec<String>,
    pub failed: Vec<BranchFailure>,
    /// Whether the abort policy stopped the run early.
    pub aborted: bool,
    pub proxy_updated: bool,
}

impl RunSummary {
    /// True when every matched branch was built and the proxy was updated.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.aborted && self.proxy_updated
    }

    /// Matched branches that were never attempted because of an abort.
    pub fn skipped(&self) -> Vec<&str> {
        self.matched
            .iter()
            .filter(|b| !self.succeeded.contains(*b) && !self.failed.iter().any(|f| &f.branch == *b))
            .map(String::as_str)
            .collect()
    }
}

/// What a run would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub remote_url: String,
    pub branches: Vec<String>,
    /// The location blocks the proxy config would receive.
    pub locations: String,
}

/// Drives a run in one workspace.
pub struct Pipeline<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a Settings,
    workdir: PathBuf,
}

impl<'a> Pipeline<'a> {
    pub fn new(runner: &'a dyn CommandRunner, settings: &'a Settings, workdir: &Path) -> Self {
        Self {
            runner,
            settings,
            workdir: workdir.to_path_buf(),
        }
    }

    fn proxy_config(&self) -> PathBuf {
        self.workdir.join(&self.settings.proxy_config)
    }

    /// Read the remote URL and list the matching branches.
    fn discover(&self, pattern: &BranchPattern) -> Result<(String, Vec<String>)> {
        let remote = &self.settings.remote;
        let remote_url = git::remote_url(self.runner, &self.workdir, remote)?;
        info!("Remote {} is {}", remote, remote_url);

        let branches = git::list_remote_branches(self.runner, &self.workdir, remote, pattern)?;
        if branches.is_empty() {
            return Err(Error::NoBranchesMatched {
                pattern: pattern.as_str().to_string(),
            });
        }
        info!(
            "{} branch(es) match '{}': {}",
            branches.len(),
            pattern.as_str(),
            branches.join(", ")
        );
        Ok((remote_url, branches))
    }

    /// List what a run would build, touching nothing on disk.
    pub fn plan(&self, pattern: &str) -> Result<Plan> {
        let pattern = BranchPattern::new(pattern)?;
        let (remote_url, branches) = self.discover(&pattern)?;
        proxy::check_file(&self.proxy_config())?;
        let locations = proxy::render_locations(&branches, &self.settings.alias_root);
        Ok(Plan {
            remote_url,
            branches,
            locations,
        })
    }

    /// Build every branch selected by `pattern` and update the proxy config.
    pub fn run(&self, pattern: &str) -> Result<RunSummary> {
        let pattern = BranchPattern::new(pattern)?;

        let app_dir = self.workdir.join(&self.settings.app_dir);
        let outcomes = workspace::clean(
            &self.workdir,
            &[
                self.settings.branch_dir.as_path(),
                self.settings.app_dir.as_path(),
            ],
        );
        let app_dirty = outcomes.iter().any(
            |outcome| matches!(outcome, CleanOutcome::Failed { path, .. } if *path == app_dir),
        );
        if app_dirty {
            warn!(
                "Continuing with {} not cleaned; output from earlier runs may remain",
                app_dir.display()
            );
        }

        let (remote_url, branches) = self.discover(&pattern)?;
        let proxy_config = self.proxy_config();
        proxy::check_file(&proxy_config)?;

        let builder = BranchBuilder::new(self.runner, self.settings, &self.workdir, &remote_url);
        let mut summary = RunSummary {
            matched: branches.clone(),
            ..RunSummary::default()
        };

        for branch in &branches {
            match self.build_one(&builder, branch) {
                Ok(target) => {
                    info!("Branch {} published to {}", branch, target.display());
                    summary.succeeded.push(branch.clone());
                }
                Err(e) => {
                    error!("{}", e);
                    summary.failed.push(failure(branch, e));
                    if self.settings.on_failure == FailurePolicy::Abort {
                        summary.aborted = true;
                        break;
                    }
                }
            }
        }

        if summary.aborted {
            warn!(
                "Run aborted, leaving {} untouched",
                proxy_config.display()
            );
        } else if summary.succeeded.is_empty() {
            warn!(
                "No branch was built, leaving {} untouched",
                proxy_config.display()
            );
        } else {
            proxy::rewrite_file(&proxy_config, &summary.succeeded, &self.settings.alias_root)?;
            summary.proxy_updated = true;
        }

        Ok(summary)
    }

    fn build_one(&self, builder: &BranchBuilder<'_>, branch: &str) -> Result<PathBuf> {
        let site = builder.build(branch)?;
        let target = self.workdir.join(&self.settings.app_dir).join(branch);
        copy_overlay(&site, &target).map_err(|e| e.in_branch(branch, BuildStep::Aggregate))?;
        Ok(target)
    }
}

fn failure(branch: &str, err: Error) -> BranchFailure {
    match err {
        Error::BranchBuild { step, source, .. } => BranchFailure {
            branch: branch.to_string(),
            step,
            message: source.to_string(),
        },
        other => BranchFailure {
            branch: branch.to_string(),
            step: BuildStep::Build,
            message: other.to_string(),
        },
    }
}
