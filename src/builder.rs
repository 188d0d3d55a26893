//! Per-branch checkout and site build.
//!
//! Each branch gets its own scratch repository under `branch_dir/<name>`:
//!
//! 1.  **Prepare**: create the checkout directory.
//! 2.  **Init / AddRemote**: `git init` and register the remote with the URL
//!     read from the workspace repository.
//! 3.  **Fetch**: shallow-fetch only the branch tip.
//! 4.  **Checkout**: create a local branch tracking the fetched one.
//! 5.  **Install / Build**: run the configured install commands, then the
//!     build command, all inside the checkout.
//! 6.  **LocateSite**: make sure the generator left its output directory.
//!
//! The first failing step stops the branch and is reported as
//! [`Error::BranchBuild`] carrying the step and the underlying cause.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::Settings;
use crate::error::{BuildStep, Error, Result};
use crate::exec::{CommandRunner, CommandSpec};
use crate::git;
use crate::path::validate_branch_name;

/// Builds the site of one branch at a time.
pub struct BranchBuilder<'a> {
    runner: &'a dyn CommandRunner,
    settings: &'a Settings,
    workdir: &'a Path,
    remote_url: &'a str,
}

impl<'a> BranchBuilder<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        settings: &'a Settings,
        workdir: &'a Path,
        remote_url: &'a str,
    ) -> Self {
        Self {
            runner,
            settings,
            workdir,
            remote_url,
        }
    }

    /// Directory holding the scratch checkout of `branch`.
    pub fn checkout_dir(&self, branch: &str) -> PathBuf {
        self.workdir.join(&self.settings.branch_dir).join(branch)
    }

    /// Check out and build `branch`, returning the generated site directory.
    pub fn build(&self, branch: &str) -> Result<PathBuf> {
        let at = move |step: BuildStep| move |e: Error| e.in_branch(branch, step);

        validate_branch_name(branch).map_err(at(BuildStep::Validate))?;

        let dir = self.checkout_dir(branch);
        fs::create_dir_all(&dir)
            .map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", dir.display(), e),
            })
            .map_err(at(BuildStep::Prepare))?;

        let remote = self.settings.remote.as_str();
        git::init(self.runner, &dir).map_err(at(BuildStep::Init))?;
        git::add_remote(self.runner, &dir, remote, self.remote_url)
            .map_err(at(BuildStep::AddRemote))?;

        info!("Checking out branch {}", branch);
        git::fetch_shallow(self.runner, &dir, remote, branch).map_err(at(BuildStep::Fetch))?;
        git::checkout_tracking(self.runner, &dir, remote, branch)
            .map_err(at(BuildStep::Checkout))?;

        for argv in &self.settings.install {
            self.run_configured(argv, &dir).map_err(at(BuildStep::Install))?;
        }

        info!("Building site for {}", branch);
        self.run_configured(&self.settings.build, &dir)
            .map_err(at(BuildStep::Build))?;

        let site = dir.join(&self.settings.site_dir);
        if !site.is_dir() {
            return Err(Error::SiteMissing { path: site }.in_branch(branch, BuildStep::LocateSite));
        }
        debug!("Site for {} generated at {}", branch, site.display());
        Ok(site)
    }

    fn run_configured(&self, argv: &[String], dir: &Path) -> Result<()> {
        let command = CommandSpec::from_argv(argv).ok_or_else(|| Error::ConfigParse {
            message: "empty command".to_string(),
            hint: None,
        })?;
        self.runner.run(&command, dir)?;
        Ok(())
    }
}
