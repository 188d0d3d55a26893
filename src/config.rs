//! # Settings Schema and Parsing
//!
//! This module defines the optional `.branch-site.yaml` settings file and the
//! logic for loading it. Every key is optional; a missing key falls back to
//! the values in [`crate::defaults`], so a run without any settings file
//! behaves like the classic `pipenv` + `mkdocs` setup.
//!
//! ```yaml
//! remote: origin
//! branch_dir: branch
//! app_dir: app
//! site_dir: site
//! proxy_config: nginx.conf
//! alias_root: /app
//! on_failure: continue   # or: abort
//! install:
//!   - [pipenv, install, --site-packages]
//!   - [pipenv, install, -r, requirements.txt]
//! build: [pipenv, run, mkdocs, build]
//! ```
//!
//! Unknown keys are rejected so that typos surface as errors instead of
//! silently falling back to a default.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::defaults;
use crate::error::{Error, Result};

/// What to do with the remaining branches once one branch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and carry on with the next branch.
    #[default]
    Continue,
    /// Stop processing branches and leave the proxy config untouched.
    Abort,
}

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Remote whose branches are listed and fetched.
    pub remote: String,
    /// Scratch checkout directory, relative to the workspace root.
    pub branch_dir: PathBuf,
    /// Aggregated output directory, relative to the workspace root.
    pub app_dir: PathBuf,
    /// Generator output directory, relative to each checkout.
    pub site_dir: PathBuf,
    /// Proxy config rewritten at the end, relative to the workspace root.
    pub proxy_config: PathBuf,
    /// Path the proxy uses to reach `app_dir`.
    pub alias_root: String,
    pub on_failure: FailurePolicy,
    /// Dependency install commands, run in order inside each checkout.
    pub install: Vec<Vec<String>>,
    /// Site build command, run inside each checkout after `install`.
    pub build: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: defaults::REMOTE.to_string(),
            branch_dir: PathBuf::from(defaults::BRANCH_DIR),
            app_dir: PathBuf::from(defaults::APP_DIR),
            site_dir: PathBuf::from(defaults::SITE_DIR),
            proxy_config: PathBuf::from(defaults::PROXY_CONFIG),
            alias_root: defaults::ALIAS_ROOT.to_string(),
            on_failure: FailurePolicy::default(),
            install: defaults::install_commands(),
            build: defaults::build_command(),
        }
    }
}

impl Settings {
    /// Check values that deserialize fine but cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "remote must not be empty".to_string(),
                hint: Some("use the name shown by `git remote`, e.g. origin".to_string()),
            });
        }
        if self.build.is_empty() {
            return Err(Error::ConfigParse {
                message: "build command must not be empty".to_string(),
                hint: Some("e.g. build: [mkdocs, build]".to_string()),
            });
        }
        if let Some(index) = self.install.iter().position(|c| c.is_empty()) {
            return Err(Error::ConfigParse {
                message: format!("install command #{} is empty", index + 1),
                hint: Some("remove the entry or give it a program name".to_string()),
            });
        }
        for (key, dir) in [
            ("branch_dir", &self.branch_dir),
            ("app_dir", &self.app_dir),
            ("site_dir", &self.site_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("{} must not be empty", key),
                    hint: None,
                });
            }
        }
        if self.branch_dir == self.app_dir {
            return Err(Error::ConfigParse {
                message: "branch_dir and app_dir must differ".to_string(),
                hint: None,
            });
        }
        Ok(())
    }
}

/// Parse settings from a YAML string.
///
/// An empty document yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Settings> {
    if yaml_content.trim().is_empty() {
        return Ok(Settings::default());
    }

    let settings: Settings =
        serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: hint_for(&e.to_string()),
        })?;
    settings.validate()?;
    Ok(settings)
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some(
            "valid keys are remote, branch_dir, app_dir, site_dir, proxy_config, \
             alias_root, on_failure, install, build"
                .to_string(),
        )
    } else if message.contains("on_failure") || message.contains("unknown variant") {
        Some("on_failure is either `continue` or `abort`".to_string())
    } else {
        None
    }
}

/// Parse settings from a file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load the settings for a workspace.
///
/// An explicitly named file must exist; a relative path is taken from the
/// process working directory, not from `workdir`. Without one, the default
/// settings file in `workdir` is used when present, and the built-in
/// defaults otherwise.
pub fn load(workdir: &Path, explicit: Option<&Path>) -> Result<Settings> {
    match explicit {
        Some(path) => {
            log::debug!("Loading settings from {}", path.display());
            from_file(path)
        }
        None => {
            let path = workdir.join(defaults::SETTINGS_FILE);
            if path.is_file() {
                log::debug!("Loading settings from {}", path.display());
                from_file(&path)
            } else {
                log::debug!("No {} found, using defaults", defaults::SETTINGS_FILE);
                Ok(Settings::default())
            }
        }
    }
}
