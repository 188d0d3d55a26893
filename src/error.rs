//! # Error Handling
//!
//! This module defines the centralized error type for `branch-site`. It uses
//! `thiserror` to build a single `Error` enum covering every anticipated
//! failure mode, each variant carrying enough context to tell the user what
//! went wrong and where.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - settings and template problems (`ConfigParse`, `Template`),
//!   - external command problems (`CommandSpawn`, `CommandFailed`,
//!     `RemoteUrl`), and
//!   - per-branch build problems (`InvalidBranchName`, `SiteMissing`,
//!     `BranchBuild`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! A `BranchBuild` error wraps the underlying cause together with the
//! branch name and the build step that failed, so a summary can report
//! exactly which branch broke and at which point.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The steps a single branch goes through, in order.
///
/// Used to report where a branch build failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Validate,
    Prepare,
    Init,
    AddRemote,
    Fetch,
    Checkout,
    Install,
    Build,
    LocateSite,
    Aggregate,
}

impl BuildStep {
    /// Short, stable name used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStep::Validate => "validate",
            BuildStep::Prepare => "prepare",
            BuildStep::Init => "init",
            BuildStep::AddRemote => "add-remote",
            BuildStep::Fetch => "fetch",
            BuildStep::Checkout => "checkout",
            BuildStep::Install => "install",
            BuildStep::Build => "build",
            BuildStep::LocateSite => "locate-site",
            BuildStep::Aggregate => "aggregate",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for branch-site operations
#[derive(Error, Debug)]
pub enum Error {
    /// The settings file could not be parsed or contains invalid values.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An external command could not be started at all.
    #[error("Failed to run `{command}` in {}: {message}", dir.display())]
    CommandSpawn {
        command: String,
        dir: PathBuf,
        message: String,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("Command `{command}` failed in {} ({}): {stderr}", dir.display(), code.map(|c| format!("exit code {}", c)).unwrap_or_else(|| "terminated by signal".to_string()))]
    CommandFailed {
        command: String,
        dir: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The URL of the named remote could not be determined.
    #[error("Could not determine URL of remote '{remote}': {message}")]
    RemoteUrl { remote: String, message: String },

    /// The branch pattern did not match any remote branch.
    #[error("No remote branches match pattern '{pattern}'")]
    NoBranchesMatched { pattern: String },

    /// A branch name cannot be used as a directory and URL path.
    #[error("Invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: String },

    /// The site generator finished but left no output directory behind.
    #[error("Generated site not found at {}", path.display())]
    SiteMissing { path: PathBuf },

    /// Building a single branch failed at the given step.
    #[error("Branch '{branch}' failed at step {step}: {source}")]
    BranchBuild {
        branch: String,
        step: BuildStep,
        #[source]
        source: Box<Error>,
    },

    /// The proxy config template could not be rendered.
    ///
    /// May include the placeholder token involved.
    #[error("Template processing error: {message}{}", token.as_ref().map(|t| format!(" (token: {})", t)).unwrap_or_default())]
    Template {
        message: String,
        /// The placeholder token that caused the error, if applicable
        token: Option<String>,
    },

    /// An error occurred with a host filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Attach branch and step context to an error.
    pub fn in_branch(self, branch: &str, step: BuildStep) -> Self {
        Error::BranchBuild {
            branch: branch.to_string(),
            step,
            source: Box::new(self),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
