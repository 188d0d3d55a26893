//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = TestFixture::with_remote(&["main", "v1"])
//!         .with_settings(settings::SH_BUILD)
//!         .with_proxy_template();
//!     fixture.command().arg("v*").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{git_available, settings, TestFixture, PROXY_TEMPLATE};
}

/// Proxy config template with both placeholder tokens.
pub const PROXY_TEMPLATE: &str = "server {
    listen 80;
    location = / {
        return 302 /REPLACE_FIRST_APP/;
    }
    REPLACE_APPS
}
";

/// Settings files using `sh` one-liners in place of pipenv and mkdocs.
#[allow(dead_code)]
pub mod settings {
    /// Writes the checked-out branch name into `site/index.html`.
    pub const SH_BUILD: &str = r#"
install:
  - [sh, -c, "echo installed > install.log"]
build: [sh, -c, "mkdir -p site && git rev-parse --abbrev-ref HEAD > site/index.html"]
"#;

    /// Same as `SH_BUILD`, but the build fails on `release-2.0`.
    pub const FAIL_ON_RELEASE_2: &str = r#"
install: []
build:
  - sh
  - -c
  - 'test "$(git rev-parse --abbrev-ref HEAD)" != release-2.0 && mkdir -p site && git rev-parse --abbrev-ref HEAD > site/index.html'
"#;
}

/// Check whether a usable `git` binary is on the PATH.
///
/// Tests that need a real repository return early when it is not.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// A workspace cloned from a local "remote" repository.
///
/// The remote lives in `<tmp>/upstream`; the workspace the binary runs in is
/// a clone of it at `<tmp>/work`, so `git branch -r` lists `origin/*`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a remote holding `branches` (the first one is the default
    /// branch) and clone it into the workspace.
    pub fn with_remote(branches: &[&str]) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let upstream = temp_dir.child("upstream");
        upstream.create_dir_all().expect("Failed to create upstream");

        let (default_branch, others) = branches.split_first().expect("at least one branch");
        git(upstream.path(), &["init", "-q"]);
        let head = format!("refs/heads/{}", default_branch);
        git(upstream.path(), &["symbolic-ref", "HEAD", head.as_str()]);
        upstream
            .child("mkdocs.yml")
            .write_str("site_name: Docs\n")
            .expect("Failed to write mkdocs.yml");
        git(upstream.path(), &["add", "."]);
        git(upstream.path(), &["commit", "-q", "-m", "initial"]);
        for branch in others {
            git(upstream.path(), &["branch", *branch]);
        }

        let upstream_path = upstream.path().to_string_lossy().to_string();
        git(temp_dir.path(), &["clone", "-q", upstream_path.as_str(), "work"]);

        Self { temp_dir }
    }

    /// Add a `.branch-site.yaml` settings file to the workspace.
    pub fn with_settings(self, content: &str) -> Self {
        self.child(".branch-site.yaml")
            .write_str(content)
            .expect("Failed to write settings file");
        self
    }

    /// Add the standard `nginx.conf` template to the workspace.
    pub fn with_proxy_template(self) -> Self {
        self.child("nginx.conf")
            .write_str(PROXY_TEMPLATE)
            .expect("Failed to write nginx.conf");
        self
    }

    /// Path to the workspace the binary runs in.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// Child path inside the workspace.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child("work").child(path)
    }

    /// Read a workspace file to a string.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a command configured to run in this fixture's workspace.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("branch-site");
        cmd.current_dir(self.path())
            .env_remove("BRANCH_SITE_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}
