//! Git operations used by the branch pipeline.
//!
//! All functions go through a [`CommandRunner`] and take the directory the
//! command should run in, so nothing here depends on the process working
//! directory.

use std::path::Path;

use crate::error::{Error, Result};
use crate::exec::{CommandRunner, CommandSpec};
use crate::path::BranchPattern;

/// Read the URL configured for `remote` in the repository at `repo_dir`.
pub fn remote_url(runner: &dyn CommandRunner, repo_dir: &Path, remote: &str) -> Result<String> {
    let output = runner
        .run(&CommandSpec::git(["remote", "get-url", remote]), repo_dir)
        .map_err(|e| Error::RemoteUrl {
            remote: remote.to_string(),
            message: e.to_string(),
        })?;

    let url = output.stdout.trim();
    if url.is_empty() {
        return Err(Error::RemoteUrl {
            remote: remote.to_string(),
            message: "git printed an empty URL".to_string(),
        });
    }
    Ok(url.to_string())
}

/// List the remote branches of `repo_dir` selected by `pattern`.
///
/// Names are returned without the `<remote>/` prefix, in the order
/// `git branch -r` prints them.
pub fn list_remote_branches(
    runner: &dyn CommandRunner,
    repo_dir: &Path,
    remote: &str,
    pattern: &BranchPattern,
) -> Result<Vec<String>> {
    let output = runner.run(&CommandSpec::git(["branch", "-r"]), repo_dir)?;
    Ok(parse_branch_listing(&output.stdout, remote, pattern))
}

/// Parse `git branch -r` output into bare branch names.
///
/// Output format, one ref per line:
///
/// ```text
///   origin/HEAD -> origin/main
///   origin/main
///   origin/release-1.0
/// ```
///
/// Alias lines (`->`) and refs of other remotes are dropped.
pub fn parse_branch_listing(stdout: &str, remote: &str, pattern: &BranchPattern) -> Vec<String> {
    let prefix = format!("{}/", remote);
    let mut names: Vec<String> = Vec::new();

    for line in stdout.lines() {
        if line.contains("->") {
            continue;
        }
        let Some(reference) = line.split_whitespace().next() else {
            continue;
        };
        let Some(name) = reference.strip_prefix(&prefix) else {
            continue;
        };
        if name.is_empty() || !pattern.matches(remote, name) {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}

/// `git init` in `dir`.
pub fn init(runner: &dyn CommandRunner, dir: &Path) -> Result<()> {
    runner.run(&CommandSpec::git(["init"]), dir)?;
    Ok(())
}

/// `git remote add <remote> <url>` in `dir`.
pub fn add_remote(runner: &dyn CommandRunner, dir: &Path, remote: &str, url: &str) -> Result<()> {
    runner.run(&CommandSpec::git(["remote", "add", remote, url]), dir)?;
    Ok(())
}

/// Fetch only the tip commit of `branch` from `remote`.
pub fn fetch_shallow(runner: &dyn CommandRunner, dir: &Path, remote: &str, branch: &str) -> Result<()> {
    runner.run(
        &CommandSpec::git(["fetch", "--depth", "1", remote, branch]),
        dir,
    )?;
    Ok(())
}

/// Create local `branch` tracking `<remote>/<branch>` and check it out.
pub fn checkout_tracking(
    runner: &dyn CommandRunner,
    dir: &Path,
    remote: &str,
    branch: &str,
) -> Result<()> {
    let upstream = format!("{}/{}", remote, branch);
    runner.run(
        &CommandSpec::git(["checkout", "-b", branch, "--track", upstream.as_str()]),
        dir,
    )?;
    Ok(())
}
