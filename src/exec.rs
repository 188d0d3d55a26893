//! # External Command Execution
//!
//! Every external tool (`git`, the dependency installer, the site generator)
//! runs through the [`CommandRunner`] trait. Each call names its working
//! directory explicitly; the process working directory is never changed.
//!
//! The trait exists so the pipeline can be driven by a scripted runner in
//! tests. In the binary, [`SystemRunner`] spawns real processes, captures
//! their output and turns a non-zero exit into [`Error::CommandFailed`].

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a command from a settings-style argv list.
    ///
    /// Returns `None` for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Trait for running external commands - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `dir`, blocking until it exits.
    ///
    /// Returns the captured output on success. A command that cannot be
    /// started yields [`Error::CommandSpawn`]; one that exits unsuccessfully
    /// yields [`Error::CommandFailed`].
    fn run(&self, command: &CommandSpec, dir: &Path) -> Result<CommandOutput>;
}

/// The default implementation of `CommandRunner`, which spawns real
/// processes.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec, dir: &Path) -> Result<CommandOutput> {
        debug!("Running `{}` in {}", command, dir.display());

        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(dir)
            .output()
            .map_err(|e| Error::CommandSpawn {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                message: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            debug!("`{}` stdout:\n{}", command, stdout.trim_end());
        }
        if !stderr.trim().is_empty() {
            debug!("`{}` stderr:\n{}", command, stderr.trim_end());
        }

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                dir: dir.to_path_buf(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_spec_display() {
        let spec = CommandSpec::git(["fetch", "--depth", "1", "origin", "v1"]);
        assert_eq!(spec.to_string(), "git fetch --depth 1 origin v1");
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["pipenv".to_string(), "run".to_string(), "mkdocs".to_string()];
        let spec = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(spec.program, "pipenv");
        assert_eq!(spec.args, ["run", "mkdocs"]);

        assert!(CommandSpec::from_argv(&[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("marker.txt"), "here").unwrap();

        let output = SystemRunner
            .run(&CommandSpec::new("ls", Vec::<String>::new()), temp_dir.path())
            .unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let spec = CommandSpec::new("sh", ["-c", "echo broken >&2; exit 3"]);

        match SystemRunner.run(&spec, temp_dir.path()) {
            Err(Error::CommandFailed {
                command,
                code,
                stderr,
                ..
            }) => {
                assert_eq!(command, "sh -c echo broken >&2; exit 3");
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_system_runner_missing_program() {
        let temp_dir = TempDir::new().unwrap();
        let spec = CommandSpec::new("branch-site-no-such-program", ["--version"]);

        let result = SystemRunner.run(&spec, temp_dir.path());
        assert!(matches!(result, Err(Error::CommandSpawn { .. })));
    }
}
