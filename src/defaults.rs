//! Default values for branch-site settings.
//!
//! This module provides centralized default values used by the settings
//! loader and the CLI, so a run without any settings file behaves like the
//! classic `pipenv` + `mkdocs` setup.

/// Name of the optional settings file looked up in the workspace root.
pub const SETTINGS_FILE: &str = ".branch-site.yaml";

/// Remote whose branches are listed and fetched.
pub const REMOTE: &str = "origin";

/// Directory holding one scratch checkout per branch.
pub const BRANCH_DIR: &str = "branch";

/// Directory holding one aggregated site per branch.
pub const APP_DIR: &str = "app";

/// Directory the site generator writes its output to, relative to a checkout.
pub const SITE_DIR: &str = "site";

/// Proxy configuration file rewritten at the end of a run.
pub const PROXY_CONFIG: &str = "nginx.conf";

/// Path under which the proxy sees the aggregated `app` directory.
pub const ALIAS_ROOT: &str = "/app";

/// Commands run in each checkout before building, in order.
pub fn install_commands() -> Vec<Vec<String>> {
    vec![
        argv(&["pipenv", "install", "--site-packages"]),
        argv(&["pipenv", "install", "-r", "requirements.txt"]),
    ]
}

/// Command that builds the site inside a checkout.
pub fn build_command() -> Vec<String> {
    argv(&["pipenv", "run", "mkdocs", "build"])
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_commands_use_pipenv() {
        let commands = install_commands();
        assert_eq!(commands.len(), 2);
        assert!(commands.iter().all(|c| c[0] == "pipenv"));
        assert_eq!(commands[1], ["pipenv", "install", "-r", "requirements.txt"]);
    }

    #[test]
    fn test_build_command_runs_mkdocs() {
        assert_eq!(build_command(), ["pipenv", "run", "mkdocs", "build"]);
    }
}
