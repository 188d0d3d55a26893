//! Branch name matching and validation

use std::sync::LazyLock;

use glob::Pattern;
use regex::Regex;

use crate::error::{Error, Result};
use crate::proxy::{APPS_TOKEN, FIRST_APP_TOKEN};

/// Compiled branch pattern, matched against bare or remote-qualified names.
///
/// `release-*` and `origin/release-*` both select `origin/release-1.0`.
#[derive(Debug, Clone)]
pub struct BranchPattern {
    pattern: Pattern,
}

impl BranchPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether the branch `name` on `remote` is selected.
    pub fn matches(&self, remote: &str, name: &str) -> bool {
        self.pattern.matches(name) || self.pattern.matches(&format!("{}/{}", remote, name))
    }
}

static ALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._/+-]+$").expect("Invalid branch name regex"));

/// Check that a branch name can be used as a directory and a URL path.
///
/// The name ends up in `branch/<name>`, `app/<name>` and an nginx
/// `location /<name>` block, so it must stay inside those directories and
/// must not carry characters nginx would treat as syntax.
pub fn validate_branch_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(Error::InvalidBranchName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if !ALLOWED_CHARS.is_match(name) {
        return invalid("only letters, digits and . _ / + - are allowed");
    }
    if name.starts_with('/') || name.starts_with('-') {
        return invalid("name must not start with '/' or '-'");
    }
    if name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return invalid("name contains an empty, '.' or '..' path segment");
    }
    if name.contains(APPS_TOKEN) || name.contains(FIRST_APP_TOKEN) {
        return invalid("name contains a proxy config placeholder");
    }
    Ok(())
}
