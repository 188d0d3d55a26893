//! # Proxy Config Rewriting
//!
//! The nginx config shipped with the site is a template holding two
//! placeholder tokens:
//!
//! - `REPLACE_APPS`: replaced with one `location` block per built branch.
//! - `REPLACE_FIRST_APP`: replaced with the default branch name, typically
//!   inside a root redirect such as `return 302 /REPLACE_FIRST_APP/;`.
//!
//! Both tokens must be present before substitution and gone afterwards;
//! anything else in the file is left byte-for-byte untouched. The file is
//! rewritten in place without a backup.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{Error, Result};

/// Token replaced with the generated location blocks.
pub const APPS_TOKEN: &str = "REPLACE_APPS";

/// Token replaced with the default branch name.
pub const FIRST_APP_TOKEN: &str = "REPLACE_FIRST_APP";

/// Render the `location` block serving one branch.
pub fn render_location(name: &str, alias_root: &str) -> String {
    let alias_root = alias_root.trim_end_matches('/');
    format!(
        "location /{name} {{\n    alias {alias_root}/{name};\n    try_files $uri $uri/ /{name}/index.html;\n    error_page 404 /{name}/404.html;\n}}\n"
    )
}

/// Render the blocks for all branches, in order.
pub fn render_locations<S: AsRef<str>>(names: &[S], alias_root: &str) -> String {
    names
        .iter()
        .map(|name| render_location(name.as_ref(), alias_root))
        .collect()
}

/// Check that `template` holds both placeholder tokens.
pub fn check_template(template: &str) -> Result<()> {
    for token in [APPS_TOKEN, FIRST_APP_TOKEN] {
        if !template.contains(token) {
            return Err(Error::Template {
                message: "placeholder not found in proxy config".to_string(),
                token: Some(token.to_string()),
            });
        }
    }
    Ok(())
}

/// Read the proxy config at `path` and check it is a usable template.
pub fn check_file(path: &Path) -> Result<()> {
    let template = read(path)?;
    check_template(&template)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Filesystem {
        message: format!("Failed to read proxy config '{}': {}", path.display(), e),
    })
}

/// Substitute both tokens in `template`.
///
/// The first name becomes the default app. Fails without touching anything
/// when `names` is empty or a token is missing.
pub fn rewrite<S: AsRef<str>>(template: &str, names: &[S], alias_root: &str) -> Result<String> {
    let Some(first) = names.first() else {
        return Err(Error::Template {
            message: "no branches to serve".to_string(),
            token: None,
        });
    };

    check_template(template)?;

    let content = template
        .replace(APPS_TOKEN, &render_locations(names, alias_root))
        .replace(FIRST_APP_TOKEN, first.as_ref());

    for token in [APPS_TOKEN, FIRST_APP_TOKEN] {
        if content.contains(token) {
            return Err(Error::Template {
                message: "placeholder still present after substitution".to_string(),
                token: Some(token.to_string()),
            });
        }
    }

    Ok(content)
}

/// Rewrite the proxy config at `path` in place.
pub fn rewrite_file<S: AsRef<str>>(path: &Path, names: &[S], alias_root: &str) -> Result<()> {
    let template = read(path)?;
    let content = rewrite(&template, names, alias_root)?;

    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write proxy config '{}': {}", path.display(), e),
    })?;

    info!(
        "Updated {} with {} location block(s)",
        path.display(),
        names.len()
    );
    Ok(())
}
