//! # branch-site Library
//!
//! This library builds a static documentation site for every remote branch
//! matching a pattern and publishes each one under its own URL path behind
//! nginx. It backs the `branch-site` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use branch_site::proxy;
//!
//! let template = "location = / { return 302 /REPLACE_FIRST_APP/; }\nREPLACE_APPS";
//! let config = proxy::rewrite(template, &["v2", "v1"], "/app").unwrap();
//!
//! assert!(config.contains("return 302 /v2/;"));
//! assert!(config.contains("location /v1 {"));
//! assert!(!config.contains("REPLACE_APPS"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Settings (`config`, `defaults`)**: the optional `.branch-site.yaml`
//!   file: remote, directories, failure policy and the install and build
//!   commands.
//! - **Commands (`exec`, `git`)**: every external tool runs through the
//!   `CommandRunner` trait with an explicit working directory, and every exit
//!   status is checked.
//! - **Branches (`path`, `builder`)**: pattern matching and name validation,
//!   then a shallow checkout and site build per branch.
//! - **Output (`workspace`, `aggregate`, `proxy`)**: cleaning old output,
//!   copying each site into `app/<name>`, and rewriting the nginx config.
//!
//! ## Execution Flow
//!
//! [`pipeline::Pipeline::run`] executes these steps:
//!
//! 1.  **Clean**: remove `branch/` and `app/` from the previous run.
//! 2.  **Discover**: read the remote URL and list matching remote branches.
//! 3.  **Build**: per branch, check out, install, build and copy the site.
//! 4.  **Publish**: rewrite the nginx config with the branches that built.

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod defaults;
pub mod error;
pub mod exec;
pub mod git;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod proxy;
pub mod workspace;

#[cfg(test)]
mod proxy_proptest;
