//! # CLI Command Implementations
//!
//! `branch-site` has a single command, so there is one module here. It
//! defines the `clap` arguments and an `execute` function that resolves the
//! settings, runs the pipeline from the `branch_site` library and reports
//! the outcome.

pub mod build;
