//! # Output Formatting
//!
//! Renders the end-of-run summary and the dry-run plan for the terminal.
//!
//! Colour follows the `--color` flag (`always`, `never`, `auto`). In `auto`
//! mode colour is turned off by `NO_COLOR`, `CLICOLOR=0`, `TERM=dumb` or a
//! non-terminal stdout, and forced on by `CLICOLOR_FORCE=1`.

use std::env;
use std::fmt::Write;

use console::style;

use crate::pipeline::{Plan, RunSummary};

/// Output configuration for controlling colors and symbols.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // https://no-color.org/: presence alone disables colour
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }
        console::Term::stdout().features().colors_supported()
    }

    fn mark(&self, ok: bool) -> String {
        match (ok, self.use_color) {
            (true, true) => style("✔").green().force_styling(true).to_string(),
            (false, true) => style("✘").red().force_styling(true).to_string(),
            (true, false) => "[OK]".to_string(),
            (false, false) => "[FAIL]".to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        style(text).bold().force_styling(self.use_color).to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Render the end-of-run summary.
pub fn render_summary(summary: &RunSummary, out: &OutputConfig) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "{} {} built, {} failed",
        out.heading("Summary:"),
        summary.succeeded.len(),
        summary.failed.len()
    );

    for branch in &summary.succeeded {
        let _ = writeln!(text, "  {} {}", out.mark(true), branch);
    }
    for failure in &summary.failed {
        let _ = writeln!(
            text,
            "  {} {} ({}): {}",
            out.mark(false),
            failure.branch,
            failure.step,
            failure.message
        );
    }

    let skipped = summary.skipped();
    if !skipped.is_empty() {
        let _ = writeln!(text, "  skipped after abort: {}", skipped.join(", "));
    }

    if summary.proxy_updated {
        let default = summary.succeeded.first().map(String::as_str).unwrap_or_default();
        let _ = writeln!(text, "Proxy config updated, default branch: {}", default);
    } else {
        let _ = writeln!(text, "Proxy config left unchanged");
    }
    text
}

/// Render a dry-run plan.
pub fn render_plan(plan: &Plan, out: &OutputConfig) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} {}", out.heading("Remote:"), plan.remote_url);
    let _ = writeln!(text, "{}", out.heading("Branches to build:"));
    for branch in &plan.branches {
        let _ = writeln!(text, "  {}", branch);
    }
    let _ = writeln!(text, "{}", out.heading("Location blocks:"));
    text.push_str(&plan.locations);
    text
}
