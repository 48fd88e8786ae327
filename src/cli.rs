// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is declared as Rust structs and
// enums, and clap generates the parsing, --help and --version for us.
//
// Global flags (timeouts, --verbose) live on `Cli` so every subcommand
// accepts them; the per-command arguments live on the `Commands` variants.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use wcag_guardian::config::{BROWSER_TIMEOUT, FETCH_TIMEOUT, TOOL_TIMEOUT};
use wcag_guardian::EngineConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wcag-guardian",
    version = "0.1.0",
    about = "Heuristic WCAG 2.2 accessibility checks for web pages",
    long_about = "wcag-guardian fetches a page and runs heuristic checks against WCAG 2.2 \
                  success criteria. It can also drive pa11y, axe and Lighthouse, or capture \
                  the browser's accessibility tree. Exits with 1 when a check needs attention, \
                  which makes it usable as a CI gate."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub timeouts: TimeoutArgs,

    /// Log debug output to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Timeout overrides, in seconds
#[derive(Args, Debug)]
pub struct TimeoutArgs {
    /// Seconds to wait for the page fetch
    #[arg(long, global = true, default_value_t = FETCH_TIMEOUT.as_secs())]
    pub fetch_timeout: u64,

    /// Seconds to wait for an external scanner (pa11y, axe, lighthouse)
    #[arg(long, global = true, default_value_t = TOOL_TIMEOUT.as_secs())]
    pub tool_timeout: u64,

    /// Seconds to wait for the headless browser snapshot
    #[arg(long, global = true, default_value_t = BROWSER_TIMEOUT.as_secs())]
    pub browser_timeout: u64,
}

impl TimeoutArgs {
    pub fn to_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout))
            .with_tool_timeout(Duration::from_secs(self.tool_timeout))
            .with_browser_timeout(Duration::from_secs(self.browser_timeout))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single checker against a page
    ///
    /// Example: wcag-guardian check timing_controls https://example.com
    Check {
        /// Checker name, see `wcag-guardian list`
        checker: String,

        /// Page to evaluate; https:// is added when no scheme is given
        url: String,

        /// Output the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run every checker against a page
    ///
    /// Example: wcag-guardian audit example.com --json
    Audit {
        url: String,

        #[arg(long)]
        json: bool,
    },

    /// Run an external scanner (needs Node.js / npx)
    ///
    /// Example: wcag-guardian tool pa11y https://example.com
    Tool {
        /// One of: pa11y, axe, lighthouse
        name: String,

        url: String,
    },

    /// Capture the accessibility tree with headless Chromium
    Tree { url: String },

    /// Comprehensive assessment (placeholder)
    Assess { url: String },

    /// List the available checkers and the criteria they cover
    List,
}


// -----------------------------------------------------------------------------
// NOTES:
//
// 1. `#[command(flatten)]` pulls the TimeoutArgs fields into Cli as if they
//    were declared there. Keeping them in their own struct gives the
//    seconds -> EngineConfig conversion a home.
//
// 2. `global = true` makes a flag valid after any subcommand, so
//    `wcag-guardian audit x --tool-timeout 30` and
//    `wcag-guardian --tool-timeout 30 audit x` both work.
// -----------------------------------------------------------------------------
