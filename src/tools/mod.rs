// src/tools/mod.rs
// =============================================================================
// Adapters around third-party accessibility scanners.
//
// Submodules:
// - process: Finding and running external binaries (ProcessLauncher)
// - browser: Accessibility-tree snapshots from headless Chromium
//
// The three CLI scanners (pa11y, axe, Lighthouse) all run through `invoke`,
// which never fails: a missing binary, a crash or a timeout all come back as
// a ToolOutcome variant.
// =============================================================================

mod browser;
mod process;

pub use browser::{capture_accessibility_tree, BrowserLauncher, BrowserSession, HeadlessChromium};
pub use process::{ProcessLauncher, ProcessOutput, SystemLauncher};

use crate::error::EngineError;
use crate::fetch::normalize_url;
use crate::report::{ToolOutcome, ToolResult};
use log::{debug, info, warn};
use std::time::Duration;

/// The supported CLI scanners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalTool {
    Pa11y,
    AxeDevtools,
    Lighthouse,
}

impl ExternalTool {
    pub const ALL: [ExternalTool; 3] = [
        ExternalTool::Pa11y,
        ExternalTool::AxeDevtools,
        ExternalTool::Lighthouse,
    ];

    /// Name reported in the ToolResult
    pub fn name(&self) -> &'static str {
        match self {
            ExternalTool::Pa11y => "pa11y",
            ExternalTool::AxeDevtools => "axe-devtools",
            ExternalTool::Lighthouse => "lighthouse",
        }
    }

    /// Command line for scanning `url`
    pub fn argv(&self, url: &str) -> Vec<String> {
        let args = match self {
            ExternalTool::Pa11y => vec!["npx", "pa11y", url, "--reporter", "json"],
            ExternalTool::AxeDevtools => {
                vec!["npx", "axe", url, "--tags", "wcag2a,wcag2aa", "--format", "json"]
            }
            ExternalTool::Lighthouse => vec![
                "npx",
                "lighthouse",
                url,
                "--only-categories=accessibility",
                "--quiet",
                "--output=json",
                "--chrome-flags=--headless",
            ],
        };
        args.into_iter().map(String::from).collect()
    }

    /// Parses the short names accepted on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pa11y" => Some(ExternalTool::Pa11y),
            "axe" | "axe-devtools" => Some(ExternalTool::AxeDevtools),
            "lighthouse" => Some(ExternalTool::Lighthouse),
            _ => None,
        }
    }
}

/// Runs one of the named scanners against a URL
pub async fn run_external_tool(
    tool: ExternalTool,
    url: &str,
    launcher: &dyn ProcessLauncher,
    timeout: Duration,
) -> ToolResult {
    let url = normalize_url(url);
    info!("Running {} on {}", tool.name(), url);

    let outcome = invoke(&tool.argv(&url), launcher, timeout).await;
    if let Some(error) = outcome.error() {
        warn!("{} did not produce a report: {}", tool.name(), error);
    }

    ToolResult::new(tool.name(), url, outcome)
}

/// Locate, run and capture an arbitrary command line
///
/// - binary not on PATH -> DependencyMissing naming the binary
/// - exit 0 -> stdout parsed as JSON, or Raw when it isn't JSON
/// - non-zero exit -> ExecutionError with stderr (or stdout, or the exit code)
/// - spawn failure or timeout -> ExecutionError
pub async fn invoke(
    argv: &[String],
    launcher: &dyn ProcessLauncher,
    timeout: Duration,
) -> ToolOutcome {
    let (program, args) = match argv.split_first() {
        Some(split) => split,
        None => {
            return ToolOutcome::ExecutionError {
                error: "empty command line".to_string(),
            }
        }
    };

    let path = match launcher.locate(program) {
        Some(path) => path,
        None => return missing_binary(program).into(),
    };

    debug!("Spawning {:?}", argv);

    let output = match launcher.run(&path, args, timeout).await {
        Ok(output) => output,
        Err(e) => return e.into(),
    };

    if output.success {
        match serde_json::from_str(&output.stdout) {
            Ok(value) => ToolOutcome::Parsed(value),
            Err(_) => ToolOutcome::Raw {
                stdout: output.stdout.trim().to_string(),
            },
        }
    } else {
        ToolOutcome::ExecutionError {
            error: failure_message(&output),
        }
    }
}

fn missing_binary(program: &str) -> EngineError {
    let hint = if program == "npx" {
        "Node.js is required for the external accessibility scanners."
    } else {
        "Please ensure it is installed in the system PATH."
    };
    EngineError::DependencyMissing {
        dependency: program.to_string(),
        hint: hint.to_string(),
    }
}

// stderr, else stdout, else the exit status
fn failure_message(output: &ProcessOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = output.stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    match output.exit_code {
        Some(code) => format!("exited with status {}", code),
        None => "terminated by signal".to_string(),
    }
}
