// src/tools/process.rs
// =============================================================================
// Subprocess plumbing for the external scanners.
//
// ProcessLauncher is the seam: SystemLauncher finds binaries on PATH with
// `which` and runs them through tokio::process; tests swap in fakes.
//
// The child is spawned with kill_on_drop, so when the timeout wins the race
// and the wait future is dropped, the process goes with it.
// =============================================================================

use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Finds and runs external programs
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Resolve a program name to an executable path, None if absent
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run to completion, or fail once `timeout` has elapsed
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> EngineResult<ProcessOutput>;
}

/// The real launcher: PATH lookup plus tokio::process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[async_trait]
impl ProcessLauncher for SystemLauncher {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> EngineResult<ProcessOutput> {
        let name = program_name(program);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| EngineError::tool(&name, format!("failed to start: {}", e)))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ProcessOutput {
                success: output.status.success(),
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }),
            Ok(Err(e)) => Err(EngineError::tool(&name, format!("failed while running: {}", e))),
            Err(_) => Err(EngineError::tool(
                &name,
                format!("timed out after {:?}", timeout),
            )),
        }
    }
}

fn program_name(program: &Path) -> String {
    program
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("process")
        .to_string()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_locate() {
        assert!(SystemLauncher.locate("sh").is_some());
        assert!(SystemLauncher
            .locate("definitely-not-a-real-binary-3f9a")
            .is_none());
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let sh = SystemLauncher.locate("sh").unwrap();
        let output = SystemLauncher
            .run(&sh, &args(&["-c", "echo out; echo err >&2; exit 3"]), Duration::from_secs(10))
            .await
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_timeout_is_an_error() {
        let sleep = SystemLauncher.locate("sleep").unwrap();
        let err = SystemLauncher
            .run(&sleep, &args(&["5"]), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::tool("sleep", "timed out after 100ms"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_an_error() {
        let err = SystemLauncher
            .run(Path::new("/nonexistent/scanner"), &[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("scanner failed: failed to start"));
    }
}
