//! Flow process invocation.

use crate::error::{FlowError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Outcome of one Flow invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit status (0 = clean, -1 when terminated by a signal).
    pub exit_status: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl InvocationResult {
    pub fn new(exit_status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether Flow reported a clean status (exit status 0).
    pub fn passed(&self) -> bool {
        self.exit_status == 0
    }

    /// stdout followed by stderr, as one blob.
    pub fn combined_output(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        combined.push_str(&self.stderr);
        combined
    }
}

/// Capability to run the type checker with a set of flags.
///
/// Implementations block until the tool exits. A non-zero exit status is an
/// ordinary `Ok` result; only a failure to start the tool is an error.
pub trait FlowRunner {
    fn run(&self, flags: &[String]) -> Result<InvocationResult>;
}

impl<F> FlowRunner for F
where
    F: Fn(&[String]) -> Result<InvocationResult>,
{
    fn run(&self, flags: &[String]) -> Result<InvocationResult> {
        self(flags)
    }
}

/// Runs a real executable and captures both output streams in full.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
    current_dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// Runner for the given executable. The path is not validated here.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            current_dir: None,
        }
    }

    /// Run the tool from `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl FlowRunner for ProcessRunner {
    fn run(&self, flags: &[String]) -> Result<InvocationResult> {
        let mut command = Command::new(&self.program);
        command
            .args(flags)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        debug!(program = %self.program.display(), ?flags, "Spawning type checker");

        let output = command.output().map_err(|source| FlowError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        Ok(InvocationResult {
            exit_status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invocation_result_passed() {
        assert!(InvocationResult::new(0, "", "").passed());
        assert!(!InvocationResult::new(2, "", "").passed());
    }

    #[test]
    fn test_combined_output_is_stdout_then_stderr() {
        let result = InvocationResult::new(2, "out\n", "err\n");
        assert_eq!(result.combined_output(), "out\nerr\n");
    }

    #[test]
    fn test_closure_runner_receives_flags() {
        let runner = |flags: &[String]| -> Result<InvocationResult> {
            Ok(InvocationResult::new(0, flags.join(" "), ""))
        };
        let result = runner.run(&flags(&["status", "--color=always"])).expect("run");
        assert_eq!(result.stdout, "status --color=always");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_streams_and_status() {
        let runner = ProcessRunner::new("sh");
        let result = runner
            .run(&flags(&["-c", "echo hello; echo oops >&2; exit 2"]))
            .expect("run");
        assert_eq!(result.exit_status, 2);
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(result.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_uses_current_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(".flowconfig"), "[options]\n").expect("write");
        let runner = ProcessRunner::new("sh").in_dir(dir.path());
        let result = runner.run(&flags(&["-c", "ls -a"])).expect("run");
        assert!(result.stdout.contains(".flowconfig"));
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let runner = ProcessRunner::new("/nonexistent/flowcheck-test/flow");
        let err = runner.run(&flags(&["status"])).unwrap_err();
        assert!(matches!(err, FlowError::Launch { .. }));
    }
}
