//! External tool execution
//!
//! Every `gem` and `ruby` invocation goes through [`CommandRunner`] so that
//! the workflow can be exercised without a Ruby installation.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, install::command_failed};

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited successfully
    pub success: bool,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given stderr
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Best description of why the command failed
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Runs external programs
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `working_dir`
    ///
    /// Returns an error only when the program could not be started; a
    /// non-zero exit is reported through [`CommandOutput::success`].
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> Result<CommandOutput>;
}

/// Runner that spawns real processes
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> Result<CommandOutput> {
        let command_line = display_command(program, args);
        tracing::debug!(command = %command_line, "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| command_failed(command_line.clone(), e.to_string()))?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(command = %command_line, success = result.success, "finished");
        Ok(result)
    }
}

/// Render a command line for messages and logs
pub fn display_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        assert_eq!(display_command("gem", &[]), "gem");
        assert_eq!(
            display_command("gem", &["env".to_string(), "gemdir".to_string()]),
            "gem env gemdir"
        );
    }

    #[test]
    fn test_failure_reason_prefers_stderr() {
        let output = CommandOutput {
            success: false,
            stdout: "partial".to_string(),
            stderr: "ERROR: Could not find a valid gem\n".to_string(),
        };
        assert_eq!(output.failure_reason(), "ERROR: Could not find a valid gem");
        assert_eq!(CommandOutput::failed("").failure_reason(), "");
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let runner = SystemCommandRunner;
        let result = runner.run(
            "bundleup-definitely-not-a-program",
            &[],
            &std::env::temp_dir(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_system_runner_error_names_command_line() {
        let args = vec!["--frobnicate".to_string()];
        let err = SystemCommandRunner
            .run("bundleup-missing-tool", &args, &std::env::temp_dir())
            .unwrap_err();
        assert!(err.to_string().contains("bundleup-missing-tool --frobnicate"));
    }
}
