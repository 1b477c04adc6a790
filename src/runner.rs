//! Subprocess runner for the CLI under test
//!
//! Locates the ecs-cli binary and executes it synchronously, capturing both
//! output streams. A non-zero exit becomes an error with the full output
//! attached, so a failed run can be diagnosed from the test log alone.
//! A single invocation attempt, never retried.

use crate::error::{IntegError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Environment variable overriding the location of the binary under test.
pub const BIN_ENV: &str = "ECS_CLI_BIN";

// Default location relative to the checkout root where the build drops the
// binary.
const DEFAULT_BIN_PATH: &str = "bin/local/ecs-cli";

/// Runs the CLI under test.
pub struct CliRunner {
    bin: PathBuf,
}

/// Captured output of one successful CLI invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CliRunner {
    /// Locate the binary under test.
    ///
    /// Resolution order: `ECS_CLI_BIN` environment variable, then the
    /// config-provided path, then the default relative path (suffixed with
    /// `.exe` on Windows).
    pub fn locate(override_path: Option<&Path>) -> Self {
        let bin = std::env::var_os(BIN_ENV)
            .map(PathBuf::from)
            .or_else(|| override_path.map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from(platform_bin_path(DEFAULT_BIN_PATH)));
        Self { bin }
    }

    /// Runner for an explicit binary path.
    pub fn new(bin: PathBuf) -> Self {
        Self { bin }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Build the subprocess invocation without running it.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        cmd
    }

    /// Run the CLI once and capture its output.
    ///
    /// Spawn failure and non-zero exit are both errors; the latter carries
    /// the exit code and both output streams.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("Running {} {:?}", self.bin.display(), args);
        let output = self
            .command(args)
            .output()
            .map_err(|e| IntegError::CommandLaunch {
                program: self.bin.display().to_string(),
                source: e,
            })?;
        self.check_exit(args, output)
    }

    fn check_exit(&self, args: &[&str], output: Output) -> Result<CommandOutput> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(IntegError::CommandFailed {
                program: self.bin.display().to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
                code: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

fn platform_bin_path(base: &str) -> String {
    if cfg!(windows) {
        format!("{}.exe", base)
    } else {
        base.to_string()
    }
}

/// Split a row of tabular CLI output into columns, collapsing arbitrary
/// whitespace runs.
pub fn split_row_values(row: &str) -> Vec<String> {
    let spaces = Regex::new(r"\s+").unwrap();
    spaces
        .split(row.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_bin_path_suffix() {
        let path = platform_bin_path("bin/local/ecs-cli");
        if cfg!(windows) {
            assert_eq!(path, "bin/local/ecs-cli.exe");
        } else {
            assert_eq!(path, "bin/local/ecs-cli");
        }
    }

    #[test]
    fn test_command_carries_args() {
        let runner = CliRunner::new(PathBuf::from("ecs-cli"));
        let cmd = runner.command(&["up", "-c", "demo", "--capability-iam", "--force"]);
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["up", "-c", "demo", "--capability-iam", "--force"]);
    }

    #[test]
    fn test_split_row_values_collapses_whitespace() {
        assert_eq!(
            split_row_values("  demo \t ACTIVE   2 "),
            vec!["demo", "ACTIVE", "2"]
        );
        assert!(split_row_values("   ").is_empty());
    }
}
