//! Error types for ecs-cli-integ
//!
//! Library modules return `crate::error::Result<T>` which carries
//! `IntegError`. The binary uses `anyhow::Result<T>` at the top level and
//! converts at the boundary, preserving error chains.
//!
//! Configuration problems get their own `ConfigError` and are folded into
//! `IntegError::Config` via `#[from]`.

use thiserror::Error;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum IntegError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to launch {program}: {source}")]
    CommandLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Command {program} {args:?} exited with code {code:?}\nStdout:\n{stdout}\nStderr:\n{stderr}"
    )]
    CommandFailed {
        program: String,
        args: Vec<String>,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("CloudFormation error: {0}")]
    CloudFormation(String),

    #[error("Stack {stack_name} not found: {reason}")]
    StackNotFound { stack_name: String, reason: String },

    #[error("ECS error: {0}")]
    Ecs(String),

    #[error(
        "Cluster {cluster} failed to get active container instances after {elapsed_secs} seconds"
    )]
    PollTimeout { cluster: String, elapsed_secs: u64 },

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, IntegError>;
