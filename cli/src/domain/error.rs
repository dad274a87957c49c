//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors raised while assembling a `TemplateConfig` from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown deployment mode '{0}'. Valid modes: minimum, optimized, marimo, gradio-jupyter")]
    UnknownMode(String),

    #[error("Unknown GPU type '{0}'. Valid types: any, T4, L4, A10G, A100, A100-80GB, H100")]
    UnknownGpu(String),

    #[error("Invalid GPU count '{0}': must be between 1 and 8")]
    InvalidGpuCount(String),

    #[error("Invalid Python identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Invalid environment variable '{0}': expected KEY=VALUE")]
    InvalidEnvVar(String),

    #[error("Invalid secret name '{0}': use letters, digits, '-', '_' or '.'")]
    InvalidSecret(String),

    #[error("Invalid cron schedule '{0}': expected five space-separated fields")]
    InvalidCron(String),

    #[error("Invalid NFS volume '{0}': expected NAME or NAME:/mount/path")]
    InvalidNfs(String),

    #[error("Timeout must be between 1 and {max} seconds, got {value}")]
    InvalidTimeout { value: u64, max: u64 },

    #[error("Schedule for '{0}' does not match any --remote-function")]
    UnknownRemoteFunction(String),

    #[error("Invalid container limits: {0}")]
    InvalidContainerLimits(String),
}

// ── Auth errors ───────────────────────────────────────────────────────────────

/// Errors related to Modal credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token id: Modal token ids start with 'ak-'")]
    InvalidTokenId,

    #[error("Invalid token secret: Modal token secrets start with 'as-'")]
    InvalidTokenSecret,

    #[error("Not authenticated with Modal. Run 'gradio-modal auth' first.")]
    NotAuthenticated,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },

    #[error("Invalid assignment '{0}': expected key=value")]
    InvalidAssignment(String),
}

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Errors raised by the deploy flow and app management commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeployError {
    #[error("Source file not found: {0}")]
    SourceNotFound(String),

    #[error("Expected a Python source file (.py), got: {0}")]
    NotPython(String),

    #[error("modal deploy failed:\n{0}")]
    DeployFailed(String),

    #[error("No deployed apps found.")]
    NoDeployedApps,

    #[error("Several deployed apps found; pass one of: {0}")]
    AmbiguousApp(String),
}
