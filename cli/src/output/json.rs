//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails.

use anyhow::{Context, Result};

use crate::domain::{AuthError, ConfigError, DeployError, TemplateError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for an error chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<AuthError>() {
            return "AUTH";
        }
        if cause.is::<TemplateError>() {
            return "INVALID_TEMPLATE";
        }
        if cause.is::<ConfigError>() {
            return "INVALID_CONFIG";
        }
        if cause.is::<DeployError>() {
            return "DEPLOY";
        }
    }
    "ERROR"
}
