//! Parsing of `modal` CLI output: deployed app listings and deploy URLs.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::domain::error::DeployError;

/// First `https://…modal.run` URL in deploy output.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"https://[A-Za-z0-9][A-Za-z0-9.-]*\.modal\.run(?:/[^\s'\x22<>)\]]*)?")
        .expect("valid regex")
});

/// ANSI escape sequences the modal CLI emits even when piped.
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid regex")
});

/// One row of `modal app list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppSummary {
    #[serde(rename = "App ID")]
    pub app_id: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "State", default)]
    pub state: String,
}

impl AppSummary {
    /// Whether the app is currently deployed (as opposed to stopped or ephemeral).
    #[must_use]
    pub fn is_deployed(&self) -> bool {
        self.state.to_ascii_lowercase().starts_with("deployed")
    }

    /// `description (app-id)` for selection menus.
    #[must_use]
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.app_id.clone()
        } else {
            format!("{} ({})", self.description, self.app_id)
        }
    }
}

/// Parse `modal app list --json` stdout.
///
/// # Errors
///
/// Returns an error if the output is not a JSON array of app rows.
pub fn parse_app_list(stdout: &[u8]) -> Result<Vec<AppSummary>> {
    serde_json::from_slice(stdout).context("parsing modal app list output")
}

/// Deployed apps only, in listing order.
#[must_use]
pub fn deployed(apps: &[AppSummary]) -> Vec<AppSummary> {
    apps.iter().filter(|a| a.is_deployed()).cloned().collect()
}

/// Resolve which deployed app a command without an explicit id targets.
///
/// # Errors
///
/// `DeployError::NoDeployedApps` when none are deployed,
/// `DeployError::AmbiguousApp` when several are.
pub fn single_deployed(apps: &[AppSummary]) -> Result<AppSummary, DeployError> {
    let live = deployed(apps);
    match live.as_slice() {
        [] => Err(DeployError::NoDeployedApps),
        [one] => Ok(one.clone()),
        many => Err(DeployError::AmbiguousApp(
            many.iter()
                .map(|a| a.app_id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )),
    }
}

/// Remove terminal escape sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_RE.replace_all(text, "").into_owned()
}

/// Extract the app URL from `modal deploy` output.
#[must_use]
pub fn extract_url(output: &str) -> Option<String> {
    let clean = strip_ansi(output);
    URL_RE
        .find(&clean)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
}
