//! Application service: listing, stopping and tailing deployed Modal apps.

use anyhow::{Context, Result};

use crate::application::ports::AppManager;
use crate::domain::apps::{AppSummary, parse_app_list};

/// All apps visible to the current Modal profile.
///
/// # Errors
///
/// Returns an error if `modal app list` fails or prints unparseable output.
pub async fn list_apps(modal: &impl AppManager) -> Result<Vec<AppSummary>> {
    let output = modal.list_apps().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("modal app list failed: {}", stderr.trim());
    }
    parse_app_list(&output.stdout)
}

/// Stop a deployed app by name or id.
///
/// # Errors
///
/// Returns an error if `modal app stop` exits non-zero.
pub async fn stop_app(modal: &impl AppManager, app: &str) -> Result<()> {
    let output = modal
        .stop_app(app)
        .await
        .with_context(|| format!("stopping {app}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("modal app stop {app} failed: {}", stderr.trim());
    }
    Ok(())
}

/// Stream an app's logs until the user interrupts.
///
/// # Errors
///
/// Returns an error if `modal app logs` cannot run or exits non-zero.
pub async fn stream_logs(modal: &impl AppManager, app: &str) -> Result<()> {
    let status = modal.stream_logs(app).await?;
    anyhow::ensure!(status.success(), "modal app logs {app} exited with {status}");
    Ok(())
}
