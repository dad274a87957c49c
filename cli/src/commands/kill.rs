//! `gradio-modal kill-a-deployment`: stop a deployed app.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::app_service;
use crate::domain::DeployError;
use crate::domain::apps::{AppSummary, deployed};
use crate::output::progress;

/// Arguments for the kill-a-deployment command.
#[derive(Args, Debug, Default)]
pub struct KillArgs {
    /// App id or name (prompted for when omitted)
    pub app_id: Option<String>,
}

/// Run the kill-a-deployment command.
///
/// # Errors
///
/// Returns an error if no app can be chosen or `modal app stop` fails.
pub async fn run(app: &AppContext, args: KillArgs) -> Result<ExitCode> {
    let modal = app.modal_with_detected_auth();

    let target = match args.app_id {
        Some(id) => id,
        None => {
            let apps = deployed(&app_service::list_apps(&modal).await?);
            pick_app(app, &apps)?.app_id
        }
    };

    if !app.confirm(&format!("Stop {target}?"), true)? {
        app.output.info("Cancelled");
        return Ok(ExitCode::SUCCESS);
    }

    let pb = progress::spinner_if(app.show_progress(), &format!("Stopping {target}..."));
    match app_service::stop_app(&modal, &target).await {
        Ok(()) => progress::finish_ok(&pb, &format!("Stopped {target}")),
        Err(e) => {
            progress::finish_error(&pb, &format!("Could not stop {target}"));
            return Err(e);
        }
    }

    if app.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "stopped": target }))?
        );
    } else if !app.show_progress() {
        app.output.success(&format!("Stopped {target}"));
    }
    Ok(ExitCode::SUCCESS)
}

/// Choose among deployed apps: prompt when interactive, otherwise only a
/// single candidate is accepted.
///
/// # Errors
///
/// Returns `DeployError::NoDeployedApps` or `DeployError::AmbiguousApp`,
/// or a prompt error.
pub fn pick_app(app: &AppContext, apps: &[AppSummary]) -> Result<AppSummary> {
    match apps {
        [] => Err(DeployError::NoDeployedApps.into()),
        [one] => Ok(one.clone()),
        many if app.non_interactive => Err(DeployError::AmbiguousApp(
            many.iter()
                .map(|a| a.app_id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
        .into()),
        many => {
            let labels: Vec<String> = many.iter().map(AppSummary::label).collect();
            let index = app.select("Select an app", &labels)?;
            Ok(many[index].clone())
        }
    }
}
