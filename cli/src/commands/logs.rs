//! `gradio-modal milk-logs`: stream logs of a deployed app.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::app_service;
use crate::commands::kill::pick_app;
use crate::domain::apps::deployed;

/// Arguments for the milk-logs command.
#[derive(Args, Debug, Default)]
pub struct LogsArgs {
    /// App id or name (the only deployed app when omitted)
    pub app: Option<String>,
}

/// Run the milk-logs command. Streams until the user interrupts.
///
/// # Errors
///
/// Returns an error if no app can be chosen or `modal app logs` fails.
pub async fn run(app: &AppContext, args: LogsArgs) -> Result<ExitCode> {
    let modal = app.modal_with_detected_auth();

    let target = match args.app {
        Some(name) => name,
        None => {
            let apps = deployed(&app_service::list_apps(&modal).await?);
            pick_app(app, &apps)?.app_id
        }
    };

    app.output.info(&format!("Streaming logs for {target} (Ctrl-C to stop)"));
    app_service::stream_logs(&modal, &target).await?;
    Ok(ExitCode::SUCCESS)
}
