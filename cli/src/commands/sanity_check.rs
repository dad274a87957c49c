//! `gradio-modal sanity-check`: verify the local Modal setup.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::sanity_service::{self, SanityReport};
use crate::output::progress;

/// Run the sanity-check command.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails; failed checks
/// produce a non-zero exit code instead.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let modal = app.modal_with_detected_auth();

    let pb = progress::spinner_if(app.show_progress(), "Checking Modal setup...");
    let report =
        sanity_service::run_checks(&modal, &app.probe, &app.credential_store).await;
    if report.healthy() {
        progress::finish_ok(&pb, "Checks finished");
    } else {
        progress::finish_error(&pb, "Checks finished with failures");
    }

    if app.is_json() {
        let obj = serde_json::json!({
            "healthy": report.healthy(),
            "checks": report.checks,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        print_human(app, &report);
    }

    Ok(if report.healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_human(app: &AppContext, report: &SanityReport) {
    let out = &app.output;
    out.header("Sanity check");
    for check in &report.checks {
        let line = format!("{}: {}", check.name, check.detail);
        if check.passed {
            out.success(&line);
        } else if check.required {
            out.fail(&line);
        } else {
            out.warn(&line);
        }
    }
    if report.healthy() {
        out.success("Ready to deploy");
    }
}
