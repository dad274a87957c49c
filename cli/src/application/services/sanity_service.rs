//! Application service: `sanity-check` environment probes.

use serde::Serialize;

use crate::application::ports::{AppManager, CredentialProbe, CredentialStore, ModalAccount};
use crate::application::services::{app_service, auth_service};
use crate::domain::apps::deployed;

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
    /// A failing required check makes the command exit non-zero.
    pub required: bool,
}

/// All check results, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SanityReport {
    pub checks: Vec<Check>,
}

impl SanityReport {
    /// `true` when every required check passed.
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.checks.iter().all(|c| c.passed || !c.required)
    }

    fn push(&mut self, name: &'static str, passed: bool, detail: String, required: bool) {
        self.checks.push(Check {
            name,
            passed,
            detail,
            required,
        });
    }
}

/// Check the modal CLI, credentials and account reachability.
///
/// Never fails; every problem becomes a failed check. Later probes that
/// depend on an earlier failure are skipped.
pub async fn run_checks(
    modal: &(impl ModalAccount + AppManager),
    probe: &impl CredentialProbe,
    store: &impl CredentialStore,
) -> SanityReport {
    let mut report = SanityReport::default();

    let cli_ok = match modal.version().await {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            report.push("modal CLI", true, version, true);
            true
        }
        Ok(out) => {
            let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
            report.push("modal CLI", false, stderr, true);
            false
        }
        Err(e) => {
            report.push(
                "modal CLI",
                false,
                format!("{e:#} (install with: pip install modal)"),
                true,
            );
            false
        }
    };

    let auth_ok = match auth_service::detect(probe, store) {
        Ok(Some(auth)) => {
            let detail = format!("{} via {}", auth.config.masked_token_id(), auth.source);
            report.push("credentials", true, detail, true);
            true
        }
        Ok(None) => {
            report.push(
                "credentials",
                false,
                "none found (run: gradio-modal auth)".to_string(),
                true,
            );
            false
        }
        Err(e) => {
            report.push("credentials", false, format!("{e:#}"), true);
            false
        }
    };

    if cli_ok && auth_ok {
        match app_service::list_apps(modal).await {
            Ok(apps) => {
                let live = deployed(&apps).len();
                report.push("Modal account", true, "reachable".to_string(), true);
                report.push("deployed apps", true, live.to_string(), false);
            }
            Err(e) => report.push("Modal account", false, format!("{e:#}"), true),
        }
    } else {
        report.push(
            "Modal account",
            false,
            "skipped (fix the checks above first)".to_string(),
            true,
        );
    }

    report
}
