//! `gradio-modal config-info`: show tool configuration, credentials and versions.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, CredentialStore, ModalAccount};
use crate::application::services::config_service;
use crate::domain::ToolConfig;

/// Arguments for the config-info command.
#[derive(Args, Debug, Default)]
pub struct ConfigInfoArgs {
    /// Set a value before printing, e.g. `defaults.mode=optimized` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Serialize)]
struct ConfigInfo {
    version: &'static str,
    config_path: String,
    config: ToolConfig,
    credentials_path: String,
    credentials: Option<CredentialInfo>,
    modal_version: Option<String>,
}

#[derive(Serialize)]
struct CredentialInfo {
    source: String,
    token_id: String,
    workspace: Option<String>,
}

/// Run the config-info command.
///
/// # Errors
///
/// Returns an error if an assignment is invalid or a file cannot be read.
pub async fn run(app: &AppContext, args: ConfigInfoArgs) -> Result<ExitCode> {
    let config = if args.set.is_empty() {
        config_service::load_config(&app.config_store)?
    } else {
        let config = config_service::apply_assignments(&app.config_store, &args.set)?;
        for assignment in &args.set {
            app.output.success(&format!("Set {assignment}"));
        }
        config
    };

    let auth = app.detect_auth()?;
    let modal = app.modal(auth.as_ref());
    let modal_version = match modal.version().await {
        Ok(out) if out.status.success() => {
            Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
        }
        Ok(_) | Err(_) => None,
    };

    let info = ConfigInfo {
        version: env!("CARGO_PKG_VERSION"),
        config_path: app.config_store.path()?.display().to_string(),
        config,
        credentials_path: app.credential_store.path()?.display().to_string(),
        credentials: auth.map(|a| CredentialInfo {
            source: a.source.to_string(),
            token_id: a.config.masked_token_id(),
            workspace: a.config.workspace.clone(),
        }),
        modal_version,
    };

    if app.is_json() {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_human(app, &info);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_human(app: &AppContext, info: &ConfigInfo) {
    let out = &app.output;
    let defaults = &info.config.defaults;
    out.header(&format!("gradio-modal {}", info.version));
    out.kv("Config file:", &info.config_path);
    out.kv("Default mode:", defaults.mode.as_str());
    out.kv(
        "Default GPU:",
        &defaults
            .gpu
            .map_or_else(|| "none".to_string(), |g| g.to_string()),
    );
    out.kv("Deploy timeout:", &format!("{} min", defaults.timeout_minutes));
    out.kv("Expiration:", &format!("{} min", defaults.expiration_minutes));
    out.kv("Credentials file:", &info.credentials_path);
    match &info.credentials {
        Some(c) => out.kv("Credentials:", &format!("{} via {}", c.token_id, c.source)),
        None => out.kv("Credentials:", "not found (run: gradio-modal auth)"),
    }
    out.kv(
        "modal CLI:",
        info.modal_version.as_deref().unwrap_or("not found"),
    );
}
