//! `gradio-modal auth`: log in to Modal.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::auth_service;
use crate::domain::ModalAuthConfig;
use crate::output::TerminalReporter;
use crate::output::reporter::SilentReporter;

/// Arguments for the auth command.
#[derive(Args, Debug, Default)]
pub struct AuthArgs {
    /// Modal token id (starts with `ak-`)
    #[arg(long, requires = "token_secret")]
    pub token_id: Option<String>,

    /// Modal token secret (starts with `as-`)
    #[arg(long, requires = "token_id")]
    pub token_secret: Option<String>,

    /// Modal workspace / profile the token belongs to
    #[arg(long)]
    pub workspace: Option<String>,

    /// Run `modal setup` even when credentials already exist
    #[arg(long)]
    pub force: bool,
}

/// Run the auth command.
///
/// # Errors
///
/// Returns an error if the tokens are malformed or the `modal` CLI fails.
pub async fn run(app: &AppContext, args: AuthArgs) -> Result<ExitCode> {
    let modal = app.modal(None);

    if let (Some(id), Some(secret)) = (&args.token_id, &args.token_secret) {
        let auth = ModalAuthConfig::new(id, secret, args.workspace.as_deref())?;
        if app.is_json() {
            auth_service::login_with_tokens(&modal, &app.credential_store, &SilentReporter, &auth)
                .await?;
            print_json(&auth)?;
        } else {
            let reporter = TerminalReporter::new(&app.output);
            auth_service::login_with_tokens(&modal, &app.credential_store, &reporter, &auth)
                .await?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !args.force
        && let Some(found) = app.detect_auth()?
    {
        if app.is_json() {
            print_json(&found.config)?;
        } else {
            app.output.success(&format!(
                "Already authenticated ({} via {})",
                found.config.masked_token_id(),
                found.source
            ));
            app.output.info("Pass --force to run 'modal setup' again");
        }
        return Ok(ExitCode::SUCCESS);
    }

    anyhow::ensure!(
        !app.non_interactive,
        "no credentials found; pass --token-id and --token-secret in non-interactive mode"
    );
    let found = auth_service::interactive_setup(
        &modal,
        &app.probe,
        &app.credential_store,
        &TerminalReporter::new(&app.output),
    )
    .await?;
    if app.is_json() {
        print_json(&found.config)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json(auth: &ModalAuthConfig) -> Result<()> {
    let obj = serde_json::json!({
        "authenticated": true,
        "token_id": auth.masked_token_id(),
        "workspace": auth.workspace,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
