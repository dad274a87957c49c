//! Application service: Modal credential detection and login.

use anyhow::{Context, Result};

use crate::application::ports::{CredentialProbe, CredentialStore, ModalAccount, ProgressReporter};
use crate::domain::auth::parse_modal_toml;
use crate::domain::{AuthError, AuthSource, DetectedAuth, ModalAuthConfig};

/// Find active credentials: environment, then `~/.modal.toml`, then the saved pair.
///
/// Malformed environment tokens are ignored with a debug log so a stale
/// shell export does not mask a working `~/.modal.toml`.
///
/// # Errors
///
/// Returns an error if `~/.modal.toml` or the saved credentials exist but
/// cannot be read.
pub fn detect(
    probe: &impl CredentialProbe,
    store: &impl CredentialStore,
) -> Result<Option<DetectedAuth>> {
    if let Some((id, secret)) = probe.env_tokens() {
        match ModalAuthConfig::new(&id, &secret, None) {
            Ok(config) => {
                return Ok(Some(DetectedAuth {
                    source: AuthSource::Environment,
                    config,
                }));
            }
            Err(e) => tracing::debug!("ignoring MODAL_TOKEN_* env vars: {e}"),
        }
    }

    if let Some(content) = probe.modal_toml()? {
        if let Some((profile, config)) = parse_modal_toml(&content)? {
            return Ok(Some(DetectedAuth {
                source: AuthSource::ModalToml { profile },
                config,
            }));
        }
    }

    Ok(store.load()?.map(|config| DetectedAuth {
        source: AuthSource::Stored,
        config,
    }))
}

/// Like [`detect`], but missing credentials are an error.
///
/// # Errors
///
/// Returns `AuthError::NotAuthenticated` when no source has credentials.
pub fn require(
    probe: &impl CredentialProbe,
    store: &impl CredentialStore,
) -> Result<DetectedAuth> {
    detect(probe, store)?.ok_or_else(|| AuthError::NotAuthenticated.into())
}

/// Register a token pair with the `modal` CLI and save it locally.
///
/// # Errors
///
/// Returns an error if `modal token set` fails or the pair cannot be saved.
pub async fn login_with_tokens(
    account: &impl ModalAccount,
    store: &impl CredentialStore,
    reporter: &impl ProgressReporter,
    auth: &ModalAuthConfig,
) -> Result<()> {
    reporter.step("Registering token with the modal CLI...");
    let output = account.set_token(auth).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("modal token set failed: {}", stderr.trim());
    }
    store.save(auth).context("saving credentials")?;
    reporter.success(&format!("Token {} saved", auth.masked_token_id()));
    Ok(())
}

/// Run the interactive `modal setup` flow, then detect what it left behind.
///
/// # Errors
///
/// Returns an error if `modal setup` cannot run or exits non-zero, or
/// `AuthError::NotAuthenticated` if no credentials are found afterwards.
pub async fn interactive_setup(
    account: &impl ModalAccount,
    probe: &impl CredentialProbe,
    store: &impl CredentialStore,
    reporter: &impl ProgressReporter,
) -> Result<DetectedAuth> {
    reporter.step("Launching 'modal setup' (a browser window will open)...");
    let status = account.setup().await?;
    anyhow::ensure!(status.success(), "modal setup exited with {status}");
    let found = require(probe, store)?;
    reporter.success(&format!(
        "Authenticated ({} via {})",
        found.config.masked_token_id(),
        found.source
    ));
    Ok(found)
}
