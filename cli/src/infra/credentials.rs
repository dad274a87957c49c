//! Credential discovery and persistence.
//!
//! `EnvCredentialProbe` looks at the process environment and `~/.modal.toml`;
//! `JsonCredentialStore` keeps the pair saved by `gradio-modal auth`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CredentialProbe, CredentialStore};
use crate::domain::ModalAuthConfig;
use crate::domain::auth::{ENV_TOKEN_ID, ENV_TOKEN_SECRET};
use crate::infra::fs::{home_dir, tool_dir, write_private};

/// Overrides the credential file location.
pub const AUTH_PATH_ENV: &str = "GRADIO_MODAL_AUTH";

/// Overrides where `~/.modal.toml` is read from (same variable the modal CLI uses).
pub const MODAL_CONFIG_PATH_ENV: &str = "MODAL_CONFIG_PATH";

/// Reads credentials from the environment and `~/.modal.toml`.
pub struct EnvCredentialProbe;

impl EnvCredentialProbe {
    fn modal_toml_path() -> Result<PathBuf> {
        if let Ok(val) = std::env::var(MODAL_CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        Ok(home_dir()?.join(".modal.toml"))
    }
}

impl CredentialProbe for EnvCredentialProbe {
    fn env_tokens(&self) -> Option<(String, String)> {
        let id = std::env::var(ENV_TOKEN_ID).ok().filter(|v| !v.is_empty())?;
        let secret = std::env::var(ENV_TOKEN_SECRET)
            .ok()
            .filter(|v| !v.is_empty())?;
        Some((id, secret))
    }

    fn modal_toml(&self) -> Result<Option<String>> {
        let path = Self::modal_toml_path()?;
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("cannot read {}", path.display()))
    }
}

/// Saves the token pair as JSON in `~/.gradio-modal/auth.json`.
pub struct JsonCredentialStore;

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Option<ModalAuthConfig>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let auth: ModalAuthConfig = serde_json::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        auth.validate()
            .with_context(|| format!("invalid credentials in {}", path.display()))?;
        Ok(Some(auth))
    }

    fn save(&self, auth: &ModalAuthConfig) -> Result<()> {
        let path = self.path()?;
        let content = serde_json::to_string_pretty(auth).context("cannot serialize credentials")?;
        write_private(&path, &content)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var(AUTH_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        Ok(tool_dir()?.join("auth.json"))
    }
}
