//! Modal credential records and their validation.
//!
//! Pure functions only: parsing of `~/.modal.toml` content happens here,
//! reading the file is the infrastructure layer's job.

use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::error::AuthError;

pub const TOKEN_ID_PREFIX: &str = "ak-";
pub const TOKEN_SECRET_PREFIX: &str = "as-";

/// Environment variables the `modal` CLI reads credentials from.
pub const ENV_TOKEN_ID: &str = "MODAL_TOKEN_ID";
pub const ENV_TOKEN_SECRET: &str = "MODAL_TOKEN_SECRET";

/// A Modal token pair, optionally tagged with its workspace.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalAuthConfig {
    pub token_id: String,
    pub token_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl ModalAuthConfig {
    /// Build and validate a token pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either token lacks its Modal prefix.
    pub fn new(token_id: &str, token_secret: &str, workspace: Option<&str>) -> Result<Self> {
        let cfg = Self {
            token_id: token_id.trim().to_string(),
            token_secret: token_secret.trim().to_string(),
            workspace: workspace.map(str::to_string),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check both tokens carry their Modal prefixes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidTokenId` or `AuthError::InvalidTokenSecret`.
    pub fn validate(&self) -> Result<(), AuthError> {
        if !is_valid_token(&self.token_id, TOKEN_ID_PREFIX) {
            return Err(AuthError::InvalidTokenId);
        }
        if !is_valid_token(&self.token_secret, TOKEN_SECRET_PREFIX) {
            return Err(AuthError::InvalidTokenSecret);
        }
        Ok(())
    }

    /// Token id with everything after the first four characters past the prefix hidden.
    #[must_use]
    pub fn masked_token_id(&self) -> String {
        mask_token(&self.token_id)
    }

    /// `(name, value)` pairs to export to `modal` subprocesses.
    #[must_use]
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        vec![
            (ENV_TOKEN_ID.to_string(), self.token_id.clone()),
            (ENV_TOKEN_SECRET.to_string(), self.token_secret.clone()),
        ]
    }
}

impl fmt::Debug for ModalAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalAuthConfig")
            .field("token_id", &self.masked_token_id())
            .field("token_secret", &"***")
            .field("workspace", &self.workspace)
            .finish()
    }
}

fn is_valid_token(token: &str, prefix: &str) -> bool {
    token
        .strip_prefix(prefix)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// `ak-1234…` style masking; short values are hidden entirely.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(7).collect();
    if token.chars().count() <= 7 {
        "***".to_string()
    } else {
        format!("{visible}…")
    }
}

/// Where the active credentials were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSource {
    /// `MODAL_TOKEN_ID` / `MODAL_TOKEN_SECRET` in the environment.
    Environment,
    /// A profile in `~/.modal.toml`.
    ModalToml { profile: String },
    /// The token pair saved by `gradio-modal auth`.
    Stored,
}

impl fmt::Display for AuthSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment variables"),
            Self::ModalToml { profile } => write!(f, "~/.modal.toml (profile '{profile}')"),
            Self::Stored => f.write_str("saved gradio-modal credentials"),
        }
    }
}

/// Credentials plus their origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedAuth {
    pub source: AuthSource,
    pub config: ModalAuthConfig,
}

/// Pick the active profile from `~/.modal.toml` content.
///
/// The profile flagged `active = true` wins; otherwise a lone profile is
/// used. Profiles with missing or malformed tokens are skipped.
///
/// # Errors
///
/// Returns an error if the content is not valid TOML.
pub fn parse_modal_toml(content: &str) -> Result<Option<(String, ModalAuthConfig)>> {
    let table: toml::Table = content.parse().context("parsing ~/.modal.toml")?;

    let profiles: Vec<(String, ModalAuthConfig, bool)> = table
        .iter()
        .filter_map(|(name, value)| {
            let section = value.as_table()?;
            let id = section.get("token_id")?.as_str()?;
            let secret = section.get("token_secret")?.as_str()?;
            let active = section
                .get("active")
                .and_then(toml::Value::as_bool)
                .unwrap_or(false);
            let cfg = ModalAuthConfig::new(id, secret, Some(name.as_str())).ok()?;
            Some((name.clone(), cfg, active))
        })
        .collect();

    if let Some((name, cfg, _)) = profiles.iter().find(|(_, _, active)| *active) {
        return Ok(Some((name.clone(), cfg.clone())));
    }
    if let [(name, cfg, _)] = profiles.as_slice() {
        return Ok(Some((name.clone(), cfg.clone())));
    }
    Ok(None)
}
