//! Domain types and validators for gradio-modal configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::gpu::GpuSpec;
use crate::domain::mode::DeploymentMode;
use crate::domain::template::MAX_TIMEOUT_SECS;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "defaults.mode",
    "defaults.gpu",
    "defaults.timeout_minutes",
    "defaults.expiration_minutes",
];

const MAX_MINUTES: u64 = MAX_TIMEOUT_SECS / 60;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.gradio-modal/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ToolConfig {
    /// Defaults applied to `deploy` when flags are absent.
    #[serde(default)]
    pub defaults: DeployDefaults,
}

/// Deployment defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployDefaults {
    /// Mode used when no mode flag is passed.
    #[serde(default)]
    pub mode: DeploymentMode,
    /// GPU used when `--gpu` is absent; the mode's default applies if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<GpuSpec>,
    /// Timeout for `modal deploy` itself.
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,
    /// Serving timeout of deployed apps unless `--deploy-without-expiration`.
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: u64,
}

impl Default for DeployDefaults {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            gpu: None,
            timeout_minutes: default_timeout_minutes(),
            expiration_minutes: default_expiration_minutes(),
        }
    }
}

fn default_timeout_minutes() -> u64 {
    15
}

fn default_expiration_minutes() -> u64 {
    60
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: String| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid,
    };
    match key {
        "defaults.mode" => {
            if value.parse::<DeploymentMode>().is_err() {
                let modes: Vec<&str> = DeploymentMode::ALL.iter().map(|m| m.as_str()).collect();
                return Err(invalid(modes.join(", ")).into());
            }
        }
        "defaults.gpu" => {
            if value != "none" && value.parse::<GpuSpec>().is_err() {
                return Err(invalid("none, any, T4, L4, A10G, A100, A100-80GB, H100 (optionally :COUNT)".to_string()).into());
            }
        }
        "defaults.timeout_minutes" | "defaults.expiration_minutes" => {
            let ok = value
                .parse::<u64>()
                .is_ok_and(|m| (1..=MAX_MINUTES).contains(&m));
            if !ok {
                return Err(invalid(format!("1..={MAX_MINUTES}")).into());
            }
        }
        _ => validate_config_key(key)?,
    }
    Ok(())
}

/// Parses `key=value` as given to `config-info --set`.
///
/// # Errors
///
/// Returns an error if there is no `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidAssignment(raw.to_string()))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

impl ToolConfig {
    /// Range-checks values that bypassed `set`, e.g. a hand-edited file.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range setting.
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        validate_config_value("defaults.timeout_minutes", &d.timeout_minutes.to_string())?;
        validate_config_value("defaults.expiration_minutes", &d.expiration_minutes.to_string())?;
        Ok(())
    }

    /// Apply a validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key or value fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "defaults.mode" => self.defaults.mode = value.parse()?,
            "defaults.gpu" if value == "none" => self.defaults.gpu = None,
            "defaults.gpu" => self.defaults.gpu = Some(value.parse()?),
            "defaults.timeout_minutes" => self.defaults.timeout_minutes = value.parse()?,
            "defaults.expiration_minutes" => self.defaults.expiration_minutes = value.parse()?,
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
