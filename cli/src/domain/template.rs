//! Template configuration records and their validators.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::error::TemplateError;
use crate::domain::gpu::GpuSpec;
use crate::domain::mode::DeploymentMode;

// ── Constants ────────────────────────────────────────────────────────────────

/// Serving timeout applied unless the deployment opts out of expiration.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60 * 60;

/// Longest function timeout Modal accepts (24 hours).
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Timeout for remote functions that do not set their own.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 300;

/// Mount path used when `--nfs NAME` omits one.
pub const DEFAULT_NFS_MOUNT: &str = "/data";

/// Names probed before falling back to the attribute scan.
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["demo", "app", "interface"];

/// Fallback when the source file stem sanitizes to nothing.
pub const FALLBACK_APP_NAME: &str = "gradio-app";

const MAX_APP_NAME_LEN: usize = 64;

// ── Records ──────────────────────────────────────────────────────────────────

/// Container scaling knobs passed to `@app.function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerLimits {
    /// Containers kept warm at all times.
    pub min_containers: u32,
    /// Upper bound on containers. Gradio needs sticky sessions, so 1 by default.
    pub max_containers: Option<u32>,
    /// Seconds an idle container lingers before scaling down.
    pub scaledown_window_secs: u32,
    /// Concurrent requests served by one container.
    pub max_concurrent_inputs: u32,
}

impl ContainerLimits {
    /// Checks the bounds Modal enforces at deploy time.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_containers` is zero or below `min_containers`.
    pub fn validate(&self) -> Result<()> {
        match self.max_containers {
            Some(0) => Err(TemplateError::InvalidContainerLimits(
                "max_containers must be at least 1".to_string(),
            )
            .into()),
            Some(max) if self.min_containers > max => {
                Err(TemplateError::InvalidContainerLimits(format!(
                    "min_containers ({}) exceeds max_containers ({max})",
                    self.min_containers
                ))
                .into())
            }
            _ => Ok(()),
        }
    }
}

impl Default for ContainerLimits {
    fn default() -> Self {
        Self {
            min_containers: 0,
            max_containers: Some(1),
            scaledown_window_secs: 300,
            max_concurrent_inputs: 100,
        }
    }
}

/// An extra `@app.function` wrapping one of the user's functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFunctionConfig {
    /// Name of the function defined in the embedded source.
    pub name: String,
    pub gpu: Option<GpuSpec>,
    /// Containers kept warm for this function.
    pub keep_warm: u32,
    pub timeout_secs: u64,
    /// Five-field cron expression; runs the function on a schedule.
    pub schedule: Option<String>,
}

impl RemoteFunctionConfig {
    /// Build a remote function with default timeout and no GPU.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a valid Python identifier.
    pub fn new(name: &str) -> Result<Self> {
        validate_identifier(name)?;
        Ok(Self {
            name: name.to_string(),
            gpu: None,
            keep_warm: 0,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            schedule: None,
        })
    }

    /// Attach a cron schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression does not have five fields.
    pub fn with_schedule(mut self, cron: &str) -> Result<Self> {
        validate_cron(cron)?;
        self.schedule = Some(cron.split_whitespace().collect::<Vec<_>>().join(" "));
        Ok(self)
    }
}

/// A Modal network file system mounted into the serving container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfsVolume {
    pub name: String,
    pub mount_path: String,
}

/// Everything the renderer needs to produce one deployment file.
///
/// Built once per generation call and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    /// Modal app name.
    pub app_name: String,
    pub mode: DeploymentMode,
    /// Extra pip packages appended after the mode recipe.
    pub extra_packages: Vec<String>,
    /// Debian packages installed with `apt_install`.
    pub system_packages: Vec<String>,
    pub gpu: Option<GpuSpec>,
    /// Serving function timeout in seconds.
    pub timeout_secs: u64,
    pub limits: ContainerLimits,
    pub remote_functions: Vec<RemoteFunctionConfig>,
    pub env_vars: BTreeMap<String, String>,
    /// Names of Modal secrets injected into the container.
    pub secrets: Vec<String>,
    pub nfs: Option<NfsVolume>,
    /// Explicit symbol holding the Gradio interface.
    pub entry_point: Option<String>,
    /// File name of the embedded source, e.g. `app.py`.
    pub source_name: String,
    /// The user's source, embedded verbatim.
    pub source: String,
}

impl TemplateConfig {
    /// Config with the mode's defaults and no extras.
    #[must_use]
    pub fn new(app_name: &str, mode: DeploymentMode, source_name: &str, source: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            mode,
            extra_packages: Vec::new(),
            system_packages: Vec::new(),
            gpu: mode.default_gpu(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            limits: ContainerLimits::default(),
            remote_functions: Vec::new(),
            env_vars: BTreeMap::new(),
            secrets: Vec::new(),
            nfs: None,
            entry_point: None,
            source_name: source_name.to_string(),
            source: source.to_string(),
        }
    }

    /// Mode recipe followed by extras, duplicates removed, order kept.
    #[must_use]
    pub fn pip_packages(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let recipe = self.mode.pip_packages().into_iter().map(str::to_string);
        for pkg in recipe.chain(self.extra_packages.iter().cloned()) {
            let pkg = pkg.trim().to_string();
            if !pkg.is_empty() && !out.contains(&pkg) {
                out.push(pkg);
            }
        }
        out
    }

    /// Names probed at runtime before the attribute scan.
    #[must_use]
    pub fn entry_points(&self) -> Vec<String> {
        match &self.entry_point {
            Some(name) => vec![name.clone()],
            None => DEFAULT_ENTRY_POINTS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

// ── Validators and parsers ───────────────────────────────────────────────────

/// Derive a Modal app name from a file stem.
///
/// Lowercases, maps anything outside `[a-z0-9-]` to `-`, collapses runs of
/// dashes and trims them from both ends.
#[must_use]
pub fn sanitize_app_name(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for c in stem.chars().flat_map(char::to_lowercase) {
        let c = if c.is_ascii_alphanumeric() { c } else { '-' };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    out.truncate(MAX_APP_NAME_LEN);
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        FALLBACK_APP_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validates a Python identifier (function or variable name).
///
/// # Errors
///
/// Returns an error if `name` is empty, starts with a digit, or contains
/// anything other than ASCII letters, digits and underscores.
pub fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(TemplateError::InvalidIdentifier(name.to_string()).into());
    }
    Ok(())
}

/// Parses `KEY=VALUE`. The value may be empty and may contain `=`.
///
/// # Errors
///
/// Returns an error if there is no `=` or the key is not an identifier.
pub fn parse_env_var(raw: &str) -> Result<(String, String)> {
    let invalid = || TemplateError::InvalidEnvVar(raw.to_string());
    let (key, value) = raw.split_once('=').ok_or_else(invalid)?;
    if validate_identifier(key).is_err() {
        return Err(invalid().into());
    }
    Ok((key.to_string(), value.to_string()))
}

/// Validates a Modal secret name.
///
/// # Errors
///
/// Returns an error if the name is empty or has characters Modal rejects.
pub fn validate_secret_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(TemplateError::InvalidSecret(name.to_string()).into());
    }
    Ok(())
}

/// Checks a cron expression has exactly five whitespace-separated fields.
///
/// # Errors
///
/// Returns an error for any other field count.
pub fn validate_cron(expr: &str) -> Result<()> {
    if expr.split_whitespace().count() != 5 {
        return Err(TemplateError::InvalidCron(expr.to_string()).into());
    }
    Ok(())
}

/// Parses `NAME` or `NAME:/mount/path`.
///
/// # Errors
///
/// Returns an error if the name is empty or the mount path is not absolute.
pub fn parse_nfs(raw: &str) -> Result<NfsVolume> {
    let invalid = || TemplateError::InvalidNfs(raw.to_string());
    let (name, mount) = match raw.split_once(':') {
        Some((n, m)) => (n, m),
        None => (raw, DEFAULT_NFS_MOUNT),
    };
    if validate_secret_name(name).is_err() || !mount.starts_with('/') {
        return Err(invalid().into());
    }
    Ok(NfsVolume {
        name: name.to_string(),
        mount_path: mount.to_string(),
    })
}

/// Validates a serving timeout in seconds.
///
/// # Errors
///
/// Returns an error if the value is zero or above Modal's 24h cap.
pub fn validate_timeout(secs: u64) -> Result<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(TemplateError::InvalidTimeout {
            value: secs,
            max: MAX_TIMEOUT_SECS,
        }
        .into());
    }
    Ok(())
}

/// Converts a minute count to a validated timeout in seconds.
///
/// # Errors
///
/// Returns an error if the result is zero or above Modal's 24h cap.
pub fn timeout_from_minutes(minutes: u64) -> Result<u64> {
    let secs = minutes.saturating_mul(60);
    validate_timeout(secs)?;
    Ok(secs)
}

/// Parses `NAME` or `NAME:GPU` as given to `--remote-function`.
///
/// # Errors
///
/// Returns an error if the name is not an identifier or the GPU is unknown.
pub fn parse_remote_function(raw: &str) -> Result<RemoteFunctionConfig> {
    let (name, gpu) = match raw.split_once(':') {
        Some((n, g)) => (n, Some(g)),
        None => (raw, None),
    };
    let mut function = RemoteFunctionConfig::new(name.trim())?;
    if let Some(gpu) = gpu {
        function.gpu = Some(gpu.parse()?);
    }
    Ok(function)
}

/// Attach `NAME=CRON` to the remote function called `NAME`.
///
/// # Errors
///
/// Returns an error if the assignment is malformed, the cron expression is
/// invalid, or no remote function has that name.
pub fn apply_schedule(functions: &mut [RemoteFunctionConfig], raw: &str) -> Result<()> {
    let (name, cron) = raw
        .split_once('=')
        .ok_or_else(|| TemplateError::InvalidCron(raw.to_string()))?;
    let name = name.trim();
    let index = functions
        .iter()
        .position(|f| f.name == name)
        .ok_or_else(|| TemplateError::UnknownRemoteFunction(name.to_string()))?;
    let scheduled = functions[index].clone().with_schedule(cron)?;
    functions[index] = scheduled;
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
