//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::{ModalAuthConfig, ToolConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Modal Ports ───────────────────────────────────────────────────────────────

/// `modal deploy`.
#[allow(async_fn_in_trait)]
pub trait AppDeployer {
    /// Deploy the given file, capturing output. Fails only if the process
    /// cannot run or times out; a non-zero exit is returned as `Output`.
    async fn deploy(&self, file: &Path, timeout: Duration) -> Result<Output>;
}

/// `modal app ...` management commands.
#[allow(async_fn_in_trait)]
pub trait AppManager {
    /// `modal app list --json`.
    async fn list_apps(&self) -> Result<Output>;
    /// `modal app stop <app>`.
    async fn stop_app(&self, app: &str) -> Result<Output>;
    /// `modal app logs <app>` with inherited stdio.
    async fn stream_logs(&self, app: &str) -> Result<ExitStatus>;
}

/// Account-level `modal` commands.
#[allow(async_fn_in_trait)]
pub trait ModalAccount {
    /// `modal --version`.
    async fn version(&self) -> Result<Output>;
    /// `modal setup` with inherited stdio (opens a browser).
    async fn setup(&self) -> Result<ExitStatus>;
    /// `modal token set --token-id .. --token-secret ..`.
    async fn set_token(&self, auth: &ModalAuthConfig) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Credential Ports ──────────────────────────────────────────────────────────

/// Places Modal credentials may already live outside this tool.
pub trait CredentialProbe {
    /// `(MODAL_TOKEN_ID, MODAL_TOKEN_SECRET)` when both are set and non-empty.
    fn env_tokens(&self) -> Option<(String, String)>;
    /// Raw content of `~/.modal.toml`, `None` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn modal_toml(&self) -> Result<Option<String>>;
}

/// Persistence of the token pair saved by `gradio-modal auth`.
pub trait CredentialStore {
    /// Load saved credentials, `None` when nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<ModalAuthConfig>>;
    /// Save credentials, readable only by the current user.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, auth: &ModalAuthConfig) -> Result<()>;
    /// Location of the credential file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Persistence of the tool's own configuration.
pub trait ConfigStore {
    /// Load configuration, defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ToolConfig>;
    /// Save configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &ToolConfig) -> Result<()>;
    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Reading user sources and writing generated deployment files.
pub trait SourceFs {
    /// Read a UTF-8 source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_source(&self, path: &Path) -> Result<String>;
    /// Write a generated file, replacing any previous version atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write_generated(&self, path: &Path, content: &str) -> Result<()>;
}
