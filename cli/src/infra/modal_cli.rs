//! Infrastructure implementation of the Modal port traits.
//!
//! `ModalCli<R>` routes every `modal` invocation through a `CommandRunner`,
//! so tests can inject a recording runner instead of spawning processes.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{AppDeployer, AppManager, CommandRunner, ModalAccount};
use crate::domain::ModalAuthConfig;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Overrides the `modal` executable (a path or a name on `PATH`).
pub const MODAL_BIN_ENV: &str = "GRADIO_MODAL_BIN";

const DEFAULT_MODAL_BIN: &str = "modal";

/// Adapter over the `modal` command-line client.
pub struct ModalCli<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> ModalCli<R> {
    /// Create an adapter invoking `program` through `runner`.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// The executable this adapter invokes.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The underlying runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl ModalCli<TokioCommandRunner> {
    /// Production adapter. `envs` are exported to every `modal` process.
    #[must_use]
    pub fn default_runner(envs: Vec<(String, String)>) -> Self {
        let program =
            std::env::var(MODAL_BIN_ENV).unwrap_or_else(|_| DEFAULT_MODAL_BIN.to_string());
        Self::new(
            TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT).with_envs(envs),
            program,
        )
    }
}

impl<R: CommandRunner> AppDeployer for ModalCli<R> {
    async fn deploy(&self, file: &Path, timeout: Duration) -> Result<Output> {
        let file = file.to_string_lossy();
        self.runner
            .run_with_timeout(&self.program, &["deploy", &file], timeout)
            .await
            .context("modal deploy")
    }
}

impl<R: CommandRunner> AppManager for ModalCli<R> {
    async fn list_apps(&self) -> Result<Output> {
        self.runner
            .run(&self.program, &["app", "list", "--json"])
            .await
            .context("modal app list")
    }

    async fn stop_app(&self, app: &str) -> Result<Output> {
        self.runner
            .run(&self.program, &["app", "stop", app])
            .await
            .context("modal app stop")
    }

    async fn stream_logs(&self, app: &str) -> Result<ExitStatus> {
        self.runner
            .run_status(&self.program, &["app", "logs", app])
            .await
            .context("modal app logs")
    }
}

impl<R: CommandRunner> ModalAccount for ModalCli<R> {
    async fn version(&self) -> Result<Output> {
        self.runner
            .run(&self.program, &["--version"])
            .await
            .context("modal --version")
    }

    async fn setup(&self) -> Result<ExitStatus> {
        self.runner
            .run_status(&self.program, &["setup"])
            .await
            .context("modal setup")
    }

    async fn set_token(&self, auth: &ModalAuthConfig) -> Result<Output> {
        let mut args = vec![
            "token",
            "set",
            "--token-id",
            auth.token_id.as_str(),
            "--token-secret",
            auth.token_secret.as_str(),
        ];
        if let Some(profile) = auth.workspace.as_deref() {
            args.push("--profile");
            args.push(profile);
        }
        self.runner
            .run(&self.program, &args)
            .await
            .context("modal token set")
    }
}
