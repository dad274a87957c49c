//! Shared mock infrastructure for unit tests.
//!
//! Provides canned port implementations so each test file doesn't have to
//! re-define the same boilerplate. Mocks record their calls in `RefCell`s;
//! tests run on a current-thread runtime.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use gradio_modal::application::ports::{
    AppDeployer, AppManager, CommandRunner, ConfigStore, CredentialProbe, CredentialStore,
    ModalAccount, ProgressReporter, SourceFs,
};
use gradio_modal::domain::{ModalAuthConfig, ToolConfig};

use crate::helpers::{exit_status, ok_output};

// ── Fake modal CLI ───────────────────────────────────────────────────────────

/// Canned responses for every `modal` port. `None` means "could not spawn".
pub struct FakeModal {
    pub deploy: Option<Output>,
    pub list: Option<Output>,
    pub stop: Option<Output>,
    pub version: Option<Output>,
    pub token_set: Option<Output>,
    pub calls: RefCell<Vec<String>>,
}

impl Default for FakeModal {
    fn default() -> Self {
        Self {
            deploy: Some(ok_output(b"")),
            list: Some(ok_output(b"[]")),
            stop: Some(ok_output(b"")),
            version: Some(ok_output(b"modal client version: 1.0.0\n")),
            token_set: Some(ok_output(b"")),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeModal {
    fn answer(&self, call: String, canned: Option<&Output>) -> Result<Output> {
        self.calls.borrow_mut().push(call.clone());
        canned
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("failed to spawn modal ({call})"))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl AppDeployer for FakeModal {
    async fn deploy(&self, file: &Path, _timeout: Duration) -> Result<Output> {
        self.answer(format!("deploy {}", file.display()), self.deploy.as_ref())
    }
}

impl AppManager for FakeModal {
    async fn list_apps(&self) -> Result<Output> {
        self.answer("app list".into(), self.list.as_ref())
    }
    async fn stop_app(&self, app: &str) -> Result<Output> {
        self.answer(format!("app stop {app}"), self.stop.as_ref())
    }
    async fn stream_logs(&self, app: &str) -> Result<ExitStatus> {
        self.calls.borrow_mut().push(format!("app logs {app}"));
        Ok(exit_status(0))
    }
}

impl ModalAccount for FakeModal {
    async fn version(&self) -> Result<Output> {
        self.answer("--version".into(), self.version.as_ref())
    }
    async fn setup(&self) -> Result<ExitStatus> {
        self.calls.borrow_mut().push("setup".into());
        Ok(exit_status(0))
    }
    async fn set_token(&self, auth: &ModalAuthConfig) -> Result<Output> {
        self.answer(format!("token set {}", auth.token_id), self.token_set.as_ref())
    }
}

// ── Recording command runner ─────────────────────────────────────────────────

/// Records every invocation and answers with one canned output.
pub struct RecordingRunner {
    pub output: Output,
    pub invocations: RefCell<Vec<(String, Vec<String>, Option<Duration>)>>,
}

impl RecordingRunner {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            invocations: RefCell::new(Vec::new()),
        }
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>) {
        self.invocations.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| (*a).to_string()).collect(),
            timeout,
        ));
    }

    pub fn last_args(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .last()
            .map(|(_, args, _)| args.clone())
            .expect("at least one invocation")
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None);
        Ok(self.output.clone())
    }
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, Some(timeout));
        Ok(self.output.clone())
    }
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.record(program, args, None);
        Ok(self.output.status)
    }
}

// ── Credentials ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeProbe {
    pub env: Option<(String, String)>,
    pub modal_toml: Option<String>,
}

impl CredentialProbe for FakeProbe {
    fn env_tokens(&self) -> Option<(String, String)> {
        self.env.clone()
    }
    fn modal_toml(&self) -> Result<Option<String>> {
        Ok(self.modal_toml.clone())
    }
}

#[derive(Default)]
pub struct MemCredentialStore {
    pub saved: RefCell<Option<ModalAuthConfig>>,
}

impl MemCredentialStore {
    pub fn with(auth: ModalAuthConfig) -> Self {
        Self {
            saved: RefCell::new(Some(auth)),
        }
    }
}

impl CredentialStore for MemCredentialStore {
    fn load(&self) -> Result<Option<ModalAuthConfig>> {
        Ok(self.saved.borrow().clone())
    }
    fn save(&self, auth: &ModalAuthConfig) -> Result<()> {
        *self.saved.borrow_mut() = Some(auth.clone());
        Ok(())
    }
    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/mem/auth.json"))
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemConfigStore {
    pub config: RefCell<ToolConfig>,
    pub saves: RefCell<usize>,
}

impl ConfigStore for MemConfigStore {
    fn load(&self) -> Result<ToolConfig> {
        Ok(self.config.borrow().clone())
    }
    fn save(&self, config: &ToolConfig) -> Result<()> {
        *self.config.borrow_mut() = config.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
    fn path(&self) -> Result<PathBuf> {
        Ok(PathBuf::from("/mem/config.yaml"))
    }
}

// ── Filesystem ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemFs {
    pub sources: HashMap<PathBuf, String>,
    pub written: RefCell<HashMap<PathBuf, String>>,
}

impl MemFs {
    pub fn with_source(path: &str, content: &str) -> Self {
        let mut sources = HashMap::new();
        sources.insert(PathBuf::from(path), content.to_string());
        Self {
            sources,
            written: RefCell::new(HashMap::new()),
        }
    }

    pub fn written(&self, path: &str) -> Option<String> {
        self.written.borrow().get(Path::new(path)).cloned()
    }
}

impl SourceFs for MemFs {
    fn read_source(&self, path: &Path) -> Result<String> {
        self.sources
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path.display()))
    }
    fn write_generated(&self, path: &Path, content: &str) -> Result<()> {
        self.written
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|l| l.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("warn: {message}"));
    }
}
