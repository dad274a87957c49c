//! Application context: unified state passed to every command handler.
//!
//! `AppContext` replaces the per-command pattern of constructing loose
//! `OutputContext`, credential, and config-store instances.
//! Adding a new cross-cutting concern requires only one field change here.

use anyhow::Result;

use crate::application::services::auth_service;
use crate::domain::{AuthSource, DetectedAuth};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::credentials::{EnvCredentialProbe, JsonCredentialStore};
use crate::infra::fs::LocalFs;
use crate::infra::modal_cli::ModalCli;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `GRADIO_MODAL_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Tool configuration persisted as YAML.
    pub config_store: YamlConfigStore,
    /// Token pair saved by `gradio-modal auth`.
    pub credential_store: JsonCredentialStore,
    /// Environment and `~/.modal.toml` credential lookup.
    pub probe: EnvCredentialProbe,
    /// Source reading and generated-file writing.
    pub fs: LocalFs,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or
    /// `GRADIO_MODAL_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("GRADIO_MODAL_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        // JSON output owns stdout; human chatter would corrupt it.
        let quiet = flags.output.quiet || flags.output.json;

        Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            config_store: YamlConfigStore,
            credential_store: JsonCredentialStore,
            probe: EnvCredentialProbe,
            fs: LocalFs,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Whether a progress spinner may draw.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.is_json() && self.output.show_progress()
    }

    /// Look up credentials from every source.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential file exists but cannot be read.
    pub fn detect_auth(&self) -> Result<Option<DetectedAuth>> {
        auth_service::detect(&self.probe, &self.credential_store)
    }

    /// `modal` adapter; tokens saved by `gradio-modal auth` are exported to it.
    ///
    /// Environment and `~/.modal.toml` credentials are already visible to
    /// the `modal` CLI and are not re-exported.
    #[must_use]
    pub fn modal(&self, auth: Option<&DetectedAuth>) -> ModalCli<TokioCommandRunner> {
        let envs = match auth {
            Some(DetectedAuth {
                source: AuthSource::Stored,
                config,
            }) => config.env_pairs(),
            _ => Vec::new(),
        };
        ModalCli::default_runner(envs)
    }

    /// `modal` adapter with whatever credentials can be found, none being fine.
    #[must_use]
    pub fn modal_with_detected_auth(&self) -> ModalCli<TokioCommandRunner> {
        let auth = self.detect_auth().ok().flatten();
        self.modal(auth.as_ref())
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or
    /// `GRADIO_MODAL_YES` env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    /// Ask the user to pick one of `items`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns an error in non-interactive mode or if the prompt fails.
    pub fn select(&self, prompt: &str, items: &[String]) -> Result<usize> {
        anyhow::ensure!(
            !self.non_interactive,
            "{prompt}: cannot prompt in non-interactive mode"
        );
        let index = dialoguer::Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()?;
        Ok(index)
    }
}
