//! `gradio-modal deploy`: wrap a Gradio app for Modal and deploy it.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgGroup, Args};

use crate::app::AppContext;
use crate::application::services::{auth_service, config_service};
use crate::application::services::deploy_service::{
    self, DeployPlan, DeployReport, SourceFile,
};
use crate::domain::config::DeployDefaults;
use crate::domain::messages::{Locale, Message};
use crate::domain::template::{
    MAX_TIMEOUT_SECS, apply_schedule, parse_env_var, parse_nfs, parse_remote_function,
    sanitize_app_name, timeout_from_minutes, validate_identifier, validate_secret_name,
};
use crate::domain::{DeploymentMode, GpuSpec, TemplateConfig};
use crate::output::reporter::{SilentReporter, SpinnerReporter};

/// Arguments for the deploy command.
#[derive(Args, Debug, Clone, Default)]
#[command(group(ArgGroup::new("mode").args(["minimum", "optimized", "gra_jupy", "marimo"])))]
#[allow(clippy::struct_excessive_bools)]
pub struct DeployArgs {
    /// Python file defining the Gradio app
    pub file: PathBuf,

    /// Lightweight image: gradio, fastapi and uvicorn only
    #[arg(long)]
    pub minimum: bool,

    /// ML image (torch, transformers, diffusers, ...) with a GPU
    #[arg(long)]
    pub optimized: bool,

    /// Gradio plus a Jupyter notebook stack
    #[arg(long = "gra-jupy")]
    pub gra_jupy: bool,

    /// Serve the file as a marimo notebook
    #[arg(long)]
    pub marimo: bool,

    /// Choose options interactively
    #[arg(long)]
    pub wizard: bool,

    /// Write the deployment file without deploying
    #[arg(long)]
    pub dry_run: bool,

    /// Deploy, then stop the app right away
    #[arg(long)]
    pub test_deploy: bool,

    /// Keep containers serving up to Modal's 24h maximum
    #[arg(long, conflicts_with = "expiration_minutes")]
    pub deploy_without_expiration: bool,

    /// Print deploy messages in Brazilian Portuguese
    #[arg(long = "br-huehuehue")]
    pub br_huehuehue: bool,

    /// GPU type, optionally with a count (T4, L4, A10G, A100, A100-80GB, H100, any; e.g. A100:2)
    #[arg(long)]
    pub gpu: Option<String>,

    /// Minutes to wait for `modal deploy` to finish
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=1440))]
    pub timeout_minutes: Option<u64>,

    /// Minutes a serving container runs before Modal stops it
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=1440))]
    pub expiration_minutes: Option<u64>,

    /// Modal app name (defaults to the file name)
    #[arg(long)]
    pub app_name: Option<String>,

    /// Extra pip package (repeatable)
    #[arg(long = "package", value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Extra Debian package (repeatable)
    #[arg(long = "system-package", value_name = "PACKAGE")]
    pub system_packages: Vec<String>,

    /// Modal secret to inject (repeatable)
    #[arg(long = "secret", value_name = "NAME")]
    pub secrets: Vec<String>,

    /// Environment variable for the container (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env_vars: Vec<String>,

    /// Network file system to mount
    #[arg(long, value_name = "NAME[:MOUNT]")]
    pub nfs: Option<String>,

    /// Global holding the Gradio interface
    #[arg(long)]
    pub entry_point: Option<String>,

    /// Directory for the generated file (defaults to the source's directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Containers kept warm
    #[arg(long)]
    pub min_containers: Option<u32>,

    /// Upper bound on containers
    #[arg(long)]
    pub max_containers: Option<u32>,

    /// Expose a function from the file as its own Modal function (repeatable)
    #[arg(long = "remote-function", value_name = "NAME[:GPU]")]
    pub remote_functions: Vec<String>,

    /// Run a remote function on a cron schedule (repeatable)
    #[arg(long = "schedule", value_name = "NAME=CRON")]
    pub schedules: Vec<String>,
}

impl DeployArgs {
    /// Mode selected by flag, if any.
    #[must_use]
    pub fn mode(&self) -> Option<DeploymentMode> {
        if self.optimized {
            Some(DeploymentMode::Optimized)
        } else if self.gra_jupy {
            Some(DeploymentMode::GradioJupyter)
        } else if self.marimo {
            Some(DeploymentMode::Marimo)
        } else if self.minimum {
            Some(DeploymentMode::Minimum)
        } else {
            None
        }
    }

    /// Replace any mode flag with `mode`.
    pub fn set_mode(&mut self, mode: DeploymentMode) {
        self.minimum = mode == DeploymentMode::Minimum;
        self.optimized = mode == DeploymentMode::Optimized;
        self.gra_jupy = mode == DeploymentMode::GradioJupyter;
        self.marimo = mode == DeploymentMode::Marimo;
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        if self.br_huehuehue {
            Locale::BrazilianPortuguese
        } else {
            Locale::English
        }
    }
}

/// Combine flags, configured defaults and the source into a `TemplateConfig`.
///
/// # Errors
///
/// Returns an error if any flag value fails validation.
pub fn build_template(
    args: &DeployArgs,
    defaults: &DeployDefaults,
    source: &SourceFile,
) -> Result<TemplateConfig> {
    let mode = args.mode().unwrap_or(defaults.mode);
    let app_name = match &args.app_name {
        Some(name) => sanitize_app_name(name),
        None => sanitize_app_name(&source.stem),
    };
    let mut config = TemplateConfig::new(&app_name, mode, &source.file_name, &source.content);

    if let Some(gpu) = &args.gpu {
        config.gpu = if gpu.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(gpu.parse::<GpuSpec>()?)
        };
    } else if let Some(gpu) = defaults.gpu {
        config.gpu = Some(gpu);
    }

    config.timeout_secs = if args.deploy_without_expiration {
        MAX_TIMEOUT_SECS
    } else {
        timeout_from_minutes(args.expiration_minutes.unwrap_or(defaults.expiration_minutes))?
    };

    if let Some(min) = args.min_containers {
        config.limits.min_containers = min;
    }
    match args.max_containers {
        Some(max) => config.limits.max_containers = Some(max),
        // Keeping more warm containers than the default cap implies raising the cap.
        None => {
            if let Some(max) = config.limits.max_containers {
                config.limits.max_containers = Some(max.max(config.limits.min_containers));
            }
        }
    }
    config.limits.validate()?;

    config.extra_packages.clone_from(&args.packages);
    config.system_packages.clone_from(&args.system_packages);

    for secret in &args.secrets {
        validate_secret_name(secret)?;
    }
    config.secrets.clone_from(&args.secrets);

    for raw in &args.env_vars {
        let (key, value) = parse_env_var(raw)?;
        config.env_vars.insert(key, value);
    }

    config.nfs = args.nfs.as_deref().map(parse_nfs).transpose()?;

    if let Some(entry) = &args.entry_point {
        validate_identifier(entry)?;
        config.entry_point = Some(entry.clone());
    }

    config.remote_functions = args
        .remote_functions
        .iter()
        .map(|raw| parse_remote_function(raw))
        .collect::<Result<_>>()?;
    for raw in &args.schedules {
        apply_schedule(&mut config.remote_functions, raw)?;
    }

    Ok(config)
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if the source cannot be read, a flag is invalid,
/// credentials are missing, or `modal deploy` fails.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let tool_config = config_service::load_config(&app.config_store)?;
    let source = deploy_service::load_source(&app.fs, &args.file)?;

    let args = if args.wizard {
        super::wizard::run(app, args, &tool_config.defaults, &source)?
    } else {
        args
    };

    let locale = args.locale();
    let text = |m: Message| m.text(locale);
    let config = build_template(&args, &tool_config.defaults, &source)?;

    let auth = if args.dry_run {
        None
    } else {
        app.output.info(text(Message::CheckingAuth));
        let auth = auth_service::require(&app.probe, &app.credential_store)?;
        app.output
            .success(&format!("{} {}", text(Message::Authenticated), auth.source));
        Some(auth)
    };

    if args.deploy_without_expiration {
        app.output.warn(text(Message::NoExpiration));
    } else {
        app.output.kv(
            text(Message::Expiration),
            &(config.timeout_secs / 60).to_string(),
        );
    }

    let timeout_minutes = args
        .timeout_minutes
        .unwrap_or(tool_config.defaults.timeout_minutes);
    let plan = DeployPlan {
        output_path: deploy_service::output_path(&source, args.output_dir.as_deref()),
        config,
        dry_run: args.dry_run,
        test_deploy: args.test_deploy,
        deploy_timeout: Duration::from_secs(timeout_minutes.saturating_mul(60)),
        locale,
    };

    let modal = app.modal(auth.as_ref());
    let report = if app.is_json() {
        deploy_service::execute(&plan, &app.fs, &modal, &SilentReporter).await?
    } else {
        let reporter = SpinnerReporter::new(&app.output);
        let report = deploy_service::execute(&plan, &app.fs, &modal, &reporter).await;
        reporter.finish();
        report?
    };

    print_report(app, &plan, &report)?;
    Ok(ExitCode::SUCCESS)
}

fn print_report(app: &AppContext, plan: &DeployPlan, report: &DeployReport) -> Result<()> {
    if app.is_json() {
        let obj = serde_json::json!({
            "app_name": plan.config.app_name,
            "mode": plan.config.mode.as_str(),
            "output_file": report.output_path.display().to_string(),
            "deployed": report.deployed,
            "url": report.url,
            "stopped": report.stopped,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else if let Some(url) = &report.url {
        app.output.url(url);
    }
    Ok(())
}
