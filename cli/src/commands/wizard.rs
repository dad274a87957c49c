//! `deploy --wizard`: interactive prompts filling in deploy flags.

use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Select};

use crate::app::AppContext;
use crate::application::services::deploy_service::SourceFile;
use crate::commands::deploy::DeployArgs;
use crate::domain::config::DeployDefaults;
use crate::domain::gpu::GpuKind;
use crate::domain::template::sanitize_app_name;
use crate::domain::{DeploymentMode, GpuSpec};

/// Ask for mode, GPU, packages, expiration and app name.
///
/// Flags already given on the command line become the prompt defaults.
///
/// # Errors
///
/// Returns an error in non-interactive mode or if a prompt fails.
pub fn run(
    app: &AppContext,
    mut args: DeployArgs,
    defaults: &DeployDefaults,
    source: &SourceFile,
) -> Result<DeployArgs> {
    anyhow::ensure!(
        !app.non_interactive,
        "--wizard needs an interactive terminal (drop --yes / CI)"
    );

    app.output.header("Deployment wizard");

    let current_mode = args.mode().unwrap_or(defaults.mode);
    let mode_items: Vec<String> = DeploymentMode::ALL
        .iter()
        .map(|m| format!("{:<15} {}", m.as_str(), m.description()))
        .collect();
    let mode_index = Select::new()
        .with_prompt("Deployment mode")
        .items(&mode_items)
        .default(
            DeploymentMode::ALL
                .iter()
                .position(|m| *m == current_mode)
                .unwrap_or(0),
        )
        .interact()
        .context("mode selection")?;
    let mode = DeploymentMode::ALL[mode_index];
    args.set_mode(mode);

    let default_gpu = args
        .gpu
        .clone()
        .or_else(|| defaults.gpu.map(|g| g.to_string()))
        .or_else(|| mode.default_gpu().map(|g| g.to_string()))
        .unwrap_or_else(|| "none".to_string());
    let default_kind = default_gpu.split(':').next().unwrap_or("none");
    let gpu_items: Vec<String> = std::iter::once("none".to_string())
        .chain(GpuKind::ALL.iter().map(|k| k.as_str().to_string()))
        .collect();
    let gpu_index = Select::new()
        .with_prompt("GPU")
        .items(&gpu_items)
        .default(
            gpu_items
                .iter()
                .position(|g| g.eq_ignore_ascii_case(default_kind))
                .unwrap_or(0),
        )
        .interact()
        .context("GPU selection")?;
    args.gpu = Some(gpu_items[gpu_index].clone());
    if gpu_index > 0 {
        let count: u8 = Input::new()
            .with_prompt("GPU count")
            .default(1)
            .validate_with(|n: &u8| {
                let spec = format!("{}:{n}", gpu_items[gpu_index]);
                spec.parse::<GpuSpec>().map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()
            .context("GPU count")?;
        if count > 1 {
            args.gpu = Some(format!("{}:{count}", gpu_items[gpu_index]));
        }
    }

    let packages: String = Input::new()
        .with_prompt("Extra pip packages (comma separated)")
        .default(args.packages.join(","))
        .allow_empty(true)
        .interact_text()
        .context("package input")?;
    args.packages = packages
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    args.deploy_without_expiration = Confirm::new()
        .with_prompt("Deploy without expiration (serve up to 24h)?")
        .default(args.deploy_without_expiration)
        .interact()
        .context("expiration prompt")?;
    if args.deploy_without_expiration {
        args.expiration_minutes = None;
    }

    let app_name: String = Input::new()
        .with_prompt("App name")
        .default(
            args.app_name
                .clone()
                .unwrap_or_else(|| sanitize_app_name(&source.stem)),
        )
        .interact_text()
        .context("app name input")?;
    args.app_name = Some(app_name);

    if !args.dry_run {
        args.dry_run = !Confirm::new()
            .with_prompt("Deploy now? (no writes the file only)")
            .default(true)
            .interact()
            .context("deploy confirmation")?;
    }

    Ok(args)
}
