//! Application service: generate a deployment file and hand it to `modal deploy`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{AppDeployer, AppManager, ProgressReporter, SourceFs};
use crate::application::services::app_service;
use crate::domain::apps::extract_url;
use crate::domain::detect::{self, Detection};
use crate::domain::messages::{Locale, Message};
use crate::domain::render::{self, output_file_name};
use crate::domain::{DeployError, TemplateConfig};

/// A user source file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name with extension, e.g. `app.py`.
    pub file_name: String,
    /// File name without extension, e.g. `app`.
    pub stem: String,
    pub content: String,
}

/// Everything `execute` needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub config: TemplateConfig,
    pub output_path: PathBuf,
    /// Stop after writing the file.
    pub dry_run: bool,
    /// Stop the app right after a successful deploy.
    pub test_deploy: bool,
    /// Limit for the `modal deploy` process.
    pub deploy_timeout: Duration,
    pub locale: Locale,
}

/// What happened during `execute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub output_path: PathBuf,
    pub detection: Detection,
    pub deployed: bool,
    pub url: Option<String>,
    /// Set when `--test-deploy` stopped the app again.
    pub stopped: bool,
}

/// Read a Python source file.
///
/// # Errors
///
/// Returns an error if the path has no `.py` extension, does not exist, or
/// cannot be read.
pub fn load_source(fs: &impl SourceFs, path: &Path) -> Result<SourceFile> {
    let display = path.display().to_string();
    if path.extension().and_then(|e| e.to_str()) != Some("py") {
        return Err(DeployError::NotPython(display).into());
    }
    let content = fs.read_source(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(SourceFile {
        path: path.to_path_buf(),
        file_name,
        stem,
        content,
    })
}

/// `modal_<stem>.py` next to the source, or inside `output_dir`.
#[must_use]
pub fn output_path(source: &SourceFile, output_dir: Option<&Path>) -> PathBuf {
    let name = output_file_name(&source.stem);
    match output_dir {
        Some(dir) => dir.join(name),
        None => source
            .path
            .parent()
            .map_or_else(|| PathBuf::from(&name), |p| p.join(&name)),
    }
}

/// Render `config` and write it to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn generate(fs: &impl SourceFs, config: &TemplateConfig, path: &Path) -> Result<Detection> {
    let detection = if config.mode.serves_gradio() {
        detect::detect(&config.source, config.entry_point.as_deref())
    } else {
        Detection::None
    };
    let rendered = render::render(config);
    fs.write_generated(path, &rendered)?;
    tracing::debug!(path = %path.display(), bytes = rendered.len(), "wrote deployment file");
    Ok(detection)
}

/// Run `modal deploy` and pull the app URL out of its output.
///
/// # Errors
///
/// Returns `DeployError::DeployFailed` with the CLI's stderr on non-zero exit.
pub async fn deploy(
    deployer: &impl AppDeployer,
    file: &Path,
    timeout: Duration,
) -> Result<Option<String>> {
    let output = deployer.deploy(file, timeout).await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        return Err(DeployError::DeployFailed(detail.to_string()).into());
    }
    Ok(extract_url(&stdout).or_else(|| extract_url(&stderr)))
}

/// Generate, then deploy unless this is a dry run.
///
/// # Errors
///
/// Returns an error if writing, deploying, or the test-deploy stop fails.
pub async fn execute(
    plan: &DeployPlan,
    fs: &impl SourceFs,
    modal: &(impl AppDeployer + AppManager),
    reporter: &impl ProgressReporter,
) -> Result<DeployReport> {
    let text = |m: Message| m.text(plan.locale);

    reporter.step(text(Message::Generating));
    let detection = generate(fs, &plan.config, &plan.output_path)?;
    reporter.success(&format!(
        "{} {}",
        text(Message::Generated),
        plan.output_path.display()
    ));
    warn_on_detection(reporter, &detection, plan);

    let mut report = DeployReport {
        output_path: plan.output_path.clone(),
        detection,
        deployed: false,
        url: None,
        stopped: false,
    };

    if plan.dry_run {
        reporter.step(&format!(
            "{} modal deploy {}",
            text(Message::DryRunDone),
            plan.output_path.display()
        ));
        return Ok(report);
    }

    reporter.step(text(Message::Deploying));
    report.url = deploy(modal, &plan.output_path, plan.deploy_timeout).await?;
    report.deployed = true;
    match &report.url {
        Some(_) => reporter.success(text(Message::Deployed)),
        None => reporter.warn(text(Message::NoUrl)),
    }

    if plan.test_deploy {
        reporter.step(&format!(
            "{} {}",
            text(Message::StoppingTestDeploy),
            plan.config.app_name
        ));
        app_service::stop_app(modal, &plan.config.app_name).await?;
        report.stopped = true;
        reporter.success(text(Message::TestDeployStopped));
    }

    Ok(report)
}

fn warn_on_detection(reporter: &impl ProgressReporter, detection: &Detection, plan: &DeployPlan) {
    if !plan.config.mode.serves_gradio() {
        return;
    }
    match detection {
        Detection::None => reporter.warn(
            "No module-level Gradio interface found in the source; \
             the app will fail to start unless one is created at import time",
        ),
        Detection::Ambiguous(found) => {
            let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
            reporter.warn(&format!(
                "Several Gradio interfaces found ({}); pass --entry-point to choose",
                names.join(", ")
            ));
        }
        Detection::Unique(c) => {
            tracing::debug!(name = %c.name, kind = %c.kind, line = c.line, "gradio interface detected");
        }
    }
}
