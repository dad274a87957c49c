//! Unit tests for the deploy service: generation, deploy, URL reporting.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use gradio_modal::application::services::deploy_service::{self, DeployPlan, SourceFile};
use gradio_modal::domain::detect::Detection;
use gradio_modal::domain::messages::Locale;
use gradio_modal::domain::{DeployError, DeploymentMode, TemplateConfig};

use crate::helpers::{DEPLOY_STDOUT, DEPLOYED_URL, GRADIO_SOURCE, err_output, ok_output};
use crate::mocks::{FakeModal, MemFs, RecordingReporter};

const OUT: &str = "/work/modal_app.py";

fn plan(source: &str) -> DeployPlan {
    DeployPlan {
        config: TemplateConfig::new("my-app", DeploymentMode::Minimum, "app.py", source),
        output_path: PathBuf::from(OUT),
        dry_run: false,
        test_deploy: false,
        deploy_timeout: Duration::from_secs(900),
        locale: Locale::English,
    }
}

#[tokio::test]
async fn test_dry_run_writes_file_and_never_calls_modal() {
    let fs = MemFs::default();
    let modal = FakeModal::default();
    let reporter = RecordingReporter::default();
    let mut plan = plan(GRADIO_SOURCE);
    plan.dry_run = true;

    let report = deploy_service::execute(&plan, &fs, &modal, &reporter)
        .await
        .expect("dry run");

    assert!(!report.deployed);
    assert_eq!(report.url, None);
    assert!(modal.calls().is_empty(), "{:?}", modal.calls());
    let written = fs.written(OUT).expect("file written");
    assert!(written.contains("app = modal.App(\"my-app\""));
    assert!(written.contains("demo = gr.Interface("));
    assert!(reporter.contains("modal deploy /work/modal_app.py"));
}

#[tokio::test]
async fn test_deploy_reports_url_from_stdout() {
    let fs = MemFs::default();
    let modal = FakeModal {
        deploy: Some(ok_output(DEPLOY_STDOUT)),
        ..FakeModal::default()
    };
    let reporter = RecordingReporter::default();

    let report = deploy_service::execute(&plan(GRADIO_SOURCE), &fs, &modal, &reporter)
        .await
        .expect("deploy");

    assert!(report.deployed);
    assert_eq!(report.url.as_deref(), Some(DEPLOYED_URL));
    assert_eq!(modal.calls(), vec![format!("deploy {OUT}")]);
    assert!(matches!(report.detection, Detection::Unique(ref c) if c.name == "demo"));
    assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
}

#[tokio::test]
async fn test_deploy_falls_back_to_stderr_for_url() {
    let modal = FakeModal {
        deploy: Some(std::process::Output {
            stderr: b"View app at https://acme--x.modal.run.\n".to_vec(),
            ..ok_output(b"done\n")
        }),
        ..FakeModal::default()
    };
    let url = deploy_service::deploy(&modal, Path::new(OUT), Duration::from_secs(1))
        .await
        .expect("deploy");
    assert_eq!(url.as_deref(), Some("https://acme--x.modal.run"));
}

#[tokio::test]
async fn test_deploy_without_url_warns() {
    let fs = MemFs::default();
    let modal = FakeModal {
        deploy: Some(ok_output(b"App deployed\n")),
        ..FakeModal::default()
    };
    let reporter = RecordingReporter::default();

    let report = deploy_service::execute(&plan(GRADIO_SOURCE), &fs, &modal, &reporter)
        .await
        .expect("deploy");

    assert!(report.deployed);
    assert_eq!(report.url, None);
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn test_deploy_failure_surfaces_stderr() {
    let fs = MemFs::default();
    let modal = FakeModal {
        deploy: Some(err_output(1, b"Error: image build failed\n")),
        ..FakeModal::default()
    };
    let err = deploy_service::execute(&plan(GRADIO_SOURCE), &fs, &modal, &RecordingReporter::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<DeployError>(),
        Some(&DeployError::DeployFailed("Error: image build failed".into()))
    );
    assert!(fs.written(OUT).is_some(), "file is kept for inspection");
}

#[tokio::test]
async fn test_test_deploy_stops_app_after_deploy() {
    let fs = MemFs::default();
    let modal = FakeModal {
        deploy: Some(ok_output(DEPLOY_STDOUT)),
        ..FakeModal::default()
    };
    let mut plan = plan(GRADIO_SOURCE);
    plan.test_deploy = true;

    let report = deploy_service::execute(&plan, &fs, &modal, &RecordingReporter::default())
        .await
        .expect("deploy");

    assert!(report.stopped);
    assert_eq!(
        modal.calls(),
        vec![format!("deploy {OUT}"), "app stop my-app".to_string()]
    );
}

#[tokio::test]
async fn test_test_deploy_stop_failure_is_error() {
    let modal = FakeModal {
        deploy: Some(ok_output(DEPLOY_STDOUT)),
        stop: Some(err_output(1, b"no such app")),
        ..FakeModal::default()
    };
    let mut plan = plan(GRADIO_SOURCE);
    plan.test_deploy = true;
    let err = deploy_service::execute(&plan, &MemFs::default(), &modal, &RecordingReporter::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no such app"), "{err}");
}

#[tokio::test]
async fn test_missing_interface_warns_before_deploy() {
    let reporter = RecordingReporter::default();
    let mut plan = plan("print('hello')\n");
    plan.dry_run = true;
    let report = deploy_service::execute(&plan, &MemFs::default(), &FakeModal::default(), &reporter)
        .await
        .expect("dry run");
    assert_eq!(report.detection, Detection::None);
    assert_eq!(reporter.warnings().len(), 1);
}

#[tokio::test]
async fn test_ambiguous_interfaces_warn_with_names() {
    let reporter = RecordingReporter::default();
    let mut plan = plan("import gradio as gr\na = gr.Blocks()\nb = gr.Interface(fn=f, inputs='text', outputs='text')\n");
    plan.dry_run = true;
    deploy_service::execute(&plan, &MemFs::default(), &FakeModal::default(), &reporter)
        .await
        .expect("dry run");
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("a, b"), "{warnings:?}");
}

#[tokio::test]
async fn test_default_entry_point_name_settles_several_interfaces() {
    let reporter = RecordingReporter::default();
    let mut plan = plan("import gradio as gr\na = gr.Blocks()\ndemo = gr.Interface(fn=f, inputs='text', outputs='text')\n");
    plan.dry_run = true;
    let report = deploy_service::execute(&plan, &MemFs::default(), &FakeModal::default(), &reporter)
        .await
        .expect("dry run");
    assert!(matches!(report.detection, Detection::Unique(ref c) if c.name == "demo"));
    assert!(reporter.warnings().is_empty(), "{:?}", reporter.warnings());
}

#[tokio::test]
async fn test_portuguese_locale_changes_messages() {
    let reporter = RecordingReporter::default();
    let mut plan = plan(GRADIO_SOURCE);
    plan.dry_run = true;
    plan.locale = Locale::BrazilianPortuguese;
    deploy_service::execute(&plan, &MemFs::default(), &FakeModal::default(), &reporter)
        .await
        .expect("dry run");
    assert!(reporter.contains("Gerando arquivo de deploy"));
}

#[test]
fn test_load_source_rejects_non_python() {
    let fs = MemFs::with_source("/work/app.txt", "x");
    let err = deploy_service::load_source(&fs, Path::new("/work/app.txt")).unwrap_err();
    assert_eq!(
        err.downcast_ref::<DeployError>(),
        Some(&DeployError::NotPython("/work/app.txt".into()))
    );
}

#[test]
fn test_load_source_and_output_path() {
    let fs = MemFs::with_source("/work/app.py", GRADIO_SOURCE);
    let source: SourceFile =
        deploy_service::load_source(&fs, Path::new("/work/app.py")).expect("load");
    assert_eq!(source.stem, "app");
    assert_eq!(source.file_name, "app.py");
    assert_eq!(
        deploy_service::output_path(&source, None),
        PathBuf::from("/work/modal_app.py")
    );
    assert_eq!(
        deploy_service::output_path(&source, Some(Path::new("/out"))),
        PathBuf::from("/out/modal_app.py")
    );
}
