//! Unit tests for listing, stopping and tailing apps.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use gradio_modal::application::services::app_service;
use gradio_modal::domain::DeployError;
use gradio_modal::domain::apps::single_deployed;

use crate::helpers::{APP_LIST_JSON, err_output, ok_output};
use crate::mocks::FakeModal;

#[tokio::test]
async fn test_list_apps_parses_json() {
    let modal = FakeModal {
        list: Some(ok_output(APP_LIST_JSON)),
        ..FakeModal::default()
    };
    let apps = app_service::list_apps(&modal).await.expect("list");
    assert_eq!(apps.len(), 3);
    assert_eq!(
        single_deployed(&apps).unwrap_err(),
        DeployError::AmbiguousApp("ap-111, ap-333".into())
    );
}

#[tokio::test]
async fn test_list_apps_failure_is_error() {
    let modal = FakeModal {
        list: Some(err_output(1, b"Unauthorized")),
        ..FakeModal::default()
    };
    let err = app_service::list_apps(&modal).await.unwrap_err();
    assert!(err.to_string().contains("Unauthorized"), "{err}");
}

#[tokio::test]
async fn test_stop_and_logs_target_given_app() {
    let modal = FakeModal::default();
    app_service::stop_app(&modal, "ap-111").await.expect("stop");
    app_service::stream_logs(&modal, "ap-111").await.expect("logs");
    assert_eq!(modal.calls(), vec!["app stop ap-111", "app logs ap-111"]);
}
