//! Unit tests for credential detection order and login.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use gradio_modal::application::ports::CredentialStore;
use gradio_modal::application::services::auth_service;
use gradio_modal::domain::{AuthError, AuthSource, ModalAuthConfig};

use crate::helpers::err_output;
use crate::mocks::{FakeModal, FakeProbe, MemCredentialStore, RecordingReporter};

const TOML: &str = r#"
[personal]
token_id = "ak-toml111"
token_secret = "as-toml222"
active = true

[work]
token_id = "ak-work111"
token_secret = "as-work222"
"#;

fn stored() -> ModalAuthConfig {
    ModalAuthConfig::new("ak-stored1", "as-stored2", None).expect("valid")
}

#[test]
fn test_environment_wins_over_everything() {
    let probe = FakeProbe {
        env: Some(("ak-env111".into(), "as-env222".into())),
        modal_toml: Some(TOML.into()),
    };
    let found = auth_service::detect(&probe, &MemCredentialStore::with(stored()))
        .expect("detect")
        .expect("found");
    assert_eq!(found.source, AuthSource::Environment);
    assert_eq!(found.config.token_id, "ak-env111");
}

#[test]
fn test_malformed_env_falls_through_to_modal_toml() {
    let probe = FakeProbe {
        env: Some(("not-a-token".into(), "as-env222".into())),
        modal_toml: Some(TOML.into()),
    };
    let found = auth_service::detect(&probe, &MemCredentialStore::default())
        .expect("detect")
        .expect("found");
    assert_eq!(
        found.source,
        AuthSource::ModalToml {
            profile: "personal".into()
        }
    );
    assert_eq!(found.config.workspace.as_deref(), Some("personal"));
}

#[test]
fn test_stored_credentials_are_last_resort() {
    let found = auth_service::detect(&FakeProbe::default(), &MemCredentialStore::with(stored()))
        .expect("detect")
        .expect("found");
    assert_eq!(found.source, AuthSource::Stored);
}

#[test]
fn test_require_without_credentials_is_not_authenticated() {
    let err = auth_service::require(&FakeProbe::default(), &MemCredentialStore::default())
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_login_with_tokens_registers_then_saves() {
    let modal = FakeModal::default();
    let store = MemCredentialStore::default();
    let auth = ModalAuthConfig::new("ak-new111", "as-new222", Some("team")).expect("valid");

    auth_service::login_with_tokens(&modal, &store, &RecordingReporter::default(), &auth)
        .await
        .expect("login");

    assert_eq!(modal.calls(), vec!["token set ak-new111".to_string()]);
    assert_eq!(store.load().expect("load"), Some(auth));
}

#[tokio::test]
async fn test_login_failure_saves_nothing() {
    let modal = FakeModal {
        token_set: Some(err_output(1, b"invalid token")),
        ..FakeModal::default()
    };
    let store = MemCredentialStore::default();
    let auth = ModalAuthConfig::new("ak-new111", "as-new222", None).expect("valid");

    let err = auth_service::login_with_tokens(&modal, &store, &RecordingReporter::default(), &auth)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid token"), "{err}");
    assert_eq!(store.load().expect("load"), None);
}

#[tokio::test]
async fn test_interactive_setup_reports_detected_source() {
    let modal = FakeModal::default();
    let probe = FakeProbe {
        modal_toml: Some(TOML.into()),
        ..FakeProbe::default()
    };
    let reporter = RecordingReporter::default();
    let found = auth_service::interactive_setup(
        &modal,
        &probe,
        &MemCredentialStore::default(),
        &reporter,
    )
    .await
    .expect("setup");
    assert_eq!(modal.calls(), vec!["setup".to_string()]);
    assert_eq!(
        found.source,
        AuthSource::ModalToml {
            profile: "personal".into()
        }
    );
    assert!(reporter.contains("ak-toml…"), "{:?}", reporter.lines);
}

#[tokio::test]
async fn test_interactive_setup_without_resulting_credentials_fails() {
    let modal = FakeModal::default();
    let err = auth_service::interactive_setup(
        &modal,
        &FakeProbe::default(),
        &MemCredentialStore::default(),
        &RecordingReporter::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.downcast_ref::<AuthError>(),
        Some(&AuthError::NotAuthenticated)
    );
}
