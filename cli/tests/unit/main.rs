//! Unit tests for gradio-modal
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod app_service;
mod architecture;
mod auth_service;
mod deploy_service;
mod mocks;
