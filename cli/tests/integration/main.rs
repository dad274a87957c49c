//! Integration tests for gradio-modal
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They never touch the real home directory or the real `modal` CLI.

mod support;
