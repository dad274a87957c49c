//! Sandboxed binary invocations and a scripted stand-in for `modal`.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temp directory that holds every file the binary may read or write.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read output")
    }

    /// `gradio-modal` with config, credentials and `modal` all pointed into the sandbox.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gradio-modal"));
        cmd.env("NO_COLOR", "1")
            .env("GRADIO_MODAL_CONFIG", self.path("config.yaml"))
            .env("GRADIO_MODAL_AUTH", self.path("auth.json"))
            .env("MODAL_CONFIG_PATH", self.path("modal.toml"))
            .env("GRADIO_MODAL_BIN", self.path("no-such-modal"))
            .env_remove("MODAL_TOKEN_ID")
            .env_remove("MODAL_TOKEN_SECRET")
            .env_remove("RUST_LOG")
            .env_remove("CI")
            .current_dir(self.dir.path());
        cmd
    }

    /// Like `cmd`, with valid env credentials and a fake `modal` that logs its argv.
    #[cfg(unix)]
    pub fn cmd_with_fake_modal(&self) -> Command {
        let modal = self.install_fake_modal();
        let mut cmd = self.cmd();
        cmd.env("GRADIO_MODAL_BIN", modal)
            .env("FAKE_MODAL_LOG", self.path("modal.log"))
            .env("MODAL_TOKEN_ID", "ak-test1234")
            .env("MODAL_TOKEN_SECRET", "as-test5678");
        cmd
    }

    /// Lines the fake `modal` was invoked with.
    pub fn modal_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.path("modal.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    fn install_fake_modal(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write("fake-modal", FAKE_MODAL);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake modal");
        path
    }
}

pub const DEPLOYED_URL: &str = "https://acme--app-serve.modal.run";

pub const GRADIO_APP: &str = "import gradio as gr\n\n\
def greet(name):\n    return \"Hello \" + name\n\n\
demo = gr.Interface(fn=greet, inputs=\"text\", outputs=\"text\")\n";

const FAKE_MODAL: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_MODAL_LOG"
case "$1" in
  --version) echo "modal client version: 1.0.0" ;;
  deploy)
    echo "Created objects."
    echo "Created web function serve => https://acme--app-serve.modal.run"
    echo "App deployed in 3.2s!"
    ;;
  app)
    case "$2" in
      list) echo '[{"App ID": "ap-1", "Description": "app", "State": "deployed"}]' ;;
      stop) echo "stopped $3" ;;
      logs) echo "log line for $3" ;;
    esac
    ;;
esac
"#;

pub fn exists(path: &Path) -> bool {
    path.is_file()
}
