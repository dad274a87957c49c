//! Terminal output for gradio-modal commands.
//!
//! Status lines go to stdout behind a one-character marker. `quiet`
//! silences them; failed checks and the deployed URL are always printed
//! because scripts read them.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::{OwoColorize as _, Style};
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Column keys are padded to in `kv` lines.
const KEY_WIDTH: usize = 18;

/// Styling and terminal state shared by every command.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a terminal.
    pub is_tty: bool,
    pub quiet: bool,
}

/// Colour is used only on a terminal, and never with `--no-color` or `NO_COLOR`.
#[must_use]
pub fn wants_color(no_color_flag: bool, is_tty: bool, no_color_env: bool) -> bool {
    is_tty && !no_color_flag && !no_color_env
}

impl OutputContext {
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if wants_color(no_color, is_tty, std::env::var_os("NO_COLOR").is_some()) {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Spinners only draw on a terminal and never in quiet mode.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    pub fn success(&self, msg: &str) {
        self.status("✓", self.styles.success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.status("⚠", self.styles.warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.status("ℹ", self.styles.info, msg);
    }

    /// `✗` line for a failed required check. Printed even when quiet.
    pub fn fail(&self, msg: &str) {
        println!("  {} {msg}", "✗".style(self.styles.error));
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// `key  value` with keys padded into one column.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            let key = format!("{key:<KEY_WIDTH$}");
            println!("  {} {value}", key.style(self.styles.dim));
        }
    }

    /// The deployed app URL on a line of its own.
    pub fn url(&self, url: &str) {
        println!("{}", url.style(self.styles.url));
    }

    fn status(&self, marker: &str, style: Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", marker.style(style));
        }
    }
}
