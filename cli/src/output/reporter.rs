//! `TerminalReporter`: Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }
}

/// Reporter that shows steps as a spinner message and prints results above it.
///
/// Falls back to plain lines when progress is hidden (quiet or not a TTY).
pub struct SpinnerReporter<'a> {
    ctx: &'a OutputContext,
    pb: Option<ProgressBar>,
}

impl<'a> SpinnerReporter<'a> {
    /// Create a reporter; the spinner only draws when `ctx.show_progress()`.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        let pb = ctx.show_progress().then(|| progress::spinner(""));
        Self { ctx, pb }
    }

    /// Remove the spinner line.
    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for SpinnerReporter<'_> {
    fn step(&self, message: &str) {
        match &self.pb {
            Some(pb) => pb.set_message(message.to_string()),
            None => TerminalReporter::new(self.ctx).step(message),
        }
    }

    fn success(&self, message: &str) {
        match &self.pb {
            Some(pb) => pb.println(format!("  {} {message}", "✓".style(self.ctx.styles.success))),
            None => self.ctx.success(message),
        }
    }

    fn warn(&self, message: &str) {
        match &self.pb {
            Some(pb) => pb.println(format!("  {} {message}", "⚠".style(self.ctx.styles.warning))),
            None => self.ctx.warn(message),
        }
    }
}

impl Drop for SpinnerReporter<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Reporter that discards everything, for `--json` mode.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
