//! Stylesheet for terminal output.
//!
//! Every field starts as a plain `Style`; `colorize` fills them in once we
//! know colour is wanted, so call sites never branch on colour support.

use owo_colors::Style;

#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` lines.
    pub success: Style,
    /// `⚠` lines.
    pub warning: Style,
    /// `✗` lines and the `Error:` prefix.
    pub error: Style,
    /// `ℹ` lines.
    pub info: Style,
    /// Keys in `kv` output.
    pub dim: Style,
    /// Section headers such as "Sanity check".
    pub header: Style,
    /// `→` deploy steps.
    pub step: Style,
    /// The deployed app URL.
    pub url: Style,
}

impl Styles {
    /// Switch every style to its coloured variant.
    pub fn colorize(&mut self) {
        *self = Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            header: Style::new().bold().cyan(),
            step: Style::new().cyan(),
            url: Style::new().bold().underline(),
        };
    }
}
