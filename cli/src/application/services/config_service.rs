//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{ToolConfig, parse_assignment};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the stored config cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<ToolConfig> {
    store.load()
}

/// Apply `key=value` assignments in order and save once.
///
/// Nothing is written if any assignment is invalid.
///
/// # Errors
///
/// Returns an error on the first malformed or invalid assignment.
pub fn apply_assignments(store: &impl ConfigStore, assignments: &[String]) -> Result<ToolConfig> {
    let mut config = store.load()?;
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        config.set(&key, &value)?;
    }
    store.save(&config)?;
    Ok(config)
}
