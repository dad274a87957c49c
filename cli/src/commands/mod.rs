//! Command implementations

pub mod auth;
pub mod config_info;
pub mod deploy;
pub mod kill;
pub mod logs;
pub mod sanity_check;
pub mod wizard;
