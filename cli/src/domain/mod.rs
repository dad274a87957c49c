//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod apps;
pub mod auth;
pub mod config;
pub mod detect;
pub mod error;
pub mod gpu;
pub mod messages;
pub mod mode;
pub mod render;
pub mod template;

pub use auth::{AuthSource, DetectedAuth, ModalAuthConfig};
pub use config::{ToolConfig, validate_config_key, validate_config_value};
pub use error::{AuthError, ConfigError, DeployError, TemplateError};
pub use gpu::GpuSpec;
pub use mode::DeploymentMode;
pub use template::{RemoteFunctionConfig, TemplateConfig};
