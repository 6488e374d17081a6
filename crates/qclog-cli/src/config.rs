//! Layered configuration for the CLI.
//!
//! Values are resolved in order of precedence: command-line flags, then `-S key=value`
//! overrides, then the TOML config file, then [`defaults::DefaultsConfig`].

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
