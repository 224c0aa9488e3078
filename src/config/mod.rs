//! Configuration module for tilebin
//!
//! Provides types and parsing for `tbin.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError, CONFIG_FILE};
pub use schema::*;
