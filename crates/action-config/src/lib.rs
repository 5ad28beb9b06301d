//! Configuration and runner plumbing for the PR sync actions
//!
//! This crate provides:
//! - Action input names and parsing (`INPUT_*` environment variables)
//! - Optional config file loading (TOML)
//! - Validated configuration per entry point
//! - Step outputs and workflow command annotations

pub mod app_config;
pub mod config_file;
pub mod inputs;
pub mod outputs;

pub use app_config::{
    ActionConfig, BranchUpdateConfig, BranchUpdateFilters, ConfigError, Settings, StatusRules,
    DEFAULT_TRACKER_HOST,
};
pub use config_file::load_config_file;
