//! Action configuration
//!
//! Settings come from an optional `.asana-pr-sync.toml` file, overlaid by the
//! action inputs of the current step. Each entry point then validates the
//! subset it needs into its own config type.

use crate::inputs::{self, non_blank, split_list};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Host used in task URLs when nothing else is configured
pub const DEFAULT_TRACKER_HOST: &str = "app.asana.com";

/// Fatal configuration problems; the run aborts on any of these
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("🛑 required input `{0}` was not provided")]
    MissingInput(&'static str),

    #[error("🛑 input `{name}` is invalid: {reason}")]
    InvalidInput { name: &'static str, reason: String },

    #[error("🛑 failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Merged settings before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub main_branch_name: Option<String>,
    pub asana_token: Option<String>,
    pub github_token: Option<String>,
    pub tracker_host: Option<String>,
    pub status: StatusRules,
    pub branch_update: BranchUpdateFilters,
}

/// Which status to write in which situation
///
/// Every status value is optional; an unset value disables the matching rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusRules {
    /// Name of the enum custom field holding the task status
    pub field_name: Option<String>,
    /// Status for an open PR that is ready for review
    pub ready_for_review: Option<String>,
    /// Status for an open draft PR
    pub draft: Option<String>,
    /// Status once the change landed on the main branch
    pub merged_to_main: Option<String>,
    /// Status for an approved, non-draft PR
    pub approved: Option<String>,
    /// PR labels that suppress the approved status write
    pub skip_approved_if_labeled_with: Vec<String>,
    /// Current status values that suppress the approved status write
    pub skip_approved_if_status_is: Vec<String>,
    /// Label added to the PR once it is approved
    pub label_when_approved: Option<String>,
}

/// Label filters for the branch updater
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BranchUpdateFilters {
    /// When non-empty, only PRs carrying one of these labels are updated
    pub only_labeled_with: Vec<String>,
    /// PRs carrying any of these labels are left alone
    pub skip_labeled_with: Vec<String>,
}

/// Validated configuration of the status sync action
#[derive(Debug, Clone)]
pub struct ActionConfig {
    pub main_branch_name: String,
    pub asana_token: String,
    pub github_token: Option<String>,
    pub tracker_host: String,
    pub status: StatusRules,
}

/// Validated configuration of the branch updater
#[derive(Debug, Clone)]
pub struct BranchUpdateConfig {
    pub main_branch_name: String,
    pub github_token: Option<String>,
    pub filters: BranchUpdateFilters,
}

impl Settings {
    /// Load the config file (if any) and overlay the step's action inputs
    pub fn load() -> Result<Self, ConfigError> {
        let base = match crate::load_config_file() {
            Some((path, content)) => Self::from_toml(path, &content)?,
            None => {
                log::debug!("No config file found, using action inputs only");
                Self::default()
            }
        };

        Ok(base.with_inputs(inputs::env_input))
    }

    /// Parse settings from config file content
    pub fn from_toml(path: PathBuf, content: &str) -> Result<Self, ConfigError> {
        let settings = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Overlay action inputs; inputs that are set win over file values
    pub fn with_inputs<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| non_blank(lookup(name));
        let list = |name: &str| input(name).map(|v| split_list(&v));

        overlay(&mut self.main_branch_name, input(inputs::MAIN_BRANCH_NAME));
        overlay(&mut self.asana_token, input(inputs::ASANA_TOKEN));
        overlay(&mut self.github_token, input(inputs::GITHUB_TOKEN));
        overlay(&mut self.tracker_host, input(inputs::TRACKER_HOST));

        let status = &mut self.status;
        overlay(&mut status.field_name, input(inputs::STATUS_FIELD_NAME));
        overlay(&mut status.ready_for_review, input(inputs::STATUS_READY_FOR_REVIEW));
        overlay(&mut status.draft, input(inputs::STATUS_DRAFT));
        overlay(&mut status.merged_to_main, input(inputs::STATUS_MERGED_TO_MAIN));
        overlay(&mut status.approved, input(inputs::STATUS_APPROVED));
        overlay(&mut status.label_when_approved, input(inputs::LABEL_WHEN_APPROVED));
        if let Some(labels) = list(inputs::SKIP_APPROVED_IF_LABELED_WITH) {
            status.skip_approved_if_labeled_with = labels;
        }
        if let Some(values) = list(inputs::SKIP_APPROVED_IF_STATUS_IS) {
            status.skip_approved_if_status_is = values;
        }

        let filters = &mut self.branch_update;
        if let Some(labels) = list(inputs::ONLY_UPDATE_LABELED_WITH) {
            filters.only_labeled_with = labels;
        }
        if let Some(labels) = list(inputs::SKIP_UPDATE_LABELED_WITH) {
            filters.skip_labeled_with = labels;
        }

        self
    }

    /// Validate the settings needed by the status sync
    pub fn into_action_config(self) -> Result<ActionConfig, ConfigError> {
        let main_branch_name = non_blank(self.main_branch_name)
            .ok_or(ConfigError::MissingInput(inputs::MAIN_BRANCH_NAME))?;
        let asana_token =
            non_blank(self.asana_token).ok_or(ConfigError::MissingInput(inputs::ASANA_TOKEN))?;

        let tracker_host =
            non_blank(self.tracker_host).unwrap_or_else(|| DEFAULT_TRACKER_HOST.to_string());
        validate_host(&tracker_host)?;

        Ok(ActionConfig {
            main_branch_name,
            asana_token,
            github_token: non_blank(self.github_token),
            tracker_host,
            status: self.status,
        })
    }

    /// Validate the settings needed by the branch updater
    pub fn into_branch_update_config(self) -> Result<BranchUpdateConfig, ConfigError> {
        let main_branch_name = non_blank(self.main_branch_name)
            .ok_or(ConfigError::MissingInput(inputs::MAIN_BRANCH_NAME))?;

        Ok(BranchUpdateConfig {
            main_branch_name,
            github_token: non_blank(self.github_token),
            filters: self.branch_update,
        })
    }
}

/// Task URLs are matched as `https://<host>/...`, so only a bare host works
fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.contains('/') || host.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidInput {
            name: inputs::TRACKER_HOST,
            reason: format!(
                "expected a bare host name like `{}`, got `{}`",
                DEFAULT_TRACKER_HOST, host
            ),
        });
    }
    Ok(())
}

fn overlay(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = value;
    }
}
