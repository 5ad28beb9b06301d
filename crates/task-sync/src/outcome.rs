//! Per-task outcomes and the run report

use crate::decision::Rule;
use crate::extractor::TaskRef;
use thiserror::Error;

/// Why a task was left alone
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("task has no custom field named `{0}`")]
    MissingStatusField(String),

    #[error("status field has no option named `{0}`")]
    UnknownOption(String),

    #[error("tracker request failed: {0:#}")]
    Tracker(anyhow::Error),

    /// The triggering PR could not be loaded, so no status can be decided
    #[error("pull request could not be loaded: {0}")]
    SourceControl(String),
}

/// What happened to a single task
#[derive(Debug)]
pub enum TaskOutcome {
    Updated { task: TaskRef, status: String },
    Unchanged { task: TaskRef, rule: Rule },
    Skipped { task: TaskRef, reason: SkipReason },
}

/// Result of one sync run
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Outcomes in processing order
    pub outcomes: Vec<TaskOutcome>,
    /// Whether the approval label was added to the PR
    pub label_applied: bool,
}

impl SyncReport {
    /// At least one task got a new status
    pub fn did_set_status(&self) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| matches!(outcome, TaskOutcome::Updated { .. }))
    }

    /// The last status value written, if any
    pub fn status_field_value(&self) -> Option<&str> {
        self.outcomes.iter().rev().find_map(|outcome| match outcome {
            TaskOutcome::Updated { status, .. } => Some(status.as_str()),
            _ => None,
        })
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, TaskOutcome::Skipped { .. }))
            .count()
    }
}

/// Errors that abort the whole run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] action_config::ConfigError),
}
