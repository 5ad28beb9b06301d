//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the sync domain models
//! to keep this crate pure and reusable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// Base branch name (e.g., "main")
    pub base_branch: String,

    /// HEAD branch name (e.g., "feature/foo")
    pub head_branch: String,

    /// Whether the PR is still a draft
    pub draft: bool,

    /// When the PR was merged, if it was
    pub merged_at: Option<DateTime<Utc>>,

    /// Names of the labels on the PR
    pub labels: Vec<String>,
}

impl PullRequest {
    /// A PR counts as merged once GitHub reports a merge timestamp
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Whether the PR carries a label with exactly this name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label == name)
    }
}

/// A submitted review on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Login of the reviewer (None for deleted/ghost users)
    pub reviewer: Option<String>,

    /// State of the review
    pub state: ReviewState,
}

/// State of a pull request review, as GitHub spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Comment-only review
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review has not been submitted yet
    Pending,
}
