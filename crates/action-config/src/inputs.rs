//! GitHub Actions inputs
//!
//! The runner exposes every `with:` input as an environment variable named
//! `INPUT_<NAME>`, with spaces replaced by underscores and the name uppercased.

pub const MAIN_BRANCH_NAME: &str = "mainBranchName";
pub const ASANA_TOKEN: &str = "asanaToken";
pub const GITHUB_TOKEN: &str = "githubToken";
pub const TRACKER_HOST: &str = "trackerHost";
pub const STATUS_FIELD_NAME: &str = "statusFieldName";
pub const STATUS_READY_FOR_REVIEW: &str = "statusFieldValueWhenPRReadyForReviewIsOpen";
pub const STATUS_DRAFT: &str = "statusFieldValueWhenDraftPRIsOpen";
pub const STATUS_MERGED_TO_MAIN: &str = "statusFieldValueForMergedCommitToMain";
pub const STATUS_APPROVED: &str = "statusFieldValueWhenPRReadyForReviewIsApproved";
pub const SKIP_APPROVED_IF_LABELED_WITH: &str =
    "skipSettingStatusForPRReadyForReviewIsApprovedIfLabeledWith";
pub const SKIP_APPROVED_IF_STATUS_IS: &str =
    "skipSettingStatusForPRReadyForReviewIsApprovedIfStatusIs";
pub const LABEL_WHEN_APPROVED: &str = "labelToApplyToPRWhenApproved";
pub const ONLY_UPDATE_LABELED_WITH: &str = "onlyUpdatePRsLabeledWith";
pub const SKIP_UPDATE_LABELED_WITH: &str = "skipUpdatingPRsLabeledWith";

/// Environment variable the runner uses for an input
pub fn input_env_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read the raw value of an input from the process environment
pub fn env_input(name: &str) -> Option<String> {
    std::env::var(input_env_key(name)).ok()
}

/// Normalize a raw input value: trimmed, None when blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma separated input into trimmed, non-empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
