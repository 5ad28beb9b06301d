//! GitHub event metadata
//!
//! The runner describes the triggering event through `GITHUB_EVENT_NAME`,
//! `GITHUB_REF`, `GITHUB_REPOSITORY` and the JSON payload at
//! `GITHUB_EVENT_PATH`. Only the handful of payload fields the sync needs are
//! deserialized.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use task_sync::{SyncEvent, TriggerKind};

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    commits: Vec<CommitPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    #[serde(default)]
    message: String,
}

/// Split `owner/repo` as found in `GITHUB_REPOSITORY`
pub fn split_repository(repository: &str) -> Result<(String, String)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => bail!("expected GITHUB_REPOSITORY as `owner/repo`, got `{}`", repository),
    }
}

/// Owner and name of the repository the workflow runs in
pub fn repository_from_env() -> Result<(String, String)> {
    let repository = std::env::var("GITHUB_REPOSITORY").context("GITHUB_REPOSITORY is not set")?;
    split_repository(&repository)
}

/// Read the current event from the runner environment
///
/// Returns `Ok(None)` for events the sync does not handle.
pub fn from_env(main_branch: &str) -> Result<Option<SyncEvent>> {
    let event_name = std::env::var("GITHUB_EVENT_NAME").context("GITHUB_EVENT_NAME is not set")?;
    let git_ref = std::env::var("GITHUB_REF").ok();
    let repository = std::env::var("GITHUB_REPOSITORY").context("GITHUB_REPOSITORY is not set")?;

    let payload = match std::env::var_os("GITHUB_EVENT_PATH") {
        Some(path) => read_payload(Path::new(&path))?,
        None => {
            log::debug!("GITHUB_EVENT_PATH is not set, using an empty payload");
            "{}".to_string()
        }
    };

    from_parts(
        &event_name,
        git_ref.as_deref(),
        &repository,
        &payload,
        main_branch,
    )
}

fn read_payload(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))
}

/// Build a sync event from raw event metadata
pub fn from_parts(
    event_name: &str,
    git_ref: Option<&str>,
    repository: &str,
    payload: &str,
    main_branch: &str,
) -> Result<Option<SyncEvent>> {
    let Some(kind) = TriggerKind::from_event(event_name, git_ref, main_branch) else {
        log::info!(
            "Event `{}` on {} is not handled",
            event_name,
            git_ref.unwrap_or("unknown ref")
        );
        return Ok(None);
    };

    let (owner, repo) = split_repository(repository)?;
    let payload: EventPayload =
        serde_json::from_str(payload).context("Failed to parse event payload")?;

    let (pr_number, text) = match kind {
        TriggerKind::PushToMain => (
            None,
            payload.commits.into_iter().next().map(|commit| commit.message),
        ),
        TriggerKind::PullRequest | TriggerKind::PullRequestReview => match payload.pull_request {
            Some(pr) => (Some(pr.number), pr.body),
            None => (None, None),
        },
    };

    Ok(Some(SyncEvent {
        kind,
        owner,
        repo,
        pr_number,
        text,
    }))
}
