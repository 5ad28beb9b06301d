//! Status sync orchestration
//!
//! Ties the pieces together for one CI event: extract task references from
//! the event text, build the trigger context, then decide and write a status
//! for every referenced task in turn.

use crate::decision::{decide, StatusDecision};
use crate::extractor::{ReferenceExtractor, TaskRef};
use crate::outcome::{SkipReason, SyncReport, TaskOutcome};
use crate::status_field::StatusField;
use crate::trigger::{TriggerContext, TriggerKind};
use action_config::{outputs, ActionConfig};
use anyhow::Context;
use asana_client::TaskTracker;
use gh_client::GitHubClient;
use log::{debug, info, warn};

/// The CI event a run was started for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub kind: TriggerKind,
    pub owner: String,
    pub repo: String,
    /// Number of the PR the event concerns (PR events only)
    pub pr_number: Option<u64>,
    /// PR body, or the head commit message for pushes
    pub text: Option<String>,
}

/// Syncs task statuses for one repository
pub struct StatusSync<G, T> {
    github: G,
    tracker: T,
    config: ActionConfig,
    extractor: ReferenceExtractor,
}

impl<G, T> StatusSync<G, T>
where
    G: GitHubClient,
    T: TaskTracker,
{
    pub fn new(github: G, tracker: T, config: ActionConfig, extractor: ReferenceExtractor) -> Self {
        Self {
            github,
            tracker,
            config,
            extractor,
        }
    }

    /// Run the sync for `event`
    ///
    /// Never fails as a whole: every problem ends up as a
    /// `TaskOutcome::Skipped` of the tasks it affects.
    pub async fn run(&self, event: &SyncEvent) -> SyncReport {
        let Some(text) = event.text.as_deref().filter(|t| !t.trim().is_empty()) else {
            info!("No PR description or commit message to look for tasks in");
            return SyncReport::default();
        };

        let tasks = self.extractor.extract(text);
        if tasks.is_empty() {
            info!("No task references found");
            return SyncReport::default();
        }
        info!(
            "Found {} task reference(s): {}",
            tasks.len(),
            tasks.iter().map(TaskRef::as_str).collect::<Vec<_>>().join(", ")
        );

        let Some(field_name) = self.config.status.field_name.as_deref() else {
            info!("No status field name configured, nothing to update");
            return SyncReport::default();
        };

        let ctx = match self.trigger_context(event).await {
            Ok(Some(ctx)) => ctx,
            Ok(None) => {
                info!("Event carries no pull request number, nothing to update");
                return SyncReport::default();
            }
            Err(err) => return skip_all(tasks, &err),
        };

        let mut report = SyncReport::default();
        let mut label_requested = false;
        for task in tasks {
            info!("🎬 Updating mentioned task {}", task);
            let (outcome, wants_label) = self.sync_task(&ctx, task, field_name).await;
            label_requested |= wants_label;
            report.outcomes.push(outcome);
        }

        if label_requested {
            report.label_applied = self.apply_approval_label(event).await;
        }

        report
    }

    async fn trigger_context(&self, event: &SyncEvent) -> anyhow::Result<Option<TriggerContext>> {
        let main_branch = &self.config.main_branch_name;
        if event.kind == TriggerKind::PushToMain {
            return Ok(Some(TriggerContext::push_to_main(main_branch)));
        }

        let Some(number) = event.pr_number else {
            return Ok(None);
        };

        let pr = self
            .github
            .fetch_pull_request(&event.owner, &event.repo, number)
            .await
            .with_context(|| format!("Failed to load pull request #{}", number))?;
        let reviews = self
            .github
            .fetch_reviews(&event.owner, &event.repo, number)
            .await
            .with_context(|| format!("Failed to load reviews of pull request #{}", number))?;
        debug!("PR #{} has {} review(s)", number, reviews.len());

        Ok(Some(TriggerContext::for_pull_request(
            event.kind,
            &pr,
            &reviews,
            main_branch,
        )))
    }

    /// Decide and write the status of one task
    ///
    /// Returns the outcome and whether the decision asked for the approval label.
    async fn sync_task(
        &self,
        ctx: &TriggerContext,
        task: TaskRef,
        field_name: &str,
    ) -> (TaskOutcome, bool) {
        let fetched = match self.tracker.fetch_task(task.as_str()).await {
            Ok(fetched) => fetched,
            Err(err) => return (skip(task, SkipReason::Tracker(err)), false),
        };
        info!("Task name: \"{}\"", fetched.name);

        let Some(field) = StatusField::from_task(&fetched, field_name) else {
            return (
                skip(task, SkipReason::MissingStatusField(field_name.to_string())),
                false,
            );
        };
        debug!(
            "Status field {} is currently {:?}",
            field.gid,
            field.current.as_deref()
        );

        let decision = decide(ctx, &field, &self.config.status);
        let StatusDecision {
            target_status,
            apply_approval_label,
            rule,
        } = decision;

        let Some(status) = target_status else {
            info!("Leaving task {} unchanged ({})", task, rule);
            return (TaskOutcome::Unchanged { task, rule }, apply_approval_label);
        };

        let Some(option) = field.find_option(&status) else {
            let message = format!(
                "Status field `{}` has no option named `{}`, check the action inputs",
                field.name, status
            );
            warn!("{}", message);
            outputs::warning(&message);
            return (
                skip(task, SkipReason::UnknownOption(status)),
                apply_approval_label,
            );
        };

        match self
            .tracker
            .set_enum_field(task.as_str(), &field.gid, &option.gid)
            .await
        {
            Ok(()) => {
                info!("✅ Set status of task {} to \"{}\" ({})", task, status, rule);
                (TaskOutcome::Updated { task, status }, apply_approval_label)
            }
            Err(err) => (skip(task, SkipReason::Tracker(err)), apply_approval_label),
        }
    }

    /// Add the configured approval label to the PR; failures are only logged
    async fn apply_approval_label(&self, event: &SyncEvent) -> bool {
        let (Some(label), Some(number)) = (&self.config.status.label_when_approved, event.pr_number)
        else {
            return false;
        };

        let labels = [label.clone()];
        match self
            .github
            .add_labels(&event.owner, &event.repo, number, &labels)
            .await
        {
            Ok(()) => {
                info!("🏷 Added label \"{}\" to PR #{}", label, number);
                true
            }
            Err(err) => {
                warn!("Failed to add label \"{}\" to PR #{}: {:#}", label, number, err);
                outputs::warning(&format!("Failed to add label \"{}\": {:#}", label, err));
                false
            }
        }
    }
}

fn skip(task: TaskRef, reason: SkipReason) -> TaskOutcome {
    warn!("Skipping task {}: {}", task, reason);
    TaskOutcome::Skipped { task, reason }
}

/// Without the PR there is nothing to decide; every task is skipped
fn skip_all(tasks: Vec<TaskRef>, err: &anyhow::Error) -> SyncReport {
    let message = format!("{:#}", err);
    warn!("{}", message);
    outputs::warning(&message);

    SyncReport {
        outcomes: tasks
            .into_iter()
            .map(|task| skip(task, SkipReason::SourceControl(message.clone())))
            .collect(),
        label_applied: false,
    }
}
