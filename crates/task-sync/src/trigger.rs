//! Trigger context
//!
//! Everything the decision engine needs to know about the event that started
//! the run, captured once and never mutated afterwards.

use gh_client::{PullRequest, Review, ReviewState};
use std::collections::{BTreeMap, BTreeSet};

/// Kind of CI event that started the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// A pull request was opened, reopened, edited or synchronized
    PullRequest,
    /// A review was submitted on a pull request
    PullRequestReview,
    /// Commits were pushed to the main branch
    PushToMain,
}

impl TriggerKind {
    /// Classify a GitHub event; None for events the sync does not handle
    pub fn from_event(event_name: &str, git_ref: Option<&str>, main_branch: &str) -> Option<Self> {
        match event_name {
            "pull_request" | "pull_request_target" => Some(Self::PullRequest),
            "pull_request_review" => Some(Self::PullRequestReview),
            "push" if git_ref == Some(format!("refs/heads/{}", main_branch).as_str()) => {
                Some(Self::PushToMain)
            }
            _ => None,
        }
    }
}

/// Snapshot of the triggering event and the PR it concerns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerContext {
    pub kind: TriggerKind,
    pub draft: bool,
    pub merged: bool,
    pub labels: BTreeSet<String>,
    /// Most recent review state per reviewer login
    pub latest_reviews: BTreeMap<String, ReviewState>,
    pub head_branch: String,
    pub main_branch: String,
}

impl TriggerContext {
    /// Context for a pull request event, from the PR and its reviews
    pub fn for_pull_request(
        kind: TriggerKind,
        pr: &PullRequest,
        reviews: &[Review],
        main_branch: &str,
    ) -> Self {
        Self {
            kind,
            draft: pr.draft,
            merged: pr.is_merged(),
            labels: pr.labels.iter().cloned().collect(),
            latest_reviews: latest_review_per_reviewer(reviews),
            head_branch: pr.head_branch.clone(),
            main_branch: main_branch.to_string(),
        }
    }

    /// Context for a push to the main branch; there is no PR state to look at
    pub fn push_to_main(main_branch: &str) -> Self {
        Self {
            kind: TriggerKind::PushToMain,
            draft: false,
            merged: false,
            labels: BTreeSet::new(),
            latest_reviews: BTreeMap::new(),
            head_branch: main_branch.to_string(),
            main_branch: main_branch.to_string(),
        }
    }

    /// At least one reviewer's latest review is an approval
    pub fn is_approved(&self) -> bool {
        self.latest_reviews
            .values()
            .any(|state| *state == ReviewState::Approved)
    }

    /// The PR carries at least one of `labels`
    pub fn has_any_label(&self, labels: &[String]) -> bool {
        labels.iter().any(|label| self.labels.contains(label))
    }

    pub fn head_is_main(&self) -> bool {
        self.head_branch == self.main_branch
    }
}

/// Fold chronologically ordered reviews into the latest state per reviewer
///
/// A later review by the same reviewer replaces the earlier one, so a
/// "changes requested" after an approval retracts that approval. Reviews
/// without a reviewer login are ignored.
pub fn latest_review_per_reviewer(reviews: &[Review]) -> BTreeMap<String, ReviewState> {
    reviews
        .iter()
        .fold(BTreeMap::new(), |mut latest, review| {
            if let Some(reviewer) = &review.reviewer {
                latest.insert(reviewer.clone(), review.state);
            }
            latest
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn review(reviewer: Option<&str>, state: ReviewState) -> Review {
        Review {
            reviewer: reviewer.map(str::to_string),
            state,
        }
    }

    #[test]
    fn test_trigger_kind_from_event() {
        assert_eq!(
            TriggerKind::from_event("pull_request", None, "main"),
            Some(TriggerKind::PullRequest)
        );
        assert_eq!(
            TriggerKind::from_event("pull_request_review", Some("refs/pull/1/merge"), "main"),
            Some(TriggerKind::PullRequestReview)
        );
        assert_eq!(
            TriggerKind::from_event("push", Some("refs/heads/main"), "main"),
            Some(TriggerKind::PushToMain)
        );
        assert_eq!(
            TriggerKind::from_event("push", Some("refs/heads/feature"), "main"),
            None
        );
        assert_eq!(TriggerKind::from_event("push", None, "main"), None);
        assert_eq!(TriggerKind::from_event("issues", None, "main"), None);
    }

    #[test]
    fn test_later_review_overrides_earlier_one() {
        let reviews = vec![
            review(Some("alice"), ReviewState::Approved),
            review(Some("bob"), ReviewState::Commented),
            review(Some("alice"), ReviewState::ChangesRequested),
        ];

        let latest = latest_review_per_reviewer(&reviews);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["alice"], ReviewState::ChangesRequested);
        assert_eq!(latest["bob"], ReviewState::Commented);
    }

    #[test]
    fn test_reviews_without_reviewer_are_ignored() {
        let reviews = vec![review(None, ReviewState::Approved)];
        assert!(latest_review_per_reviewer(&reviews).is_empty());
    }

    #[test]
    fn test_pull_request_context_mirrors_pr_state() {
        let pr = PullRequest {
            number: 7,
            base_branch: "release".to_string(),
            head_branch: "main".to_string(),
            draft: true,
            merged_at: Some(Utc::now()),
            labels: vec!["qa".to_string(), "backend".to_string()],
        };
        let reviews = vec![review(Some("bob"), ReviewState::Approved)];

        let ctx = TriggerContext::for_pull_request(TriggerKind::PullRequest, &pr, &reviews, "main");

        assert_eq!(ctx.kind, TriggerKind::PullRequest);
        assert!(ctx.merged);
        assert!(ctx.draft);
        assert_eq!(ctx.head_branch, "main");
        assert!(ctx.head_is_main());
        assert_eq!(
            ctx.labels.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["backend", "qa"]
        );
        assert!(ctx.has_any_label(&["qa".to_string()]));
        assert!(ctx.is_approved());

        let open = PullRequest {
            merged_at: None,
            draft: false,
            head_branch: "feature/login".to_string(),
            ..pr
        };
        let ctx = TriggerContext::for_pull_request(TriggerKind::PullRequest, &open, &[], "main");
        assert!(!ctx.merged);
        assert!(!ctx.draft);
        assert!(!ctx.head_is_main());
        assert!(!ctx.is_approved());
    }

    #[test]
    fn test_approval_is_retracted_by_later_changes_request() {
        let mut ctx = TriggerContext::push_to_main("main");
        ctx.kind = TriggerKind::PullRequestReview;
        ctx.latest_reviews = latest_review_per_reviewer(&[
            review(Some("alice"), ReviewState::Approved),
            review(Some("alice"), ReviewState::ChangesRequested),
        ]);
        assert!(!ctx.is_approved());

        ctx.latest_reviews = latest_review_per_reviewer(&[
            review(Some("alice"), ReviewState::ChangesRequested),
            review(Some("bob"), ReviewState::Approved),
        ]);
        assert!(ctx.is_approved());
    }
}
