//! Status decision engine
//!
//! Pure mapping from trigger context, status rules and the task's current
//! status to the status that should be written. Holds no client and does no
//! I/O, so every rule is testable in isolation.

use crate::status_field::StatusField;
use crate::trigger::{TriggerContext, TriggerKind};
use action_config::StatusRules;
use std::fmt;

/// The rule that produced a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// PR is merged but not from the main branch
    Merged,
    /// Change landed on the main branch
    MergedToMain,
    /// PR is approved
    Approved,
    /// PR is approved, but the task is in a status that must be kept
    ApprovedKeepsStatus,
    /// PR is approved, but carries a label that suppresses the status write
    ApprovedSkipLabel,
    /// PR is a draft
    Draft,
    /// PR is open and ready for review
    ReadyForReview,
    /// Nothing configured for this situation
    NoMatch,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rule::Merged => "merged PR",
            Rule::MergedToMain => "merged to main",
            Rule::Approved => "approved PR",
            Rule::ApprovedKeepsStatus => "approved PR, status kept",
            Rule::ApprovedSkipLabel => "approved PR, skip label present",
            Rule::Draft => "draft PR",
            Rule::ReadyForReview => "PR ready for review",
            Rule::NoMatch => "no matching rule",
        };
        f.write_str(text)
    }
}

/// What to do with one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDecision {
    /// Status option name to write; None leaves the task alone
    pub target_status: Option<String>,
    /// Whether the approval label should be added to the PR
    pub apply_approval_label: bool,
    pub rule: Rule,
}

impl StatusDecision {
    fn set(status: &str, rule: Rule) -> Self {
        Self {
            target_status: Some(status.to_string()),
            apply_approval_label: false,
            rule,
        }
    }

    fn unchanged(rule: Rule) -> Self {
        Self {
            target_status: None,
            apply_approval_label: false,
            rule,
        }
    }
}

/// Decide the target status for one task; the first matching rule wins
pub fn decide(ctx: &TriggerContext, field: &StatusField, rules: &StatusRules) -> StatusDecision {
    match ctx.kind {
        TriggerKind::PushToMain => match &rules.merged_to_main {
            Some(status) => StatusDecision::set(status, Rule::MergedToMain),
            None => StatusDecision::unchanged(Rule::NoMatch),
        },
        TriggerKind::PullRequest | TriggerKind::PullRequestReview => {
            decide_for_pull_request(ctx, field, rules)
        }
    }
}

fn decide_for_pull_request(
    ctx: &TriggerContext,
    field: &StatusField,
    rules: &StatusRules,
) -> StatusDecision {
    if ctx.merged {
        return match (&rules.merged_to_main, ctx.head_is_main()) {
            (Some(status), true) => StatusDecision::set(status, Rule::MergedToMain),
            _ => StatusDecision::unchanged(Rule::Merged),
        };
    }

    if ctx.is_approved() && !ctx.draft {
        if field.current_is_any_of(&rules.skip_approved_if_status_is) {
            return StatusDecision::unchanged(Rule::ApprovedKeepsStatus);
        }

        let apply_approval_label = rules.label_when_approved.is_some();
        if ctx.has_any_label(&rules.skip_approved_if_labeled_with) {
            return StatusDecision {
                target_status: None,
                apply_approval_label,
                rule: Rule::ApprovedSkipLabel,
            };
        }

        return StatusDecision {
            target_status: rules.approved.clone(),
            apply_approval_label,
            rule: Rule::Approved,
        };
    }

    if ctx.draft {
        if let Some(status) = &rules.draft {
            return StatusDecision::set(status, Rule::Draft);
        }
    }

    match &rules.ready_for_review {
        Some(status) => StatusDecision::set(status, Rule::ReadyForReview),
        None => StatusDecision::unchanged(Rule::NoMatch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status_field::StatusOption;
    use gh_client::ReviewState;
    use pretty_assertions::assert_eq;

    const READY: &str = "📖 In Code Review";
    const DRAFT: &str = "✏️ In Development";
    const MERGED: &str = "ᛦ Merged";
    const APPROVED: &str = "🏁 Ready to merge";
    const TESTING: &str = "🤞Testing";

    fn is_noop(decision: &StatusDecision) -> bool {
        decision.target_status.is_none() && !decision.apply_approval_label
    }

    fn rules() -> StatusRules {
        StatusRules {
            field_name: Some("Status".to_string()),
            ready_for_review: Some(READY.to_string()),
            draft: Some(DRAFT.to_string()),
            merged_to_main: Some(MERGED.to_string()),
            approved: Some(APPROVED.to_string()),
            skip_approved_if_labeled_with: vec![],
            skip_approved_if_status_is: vec![],
            label_when_approved: None,
        }
    }

    fn field(current: Option<&str>) -> StatusField {
        StatusField {
            name: "Status".to_string(),
            gid: "20".to_string(),
            options: [READY, DRAFT, MERGED, APPROVED, TESTING]
                .iter()
                .enumerate()
                .map(|(i, name)| StatusOption {
                    name: name.to_string(),
                    gid: format!("2{}", i),
                })
                .collect(),
            current: current.map(str::to_string),
        }
    }

    fn open_pr() -> TriggerContext {
        let mut ctx = TriggerContext::push_to_main("main");
        ctx.kind = TriggerKind::PullRequest;
        ctx.head_branch = "feature/login".to_string();
        ctx
    }

    fn approved_pr() -> TriggerContext {
        let mut ctx = open_pr();
        ctx.kind = TriggerKind::PullRequestReview;
        ctx.latest_reviews.insert("alice".to_string(), ReviewState::Approved);
        ctx
    }

    #[test]
    fn test_ready_for_review() {
        let decision = decide(&open_pr(), &field(None), &rules());
        assert_eq!(decision, StatusDecision::set(READY, Rule::ReadyForReview));
    }

    #[test]
    fn test_draft() {
        let mut ctx = open_pr();
        ctx.draft = true;
        let decision = decide(&ctx, &field(None), &rules());
        assert_eq!(decision.target_status.as_deref(), Some(DRAFT));
        assert_eq!(decision.rule, Rule::Draft);
    }

    #[test]
    fn test_draft_without_draft_status_falls_through_to_ready() {
        let mut ctx = open_pr();
        ctx.draft = true;
        let rules = StatusRules {
            draft: None,
            ..rules()
        };
        let decision = decide(&ctx, &field(None), &rules);
        assert_eq!(decision.target_status.as_deref(), Some(READY));
    }

    #[test]
    fn test_nothing_configured_is_noop() {
        let rules = StatusRules {
            field_name: Some("Status".to_string()),
            ..StatusRules::default()
        };
        let decision = decide(&open_pr(), &field(None), &rules);
        assert!(is_noop(&decision));
        assert_eq!(decision.rule, Rule::NoMatch);
    }

    #[test]
    fn test_approved_with_label() {
        let rules = StatusRules {
            label_when_approved: Some("approved".to_string()),
            ..rules()
        };
        let decision = decide(&approved_pr(), &field(Some(READY)), &rules);

        assert_eq!(decision.target_status.as_deref(), Some(APPROVED));
        assert!(decision.apply_approval_label);
        assert_eq!(decision.rule, Rule::Approved);
    }

    #[test]
    fn test_approved_without_label_configured() {
        let decision = decide(&approved_pr(), &field(Some(READY)), &rules());
        assert_eq!(decision.target_status.as_deref(), Some(APPROVED));
        assert!(!decision.apply_approval_label);
    }

    #[test]
    fn test_approved_in_skip_listed_status_is_noop_without_label() {
        let rules = StatusRules {
            skip_approved_if_status_is: vec![TESTING.to_string()],
            label_when_approved: Some("approved".to_string()),
            ..rules()
        };
        let decision = decide(&approved_pr(), &field(Some(TESTING)), &rules);

        assert!(is_noop(&decision));
        assert_eq!(decision.rule, Rule::ApprovedKeepsStatus);
    }

    #[test]
    fn test_approved_with_skip_label_only_requests_label() {
        let mut ctx = approved_pr();
        ctx.labels.insert("qa".to_string());
        let rules = StatusRules {
            skip_approved_if_labeled_with: vec!["hold".to_string(), "qa".to_string()],
            label_when_approved: Some("approved".to_string()),
            ..rules()
        };
        let decision = decide(&ctx, &field(Some(READY)), &rules);

        assert_eq!(decision.target_status, None);
        assert!(decision.apply_approval_label);
        assert_eq!(decision.rule, Rule::ApprovedSkipLabel);
    }

    #[test]
    fn test_unrelated_labels_do_not_suppress_approved() {
        let mut ctx = approved_pr();
        ctx.labels.insert("backend".to_string());
        let rules = StatusRules {
            skip_approved_if_labeled_with: vec!["qa".to_string()],
            ..rules()
        };
        let decision = decide(&ctx, &field(Some(READY)), &rules);
        assert_eq!(decision.target_status.as_deref(), Some(APPROVED));
    }

    #[test]
    fn test_approved_draft_is_treated_as_draft() {
        let mut ctx = approved_pr();
        ctx.draft = true;
        let decision = decide(&ctx, &field(Some(READY)), &rules());
        assert_eq!(decision.target_status.as_deref(), Some(DRAFT));
    }

    #[test]
    fn test_retracted_approval_falls_back_to_ready() {
        let mut ctx = approved_pr();
        ctx.latest_reviews.insert("alice".to_string(), ReviewState::ChangesRequested);
        let decision = decide(&ctx, &field(Some(APPROVED)), &rules());
        assert_eq!(decision.target_status.as_deref(), Some(READY));
    }

    #[test]
    fn test_merged_pr_is_noop() {
        let mut ctx = approved_pr();
        ctx.merged = true;
        let decision = decide(&ctx, &field(Some(APPROVED)), &rules());
        assert!(is_noop(&decision));
        assert_eq!(decision.rule, Rule::Merged);
    }

    #[test]
    fn test_merged_with_head_main_sets_merged_status() {
        let mut ctx = open_pr();
        ctx.merged = true;
        ctx.head_branch = "main".to_string();
        let decision = decide(&ctx, &field(Some(READY)), &rules());
        assert_eq!(decision, StatusDecision::set(MERGED, Rule::MergedToMain));
    }

    #[test]
    fn test_merged_with_head_main_without_merged_status_is_noop() {
        let mut ctx = open_pr();
        ctx.merged = true;
        ctx.head_branch = "main".to_string();
        let rules = StatusRules {
            merged_to_main: None,
            ..rules()
        };
        assert!(is_noop(&decide(&ctx, &field(Some(READY)), &rules)));
    }

    #[test]
    fn test_push_to_main() {
        let ctx = TriggerContext::push_to_main("main");
        let decision = decide(&ctx, &field(Some(APPROVED)), &rules());
        assert_eq!(decision.target_status.as_deref(), Some(MERGED));

        let rules = StatusRules {
            merged_to_main: None,
            ..rules()
        };
        let decision = decide(&ctx, &field(Some(APPROVED)), &rules);
        assert!(is_noop(&decision));
        assert_eq!(decision.rule, Rule::NoMatch);
    }
}
