//! Keep open PR branches up to date with the main branch
//!
//! Asks GitHub to merge the base branch into every open, non-draft PR that
//! targets the main branch, subject to the configured label filters.

use action_config::{BranchUpdateConfig, BranchUpdateFilters};
use anyhow::{Context, Result};
use gh_client::{GitHubClient, PullRequest};
use log::{debug, info, warn};

/// Outcome of one updater run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BranchUpdateReport {
    /// PRs whose branch was updated
    pub updated: Vec<u64>,
    /// PRs GitHub refused to update (conflicts, missing permissions, ...)
    pub failed: Vec<u64>,
}

/// Whether a PR passes the label filters
pub fn passes_filters(pr: &PullRequest, filters: &BranchUpdateFilters) -> bool {
    if !filters.only_labeled_with.is_empty()
        && !filters.only_labeled_with.iter().any(|label| pr.has_label(label))
    {
        return false;
    }

    !filters.skip_labeled_with.iter().any(|label| pr.has_label(label))
}

pub struct BranchUpdater<G> {
    github: G,
    config: BranchUpdateConfig,
}

impl<G: GitHubClient> BranchUpdater<G> {
    pub fn new(github: G, config: BranchUpdateConfig) -> Self {
        Self { github, config }
    }

    /// Update every eligible PR in `owner/repo`
    ///
    /// Failing to list PRs is an error; a failed update only affects that PR.
    pub async fn run(&self, owner: &str, repo: &str) -> Result<BranchUpdateReport> {
        let main_branch = &self.config.main_branch_name;
        let prs = self
            .github
            .fetch_pull_requests(owner, repo, Some(main_branch))
            .await
            .with_context(|| format!("Failed to list pull requests targeting {}", main_branch))?;
        info!("Found {} open PR(s) targeting {}", prs.len(), main_branch);

        let mut report = BranchUpdateReport::default();
        for pr in prs.iter().filter(|pr| pr.base_branch == *main_branch) {
            if pr.draft {
                debug!("Skipping draft PR #{}", pr.number);
                continue;
            }
            if !passes_filters(pr, &self.config.filters) {
                debug!("Skipping PR #{} because of its labels", pr.number);
                continue;
            }

            match self
                .github
                .update_pull_request_branch(owner, repo, pr.number)
                .await
            {
                Ok(()) => {
                    info!("🔄 Updated branch of PR #{} ({})", pr.number, pr.head_branch);
                    report.updated.push(pr.number);
                }
                Err(err) => {
                    warn!("Failed to update branch of PR #{}: {:#}", pr.number, err);
                    report.failed.push(pr.number);
                }
            }
        }

        Ok(report)
    }
}
