//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.

use crate::client::GitHubClient;
use crate::types::{PullRequest, Review, ReviewState};
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use std::sync::Arc;

/// Page size for list endpoints, the maximum GitHub allows
const PER_PAGE: u8 = 100;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        base_branch: Option<&str>,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching PRs for {}/{}", owner, repo);

        let pulls = self.octocrab.pulls(owner, repo);
        let mut request = pulls
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PER_PAGE);
        if let Some(branch) = base_branch {
            request = request.base(branch);
        }

        let first_page = request
            .send()
            .await
            .with_context(|| format!("Failed to list PRs for {}/{}", owner, repo))?;
        let pulls = self
            .octocrab
            .all_pages(first_page)
            .await
            .with_context(|| format!("Failed to page through PRs of {}/{}", owner, repo))?;

        let mut prs: Vec<PullRequest> = pulls.iter().map(convert_pull_request).collect();

        // Oldest first so updates are applied in a stable order
        prs.sort_by(|a, b| a.number.cmp(&b.number));

        debug!("Fetched {} PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<PullRequest> {
        debug!("Fetching PR #{} for {}/{}", pr_number, owner, repo);

        let pr = self
            .octocrab
            .pulls(owner, repo)
            .get(pr_number)
            .await
            .with_context(|| format!("Failed to fetch PR #{} in {}/{}", pr_number, owner, repo))?;

        Ok(convert_pull_request(&pr))
    }

    async fn fetch_reviews(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Review>> {
        debug!("Fetching reviews of PR #{} for {}/{}", pr_number, owner, repo);

        let first_page = self
            .octocrab
            .pulls(owner, repo)
            .list_reviews(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await
            .with_context(|| format!("Failed to list reviews of PR #{}", pr_number))?;

        let reviews = self
            .octocrab
            .all_pages(first_page)
            .await
            .with_context(|| format!("Failed to page through reviews of PR #{}", pr_number))?;

        let reviews: Vec<Review> = reviews.iter().filter_map(convert_review).collect();
        debug!("Fetched {} reviews of PR #{}", reviews.len(), pr_number);
        Ok(reviews)
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        debug!("Adding labels {:?} to PR #{}", labels, pr_number);

        // PRs are issues as far as labels are concerned
        self.octocrab
            .issues(owner, repo)
            .add_labels(pr_number, labels)
            .await
            .with_context(|| format!("Failed to add labels to PR #{}", pr_number))?;

        Ok(())
    }

    async fn update_pull_request_branch(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<()> {
        debug!("Updating branch of PR #{} in {}/{}", pr_number, owner, repo);

        self.octocrab
            .pulls(owner, repo)
            .update_branch(pr_number)
            .await
            .with_context(|| format!("Failed to update branch of PR #{}", pr_number))?;

        Ok(())
    }
}

/// Convert octocrab PullRequest to our PullRequest type
fn convert_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        base_branch: pr.base.ref_field.clone(),
        head_branch: pr.head.ref_field.clone(),
        draft: pr.draft.unwrap_or(false),
        merged_at: pr.merged_at,
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
    }
}

/// Convert an octocrab review, dropping reviews without a known state
fn convert_review(review: &octocrab::models::pulls::Review) -> Option<Review> {
    let state = convert_review_state(review.state.as_ref()?)?;
    Some(Review {
        reviewer: review.user.as_ref().map(|u| u.login.clone()),
        state,
    })
}

fn convert_review_state(state: &octocrab::models::pulls::ReviewState) -> Option<ReviewState> {
    use octocrab::models::pulls::ReviewState as ORS;
    match state {
        ORS::Approved => Some(ReviewState::Approved),
        ORS::ChangesRequested => Some(ReviewState::ChangesRequested),
        ORS::Commented => Some(ReviewState::Commented),
        ORS::Dismissed => Some(ReviewState::Dismissed),
        ORS::Pending => Some(ReviewState::Pending),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
