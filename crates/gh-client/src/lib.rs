//! GitHub API client for the PR sync actions
//!
//! This crate provides a trait-based GitHub API client. The actions depend
//! on the `GitHubClient` trait only; `OctocrabClient` is the production
//! implementation and tests provide in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - fetch_pull_request() / fetch_reviews()        │
//! │  - add_labels()                                  │
//! │  - fetch_pull_requests() / update_branch()       │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐
//!              │ OctocrabClient  │
//!              │ (direct API)    │
//!              └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{build_client, GitHubClient, TokenResolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = build_client(&TokenResolver::new(None), None).await?;
//! let reviews = client.fetch_reviews("owner", "repo", 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use client::GitHubClient;
pub use client_manager::{build_client, TokenResolver};
pub use octocrab_client::OctocrabClient;
pub use types::{PullRequest, Review, ReviewState};
