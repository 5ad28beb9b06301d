//! Asana client for the PR status sync
//!
//! Mirrors the layout of `gh-client`: a `TaskTracker` trait the sync depends
//! on, and `AsanaClient` as the production implementation over reqwest.

pub mod client;
pub mod types;

pub use client::{AsanaClient, TaskTracker, DEFAULT_API_URL};
pub use types::{CustomField, EnumOption, Task};
