//! GitHub Action entry points for syncing PR state to Asana
//!
//! Two binaries share this library:
//!
//! - `sync-task-status` sets the status of every task referenced by a PR or a
//!   push to the main branch
//! - `update-branches` merges the main branch into open PRs

pub mod branch_update;
pub mod event;
pub mod logger;

pub use branch_update::{BranchUpdateReport, BranchUpdater};

/// Step output: whether any task status was written
pub const OUTPUT_DID_SET_STATUS: &str = "did-set-status";
/// Step output: the last status value written
pub const OUTPUT_STATUS_FIELD_VALUE: &str = "status-field-value";
/// Step output: number of PR branches updated
pub const OUTPUT_UPDATED_PULL_REQUESTS: &str = "updated-pull-requests";

/// Load a local `.env` file for runs outside of CI
///
/// Must run before `logger::init` so `RUST_LOG` from the file is honored;
/// returns the path that was loaded so it can be logged afterwards.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}
