//! Sync pull request state to Asana task statuses
//!
//! The crate is split along the flow of a single run:
//!
//! - [`extractor`] finds task references in a PR description or commit message
//! - [`trigger`] captures the CI event and the PR it concerns
//! - [`status_field`] is the view of a task's status field
//! - [`decision`] maps all of the above to the status to write, without I/O
//! - [`sync`] drives the clients and collects a [`SyncReport`]

pub mod decision;
pub mod extractor;
pub mod outcome;
pub mod status_field;
pub mod sync;
pub mod trigger;

pub use decision::{decide, Rule, StatusDecision};
pub use extractor::{extract_references, ReferenceExtractor, TaskRef};
pub use outcome::{SkipReason, SyncError, SyncReport, TaskOutcome};
pub use status_field::{StatusField, StatusOption};
pub use sync::{StatusSync, SyncEvent};
pub use trigger::{latest_review_per_reviewer, TriggerContext, TriggerKind};
