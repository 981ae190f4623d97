//! Workflow module - the review lifecycle
//!
//! Enhancements are triaged, promoted into proposals, and proposals are
//! approved into rules or sent back. Everything that changes a status goes
//! through [`WorkflowEngine`].

mod engine;
mod feedback;
mod models;
mod query;
mod status;
mod store;
mod translate;

pub use engine::WorkflowEngine;
pub use feedback::{FeedbackType, ProposalFeedback};
pub use models::*;
pub use query::{parse_label_list, RuleFilter};
pub use status::*;
