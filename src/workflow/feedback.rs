//! Reviewer feedback on proposals
//!
//! Annotations only. Feedback never moves a proposal's status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Accept,
    Reject,
    NeedsChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalFeedback {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub feedback_type: FeedbackType,
    pub comments: Option<String>,
    pub submitted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only feedback log
pub struct FeedbackLog {
    entries: RwLock<Vec<ProposalFeedback>>,
}

impl FeedbackLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub async fn append(&self, feedback: ProposalFeedback) -> ProposalFeedback {
        self.entries.write().await.push(feedback.clone());
        feedback
    }

    /// Feedback for one proposal, oldest first
    pub async fn for_proposal(&self, proposal_id: Uuid) -> Vec<ProposalFeedback> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|f| f.proposal_id == proposal_id)
            .cloned()
            .collect()
    }
}

impl Default for FeedbackLog {
    fn default() -> Self {
        Self::new()
    }
}
