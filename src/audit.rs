//! Audit trail
//!
//! Append-only record of every committed mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // Enhancement actions
    EnhancementSubmitted,
    EnhancementAccepted,
    EnhancementRejected,
    EnhancementCompleted,
    EnhancementTransferred,

    // Proposal actions
    ProposalSubmitted,
    ProposalApproved,
    ProposalRejected,
    ProposalReverted,
    FeedbackAdded,

    // Rule actions
    RuleCreated,

    BugReported,
}

impl AuditAction {
    pub fn resource_type(&self) -> &'static str {
        match self {
            AuditAction::EnhancementSubmitted
            | AuditAction::EnhancementAccepted
            | AuditAction::EnhancementRejected
            | AuditAction::EnhancementCompleted
            | AuditAction::EnhancementTransferred => "enhancement",
            AuditAction::ProposalSubmitted
            | AuditAction::ProposalApproved
            | AuditAction::ProposalRejected
            | AuditAction::ProposalReverted
            | AuditAction::FeedbackAdded => "proposal",
            AuditAction::RuleCreated => "rule",
            AuditAction::BugReported => "bug_report",
        }
    }
}

/// In-memory audit log
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Log an audit entry
    pub async fn record(
        &self,
        action: AuditAction,
        resource_id: Uuid,
        details: Option<serde_json::Value>,
    ) {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            action,
            resource_type: action.resource_type().to_string(),
            resource_id: Some(resource_id),
            details,
        };
        self.entries.write().await.push(entry);
    }

    /// Get audit log entries, most recent first
    pub async fn entries(
        &self,
        resource_type: Option<&str>,
        resource_id: Option<Uuid>,
        limit: usize,
    ) -> Vec<AuditEntry> {
        let log = self.entries.read().await;

        log.iter()
            .rev()
            .filter(|e| {
                resource_type.map(|t| e.resource_type == t).unwrap_or(true)
                    && resource_id.map(|id| e.resource_id == Some(id)).unwrap_or(true)
            })
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_filter_and_order() {
        let log = AuditLog::new();
        let enh = Uuid::new_v4();
        let proposal = Uuid::new_v4();

        log.record(AuditAction::EnhancementSubmitted, enh, None).await;
        log.record(AuditAction::EnhancementTransferred, enh, None).await;
        log.record(AuditAction::ProposalSubmitted, proposal, None).await;

        let all = log.entries(None, None, 10).await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].action, AuditAction::ProposalSubmitted);

        let for_enh = log.entries(Some("enhancement"), Some(enh), 10).await;
        assert_eq!(
            for_enh.iter().map(|e| e.action).collect::<Vec<_>>(),
            vec![AuditAction::EnhancementTransferred, AuditAction::EnhancementSubmitted]
        );

        assert_eq!(log.entries(None, None, 1).await.len(), 1);
        assert!(log.entries(Some("rule"), None, 10).await.is_empty());
    }
}
