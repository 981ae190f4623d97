//! Transition engine
//!
//! Validates and applies every status change on enhancements and proposals.
//! A transition holds the source entity's lock from the status check until
//! every record it touches has been written, so racing requests on the same
//! id serialize and the loser sees the new status.
//!
//! Audit entries for a transition are written under the same lock, so the
//! trail for one entity follows its commit order.

use crate::audit::{AuditAction, AuditLog};
use crate::error::AppError;
use crate::workflow::feedback::{FeedbackLog, FeedbackType, ProposalFeedback};
use crate::workflow::models::optional_text;
use crate::workflow::store::WorkflowStore;
use crate::workflow::{
    translate, Enhancement, EnhancementAction, EnhancementStatus, NewEnhancement, NewProposal,
    Proposal, ProposalAction, ProposalStatus, Rule, RuleFilter, RuleOverrides,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

/// Collection sizes, for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStats {
    pub enhancements: usize,
    pub proposals: usize,
    pub rules: usize,
}

pub struct WorkflowEngine {
    store: WorkflowStore,
    feedback: FeedbackLog,
    audit: AuditLog,
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self {
            store: WorkflowStore::new(),
            feedback: FeedbackLog::new(),
            audit: AuditLog::new(),
        }
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // =========================================================================
    // ENHANCEMENTS
    // =========================================================================

    pub async fn submit_enhancement(&self, input: NewEnhancement) -> Result<Enhancement, AppError> {
        let enhancement = self.store.enhancements.insert(Enhancement::new(input)?).await?;

        info!("Enhancement submitted (id: {})", enhancement.id);
        self.audit
            .record(
                AuditAction::EnhancementSubmitted,
                enhancement.id,
                Some(json!({ "suggestedBy": enhancement.suggested_by })),
            )
            .await;
        Ok(enhancement)
    }

    pub async fn get_enhancement(&self, id: Uuid) -> Result<Enhancement, AppError> {
        self.store.enhancements.get(id).await
    }

    pub async fn list_enhancements(&self, status: Option<EnhancementStatus>) -> Vec<Enhancement> {
        let mut enhancements = self.store.enhancements.list().await;
        if let Some(status) = status {
            enhancements.retain(|e| e.status == status);
        }
        enhancements
    }

    pub async fn accept_enhancement(&self, id: Uuid) -> Result<Enhancement, AppError> {
        self.advance_enhancement(id, EnhancementAction::Accept, AuditAction::EnhancementAccepted)
            .await
    }

    pub async fn reject_enhancement(&self, id: Uuid) -> Result<Enhancement, AppError> {
        self.advance_enhancement(id, EnhancementAction::Reject, AuditAction::EnhancementRejected)
            .await
    }

    pub async fn complete_enhancement(&self, id: Uuid) -> Result<Enhancement, AppError> {
        self.advance_enhancement(id, EnhancementAction::Complete, AuditAction::EnhancementCompleted)
            .await
    }

    /// Single-entity status change
    async fn advance_enhancement(
        &self,
        id: Uuid,
        action: EnhancementAction,
        audit_action: AuditAction,
    ) -> Result<Enhancement, AppError> {
        let slot = self.store.enhancements.slot(id).await?;
        let updated = {
            let mut enhancement = slot.lock().await;
            let next = enhancement.status.apply(action).map_err(|e| {
                debug!("Rejected {} on enhancement {}: {}", action.as_str(), id, e);
                e
            })?;
            enhancement.status = next;
            enhancement.updated_at = Utc::now();
            self.audit
                .record(audit_action, id, Some(json!({ "status": next })))
                .await;
            enhancement.clone()
        };

        info!("Enhancement {} is now {}", id, updated.status);
        Ok(updated)
    }

    /// Promote an open enhancement into a pending proposal.
    ///
    /// The new proposal and the `transferred` status become visible together:
    /// both are written while the enhancement's lock is held.
    pub async fn transfer_enhancement(
        &self,
        id: Uuid,
        rule_type: &str,
        submitted_by: Option<String>,
    ) -> Result<Proposal, AppError> {
        let slot = self.store.enhancements.slot(id).await?;
        let proposal = {
            let mut enhancement = slot.lock().await;
            let next = enhancement.status.apply(EnhancementAction::Transfer).map_err(|e| {
                debug!("Rejected transfer on enhancement {}: {}", id, e);
                e
            })?;
            let proposal = translate::proposal_from_enhancement(&enhancement, rule_type, submitted_by)?;
            let proposal = self.store.proposals.insert(proposal).await?;

            enhancement.status = next;
            enhancement.transferred_to = Some(proposal.id);
            enhancement.updated_at = Utc::now();
            self.audit
                .record(
                    AuditAction::EnhancementTransferred,
                    id,
                    Some(json!({ "proposalId": proposal.id, "ruleType": proposal.rule_type })),
                )
                .await;
            proposal
        };

        info!("Enhancement {} transferred to proposal {}", id, proposal.id);
        Ok(proposal)
    }

    // =========================================================================
    // PROPOSALS
    // =========================================================================

    /// Create a proposal directly, without an originating enhancement
    pub async fn submit_proposal(&self, input: NewProposal) -> Result<Proposal, AppError> {
        let proposal = self.store.proposals.insert(Proposal::new(input)?).await?;

        info!("Proposal '{}' submitted (id: {})", proposal.rule_type, proposal.id);
        self.audit
            .record(
                AuditAction::ProposalSubmitted,
                proposal.id,
                Some(json!({ "ruleType": proposal.rule_type })),
            )
            .await;
        Ok(proposal)
    }

    pub async fn get_proposal(&self, id: Uuid) -> Result<Proposal, AppError> {
        self.store.proposals.get(id).await
    }

    pub async fn list_proposals(&self, status: Option<ProposalStatus>) -> Vec<Proposal> {
        let mut proposals = self.store.proposals.list().await;
        if let Some(status) = status {
            proposals.retain(|p| p.status == status);
        }
        proposals
    }

    /// Approve a pending proposal and publish its rule.
    ///
    /// The rule is inserted before the status flips, both under the
    /// proposal's lock, so one proposal can never yield two rules.
    pub async fn approve_proposal(&self, id: Uuid, overrides: RuleOverrides) -> Result<Rule, AppError> {
        let slot = self.store.proposals.slot(id).await?;
        let rule = {
            let mut proposal = slot.lock().await;
            let next = proposal.status.apply(ProposalAction::Approve).map_err(|e| {
                debug!("Rejected approve on proposal {}: {}", id, e);
                e
            })?;
            let rule = translate::rule_from_proposal(&proposal, overrides)?;
            let rule = self.store.rules.insert(rule).await?;

            proposal.status = next;
            proposal.rule_id = Some(rule.id);
            proposal.updated_at = Utc::now();
            self.audit
                .record(AuditAction::ProposalApproved, id, Some(json!({ "ruleId": rule.id })))
                .await;
            self.audit
                .record(AuditAction::RuleCreated, rule.id, Some(json!({ "proposalId": id })))
                .await;
            rule
        };

        info!("Proposal {} approved, rule {} created", id, rule.id);
        Ok(rule)
    }

    pub async fn reject_proposal(&self, id: Uuid) -> Result<Proposal, AppError> {
        let slot = self.store.proposals.slot(id).await?;
        let updated = {
            let mut proposal = slot.lock().await;
            let next = proposal.status.apply(ProposalAction::Reject).map_err(|e| {
                debug!("Rejected reject on proposal {}: {}", id, e);
                e
            })?;
            proposal.status = next;
            proposal.updated_at = Utc::now();
            self.audit.record(AuditAction::ProposalRejected, id, None).await;
            proposal.clone()
        };

        info!("Proposal {} rejected", id);
        Ok(updated)
    }

    /// Send a pending or rejected proposal back to triage as a fresh open
    /// enhancement. The proposal moves to `reverted` and can no longer be
    /// approved, rejected or reverted again.
    pub async fn revert_proposal(&self, id: Uuid) -> Result<Enhancement, AppError> {
        let slot = self.store.proposals.slot(id).await?;
        let enhancement = {
            let mut proposal = slot.lock().await;
            let next = proposal.status.apply(ProposalAction::Revert).map_err(|e| {
                debug!("Rejected revert on proposal {}: {}", id, e);
                e
            })?;

            let enhancement = translate::enhancement_from_proposal(&proposal);
            let enhancement = self.store.enhancements.insert(enhancement).await?;

            proposal.status = next;
            proposal.reverted_to = Some(enhancement.id);
            proposal.updated_at = Utc::now();
            self.audit
                .record(
                    AuditAction::ProposalReverted,
                    id,
                    Some(json!({ "enhancementId": enhancement.id })),
                )
                .await;
            enhancement
        };

        info!("Proposal {} reverted to enhancement {}", id, enhancement.id);
        Ok(enhancement)
    }

    pub async fn submit_feedback(
        &self,
        proposal_id: Uuid,
        feedback_type: FeedbackType,
        comments: Option<String>,
        submitted_by: Option<String>,
    ) -> Result<ProposalFeedback, AppError> {
        self.store.proposals.slot(proposal_id).await?;

        let feedback = self
            .feedback
            .append(ProposalFeedback {
                id: Uuid::new_v4(),
                proposal_id,
                feedback_type,
                comments: optional_text(comments),
                submitted_by: optional_text(submitted_by),
                created_at: Utc::now(),
            })
            .await;

        debug!("Feedback {:?} recorded on proposal {}", feedback_type, proposal_id);
        self.audit
            .record(
                AuditAction::FeedbackAdded,
                proposal_id,
                Some(json!({ "feedbackId": feedback.id, "feedbackType": feedback_type })),
            )
            .await;
        Ok(feedback)
    }

    pub async fn list_feedback(&self, proposal_id: Uuid) -> Result<Vec<ProposalFeedback>, AppError> {
        self.store.proposals.slot(proposal_id).await?;
        Ok(self.feedback.for_proposal(proposal_id).await)
    }

    // =========================================================================
    // RULES
    // =========================================================================

    pub async fn get_rule(&self, id: Uuid) -> Result<Rule, AppError> {
        self.store.rules.get(id).await
    }

    pub async fn list_rules(&self, filter: &RuleFilter) -> Vec<Rule> {
        let mut rules = self.store.rules.list().await;
        rules.retain(|r| filter.matches(r));
        rules
    }

    pub async fn stats(&self) -> WorkflowStats {
        WorkflowStats {
            enhancements: self.store.enhancements.count().await,
            proposals: self.store.proposals.count().await,
            rules: self.store.rules.count().await,
        }
    }
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}
