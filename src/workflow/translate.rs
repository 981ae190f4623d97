//! Promotion and reversal mappings
//!
//! Pure functions. They build the new record; the engine decides when it is
//! written and which source status changes go with it.

use crate::error::AppError;
use crate::workflow::models::{normalize_labels, optional_text, required_text};
use crate::workflow::{
    Enhancement, EnhancementStatus, Proposal, ProposalStatus, Rule, RuleOverrides,
};
use chrono::Utc;
use uuid::Uuid;

/// Enhancement -> Proposal.
///
/// `rule_type` is not known at suggestion time and must come from the reviewer.
/// `submitted_by` falls back to whoever suggested the enhancement.
pub fn proposal_from_enhancement(
    enhancement: &Enhancement,
    rule_type: &str,
    submitted_by: Option<String>,
) -> Result<Proposal, AppError> {
    let now = Utc::now();
    Ok(Proposal {
        id: Uuid::new_v4(),
        rule_type: required_text("rule_type", rule_type.to_string())?,
        description: enhancement.description.clone(),
        submitted_by: optional_text(submitted_by).or_else(|| enhancement.suggested_by.clone()),
        diff: None,
        project: enhancement.project.clone(),
        categories: enhancement.categories.clone(),
        tags: enhancement.tags.clone(),
        content: enhancement.content.clone(),
        status: ProposalStatus::Pending,
        provenance: Some(enhancement.id),
        rule_id: None,
        reverted_to: None,
        created_at: now,
        updated_at: now,
    })
}

/// Proposal -> Enhancement (revert). The diff is dropped.
pub fn enhancement_from_proposal(proposal: &Proposal) -> Enhancement {
    let now = Utc::now();
    Enhancement {
        id: Uuid::new_v4(),
        description: proposal.description.clone(),
        suggested_by: proposal.submitted_by.clone(),
        page: None,
        tags: proposal.tags.clone(),
        categories: proposal.categories.clone(),
        project: proposal.project.clone(),
        content: proposal.content.clone(),
        status: EnhancementStatus::Open,
        transferred_to: None,
        source_proposal: Some(proposal.id),
        timestamp: now,
        updated_at: now,
    }
}

/// Proposal -> Rule (approve)
pub fn rule_from_proposal(proposal: &Proposal, overrides: RuleOverrides) -> Result<Rule, AppError> {
    let categories = match overrides.categories {
        Some(categories) => normalize_labels("categories", categories)?,
        None => proposal.categories.clone(),
    };
    let tags = match overrides.tags {
        Some(tags) => normalize_labels("tags", tags)?,
        None => proposal.tags.clone(),
    };

    Ok(Rule {
        id: Uuid::new_v4(),
        proposal_id: proposal.id,
        rule_type: proposal.rule_type.clone(),
        description: proposal.description.clone(),
        added_by: optional_text(overrides.added_by).or_else(|| proposal.submitted_by.clone()),
        project: proposal.project.clone(),
        categories,
        tags,
        diff: proposal.diff.clone(),
        content: proposal.content.clone(),
        created_at: Utc::now(),
    })
}
