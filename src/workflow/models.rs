//! Workflow entities
//!
//! Enhancements, proposals and rules as the engine stores them, plus the
//! input shapes used to create them.

use crate::error::{validation_error, AppError};
use crate::workflow::{EnhancementStatus, ProposalStatus};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Labels are matched against comma-separated filters, so commas are never allowed.
static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_ .:/+#-]{0,63}$").expect("label pattern compiles")
});

/// Set of tag or category labels
pub type Labels = BTreeSet<String>;

/// Anything kept in an entity collection
pub trait Entity: Clone + Send + Sync + 'static {
    /// Human-readable collection name used in error messages
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Descriptive body of a rule, carried unchanged through every promotion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    /// Paths, languages or components the rule targets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applies_to: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to_rationale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_for_change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    /// Text of the rule being changed, for proposals that amend one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_rule: Option<String>,
}

impl RuleContent {
    /// Trim every field; blanks collapse to absent
    pub fn normalized(self) -> Self {
        Self {
            examples: optional_text(self.examples),
            applies_to: self
                .applies_to
                .into_iter()
                .filter_map(|s| optional_text(Some(s)))
                .collect(),
            applies_to_rationale: optional_text(self.applies_to_rationale),
            user_story: optional_text(self.user_story),
            reason_for_change: optional_text(self.reason_for_change),
            references: optional_text(self.references),
            current_rule: optional_text(self.current_rule),
        }
    }
}

/// An unreviewed improvement suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enhancement {
    pub id: Uuid,
    pub description: String,
    pub suggested_by: Option<String>,
    /// Free-form path of the page the suggestion was made from
    pub page: Option<String>,
    pub tags: Labels,
    pub categories: Labels,
    pub project: Option<String>,
    #[serde(flatten)]
    pub content: RuleContent,
    pub status: EnhancementStatus,
    /// Proposal created when this enhancement was transferred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_to: Option<Uuid>,
    /// Proposal this enhancement was reverted from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_proposal: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Enhancement {
    const KIND: &'static str = "Enhancement";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A reviewable rule-change request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub rule_type: String,
    pub description: String,
    pub submitted_by: Option<String>,
    /// Textual patch against an existing rule
    pub diff: Option<String>,
    pub project: Option<String>,
    pub categories: Labels,
    pub tags: Labels,
    #[serde(flatten)]
    pub content: RuleContent,
    pub status: ProposalStatus,
    /// Enhancement this proposal was promoted from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Uuid>,
    /// Rule published when this proposal was approved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<Uuid>,
    /// Enhancement created when this proposal was sent back to triage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverted_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Proposal {
    const KIND: &'static str = "Proposal";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// A live rule. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub rule_type: String,
    pub description: String,
    pub added_by: Option<String>,
    pub project: Option<String>,
    pub categories: Labels,
    pub tags: Labels,
    pub diff: Option<String>,
    #[serde(flatten)]
    pub content: RuleContent,
    pub created_at: DateTime<Utc>,
}

impl Entity for Rule {
    const KIND: &'static str = "Rule";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Fields accepted when submitting an enhancement
#[derive(Debug, Clone, Default)]
pub struct NewEnhancement {
    pub description: String,
    pub suggested_by: Option<String>,
    pub page: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub project: Option<String>,
    pub content: RuleContent,
}

/// Fields accepted when submitting a proposal directly
#[derive(Debug, Clone, Default)]
pub struct NewProposal {
    pub rule_type: String,
    pub description: String,
    pub submitted_by: Option<String>,
    pub diff: Option<String>,
    pub project: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub content: RuleContent,
}

/// Reviewer-supplied overrides applied when a proposal becomes a rule
#[derive(Debug, Clone, Default)]
pub struct RuleOverrides {
    pub added_by: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Enhancement {
    pub fn new(input: NewEnhancement) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            description: required_text("description", input.description)?,
            suggested_by: optional_text(input.suggested_by),
            page: optional_text(input.page),
            tags: normalize_labels("tags", input.tags)?,
            categories: normalize_labels("categories", input.categories)?,
            project: optional_text(input.project),
            content: input.content.normalized(),
            status: EnhancementStatus::Open,
            transferred_to: None,
            source_proposal: None,
            timestamp: now,
            updated_at: now,
        })
    }
}

impl Proposal {
    pub fn new(input: NewProposal) -> Result<Self, AppError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            rule_type: required_text("rule_type", input.rule_type)?,
            description: required_text("description", input.description)?,
            submitted_by: optional_text(input.submitted_by),
            diff: input.diff.filter(|d| !d.trim().is_empty()),
            project: optional_text(input.project),
            categories: normalize_labels("categories", input.categories)?,
            tags: normalize_labels("tags", input.tags)?,
            content: input.content.normalized(),
            status: ProposalStatus::Pending,
            provenance: None,
            rule_id: None,
            reverted_to: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Trim a required field, rejecting blank values
pub fn required_text(field: &str, value: String) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field; blank collapses to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim labels, drop empties, dedupe, and reject anything outside the label pattern
pub fn normalize_labels<I>(field: &str, labels: I) -> Result<Labels, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Labels::new();
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        if !LABEL_PATTERN.is_match(label) {
            return Err(validation_error(format!(
                "Invalid label '{}' in {}: use letters, digits, spaces or _ . : / + # - (max 64 chars, no commas)",
                label, field
            )));
        }
        out.insert(label.to_string());
    }
    Ok(out)
}
