//! Proposal request and response DTOs

use super::RuleContentRequest;
use crate::workflow::{Enhancement, FeedbackType, NewProposal, Proposal, ProposalFeedback, RuleOverrides};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to submit a proposal directly
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProposalRequest {
    #[validate(length(min = 1, max = 256, message = "Rule type must be between 1 and 256 characters"))]
    pub rule_type: String,

    #[validate(length(min = 1, max = 10000, message = "Description must be between 1 and 10000 characters"))]
    pub description: String,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub submitted_by: Option<String>,

    #[validate(length(max = 100000))]
    #[serde(default)]
    pub diff: Option<String>,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub project: Option<String>,

    #[validate(length(max = 32, message = "At most 32 categories"))]
    #[serde(default)]
    pub categories: Vec<String>,

    #[validate(length(max = 32, message = "At most 32 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(nested)]
    #[serde(flatten)]
    pub content: RuleContentRequest,
}

impl From<SubmitProposalRequest> for NewProposal {
    fn from(req: SubmitProposalRequest) -> Self {
        NewProposal {
            rule_type: req.rule_type,
            description: req.description,
            submitted_by: req.submitted_by,
            diff: req.diff,
            project: req.project,
            categories: req.categories,
            tags: req.tags,
            content: req.content.into(),
        }
    }
}

/// Optional overrides supplied when approving
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    #[validate(length(max = 256))]
    #[serde(default)]
    pub added_by: Option<String>,

    #[validate(length(max = 32))]
    #[serde(default)]
    pub categories: Option<Vec<String>>,

    #[validate(length(max = 32))]
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl From<ApproveRequest> for RuleOverrides {
    fn from(req: ApproveRequest) -> Self {
        RuleOverrides {
            added_by: req.added_by,
            categories: req.categories,
            tags: req.tags,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub feedback_type: FeedbackType,

    #[validate(length(max = 10000))]
    #[serde(default)]
    pub comments: Option<String>,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProposalListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub proposal: Proposal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalListResponse {
    pub proposals: Vec<Proposal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertResponse {
    pub enhancement_id: Uuid,
    pub enhancement: Enhancement,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub feedback: ProposalFeedback,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackListResponse {
    pub feedback: Vec<ProposalFeedback>,
}
