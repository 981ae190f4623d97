//! Enhancement request and response DTOs

use super::RuleContentRequest;
use crate::workflow::{Enhancement, NewEnhancement, Proposal};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request to submit an enhancement suggestion
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnhancementRequest {
    #[validate(length(min = 1, max = 10000, message = "Description must be between 1 and 10000 characters"))]
    pub description: String,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub suggested_by: Option<String>,

    #[validate(length(max = 1024))]
    #[serde(default)]
    pub page: Option<String>,

    #[validate(length(max = 32, message = "At most 32 tags"))]
    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 32, message = "At most 32 categories"))]
    #[serde(default)]
    pub categories: Vec<String>,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub project: Option<String>,

    #[validate(nested)]
    #[serde(flatten)]
    pub content: RuleContentRequest,
}

impl From<SubmitEnhancementRequest> for NewEnhancement {
    fn from(req: SubmitEnhancementRequest) -> Self {
        NewEnhancement {
            description: req.description,
            suggested_by: req.suggested_by,
            page: req.page,
            tags: req.tags,
            categories: req.categories,
            project: req.project,
            content: req.content.into(),
        }
    }
}

/// Request to promote an enhancement into a proposal
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Required; kept optional here so a missing value reports as a validation error
    #[validate(length(max = 256))]
    #[serde(default)]
    pub rule_type: Option<String>,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnhancementListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResponse {
    pub enhancement: Enhancement,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementListResponse {
    pub enhancements: Vec<Enhancement>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub proposal_id: Uuid,
    pub proposal: Proposal,
}
