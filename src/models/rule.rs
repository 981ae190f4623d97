//! Rule listing DTOs

use crate::workflow::{optional_text, parse_label_list, Rule, RuleContent, RuleFilter};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Rule body fields accepted on enhancement and proposal submission
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleContentRequest {
    #[validate(length(max = 10000))]
    pub examples: Option<String>,

    #[validate(length(max = 32, message = "At most 32 appliesTo entries"))]
    pub applies_to: Vec<String>,

    #[validate(length(max = 10000))]
    pub applies_to_rationale: Option<String>,

    #[validate(length(max = 10000))]
    pub user_story: Option<String>,

    #[validate(length(max = 10000))]
    pub reason_for_change: Option<String>,

    #[validate(length(max = 10000))]
    pub references: Option<String>,

    #[validate(length(max = 10000))]
    pub current_rule: Option<String>,
}

impl From<RuleContentRequest> for RuleContent {
    fn from(req: RuleContentRequest) -> Self {
        RuleContent {
            examples: req.examples,
            applies_to: req.applies_to,
            applies_to_rationale: req.applies_to_rationale,
            user_story: req.user_story,
            reason_for_change: req.reason_for_change,
            references: req.references,
            current_rule: req.current_rule,
        }
    }
}

/// Comma-separated filters; an absent or empty axis matches everything
#[derive(Debug, Default, Deserialize)]
pub struct RuleListQuery {
    pub categories: Option<String>,
    pub tags: Option<String>,
    pub project: Option<String>,
}

impl From<RuleListQuery> for RuleFilter {
    fn from(query: RuleListQuery) -> Self {
        RuleFilter {
            categories: parse_label_list(query.categories.as_deref()),
            tags: parse_label_list(query.tags.as_deref()),
            project: optional_text(query.project),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub rule: Rule,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleListResponse {
    pub rules: Vec<Rule>,
}
