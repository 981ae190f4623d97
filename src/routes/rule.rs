//! Rule Routes

use crate::error::ApiResult;
use crate::models::{RuleListQuery, RuleListResponse, RuleResponse, SuccessResponse};
use crate::state::SharedState;
use crate::workflow::RuleFilter;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use uuid::Uuid;

/// GET /api/rules?categories=a,b&tags=x&project=
pub async fn list_rules(
    State(state): State<SharedState>,
    query: Result<Query<RuleListQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessResponse<RuleListResponse>>> {
    let Query(query) = query?;
    let filter = RuleFilter::from(query);
    let rules = state.workflow.list_rules(&filter).await;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} rules", rules.len()),
        RuleListResponse { rules },
    )))
}

/// GET /api/rules/{id}
pub async fn get_rule(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<SuccessResponse<RuleResponse>>> {
    let Path(id) = path?;
    let rule = state.workflow.get_rule(id).await?;
    Ok(Json(SuccessResponse::with_data("Rule retrieved", RuleResponse { rule })))
}
