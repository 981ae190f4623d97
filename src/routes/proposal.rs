//! Proposal Routes
//!
//! Review decisions on proposals, plus reviewer feedback.

use super::{optional_json, required_json};
use crate::error::{validation_error, AppError};
use crate::models::{
    ApproveRequest, FeedbackListResponse, FeedbackRequest, FeedbackResponse, ProposalListQuery,
    ProposalListResponse, ProposalResponse, RevertResponse, RuleResponse, SubmitProposalRequest,
    SuccessResponse,
};
use crate::state::SharedState;
use crate::workflow::ProposalStatus;
use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

/// POST /api/proposals
pub async fn submit_proposal(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse<ProposalResponse>>), AppError> {
    let payload: SubmitProposalRequest = required_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let proposal = state.workflow.submit_proposal(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Proposal submitted",
            ProposalResponse { proposal },
        )),
    ))
}

/// GET /api/proposals?status=
pub async fn list_proposals(
    State(state): State<SharedState>,
    query: Result<Query<ProposalListQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse<ProposalListResponse>>, AppError> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ProposalStatus>)
        .transpose()
        .map_err(|e| validation_error(e.to_string()))?;

    let proposals = state.workflow.list_proposals(status).await;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} proposals", proposals.len()),
        ProposalListResponse { proposals },
    )))
}

/// GET /api/proposals/{id}
pub async fn get_proposal(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<ProposalResponse>>, AppError> {
    let Path(id) = path?;
    let proposal = state.workflow.get_proposal(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Proposal retrieved",
        ProposalResponse { proposal },
    )))
}

/// POST /api/proposals/{id}/approve
///
/// Body is optional. Returns the rule created from the proposal.
pub async fn approve_proposal(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse<RuleResponse>>), AppError> {
    let Path(id) = path?;
    let payload: ApproveRequest = optional_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let rule = state.workflow.approve_proposal(id, payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Proposal approved",
            RuleResponse { rule },
        )),
    ))
}

/// POST /api/proposals/{id}/reject
pub async fn reject_proposal(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<ProposalResponse>>, AppError> {
    let Path(id) = path?;
    let proposal = state.workflow.reject_proposal(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Proposal rejected",
        ProposalResponse { proposal },
    )))
}

/// POST /api/proposals/{id}/revert
pub async fn revert_proposal(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<(StatusCode, Json<SuccessResponse<RevertResponse>>), AppError> {
    let Path(id) = path?;
    let enhancement = state.workflow.revert_proposal(id).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Proposal reverted to enhancement",
            RevertResponse {
                enhancement_id: enhancement.id,
                enhancement,
            },
        )),
    ))
}

/// POST /api/proposals/{id}/feedback
pub async fn submit_feedback(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse<FeedbackResponse>>), AppError> {
    let Path(id) = path?;
    let payload: FeedbackRequest = required_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let feedback = state
        .workflow
        .submit_feedback(id, payload.feedback_type, payload.comments, payload.submitted_by)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Feedback recorded",
            FeedbackResponse { feedback },
        )),
    ))
}

/// GET /api/proposals/{id}/feedback
pub async fn list_feedback(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<FeedbackListResponse>>, AppError> {
    let Path(id) = path?;
    let feedback = state.workflow.list_feedback(id).await?;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} feedback entries", feedback.len()),
        FeedbackListResponse { feedback },
    )))
}
