//! Enhancement Routes
//!
//! Intake and triage of enhancement suggestions.

use super::{optional_json, required_json};
use crate::error::{validation_error, AppError};
use crate::models::{
    EnhancementListQuery, EnhancementListResponse, EnhancementResponse, SubmitEnhancementRequest,
    SuccessResponse, TransferRequest, TransferResponse,
};
use crate::state::SharedState;
use crate::workflow::EnhancementStatus;
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

/// POST /api/enhancements
pub async fn submit_enhancement(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse<EnhancementResponse>>), AppError> {
    let payload: SubmitEnhancementRequest = required_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let enhancement = state.workflow.submit_enhancement(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Enhancement submitted",
            EnhancementResponse { enhancement },
        )),
    ))
}

/// GET /api/enhancements?status=
pub async fn list_enhancements(
    State(state): State<SharedState>,
    query: Result<Query<EnhancementListQuery>, QueryRejection>,
) -> Result<Json<SuccessResponse<EnhancementListResponse>>, AppError> {
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<EnhancementStatus>)
        .transpose()
        .map_err(|e| validation_error(e.to_string()))?;

    let enhancements = state.workflow.list_enhancements(status).await;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} enhancements", enhancements.len()),
        EnhancementListResponse { enhancements },
    )))
}

/// GET /api/enhancements/{id}
pub async fn get_enhancement(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<EnhancementResponse>>, AppError> {
    let Path(id) = path?;
    let enhancement = state.workflow.get_enhancement(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Enhancement retrieved",
        EnhancementResponse { enhancement },
    )))
}

/// POST /api/enhancements/{id}/accept
pub async fn accept_enhancement(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<EnhancementResponse>>, AppError> {
    let Path(id) = path?;
    let enhancement = state.workflow.accept_enhancement(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Enhancement accepted",
        EnhancementResponse { enhancement },
    )))
}

/// POST /api/enhancements/{id}/reject
pub async fn reject_enhancement(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<EnhancementResponse>>, AppError> {
    let Path(id) = path?;
    let enhancement = state.workflow.reject_enhancement(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Enhancement rejected",
        EnhancementResponse { enhancement },
    )))
}

/// POST /api/enhancements/{id}/complete
pub async fn complete_enhancement(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse<EnhancementResponse>>, AppError> {
    let Path(id) = path?;
    let enhancement = state.workflow.complete_enhancement(id).await?;
    Ok(Json(SuccessResponse::with_data(
        "Enhancement completed",
        EnhancementResponse { enhancement },
    )))
}

/// POST /api/enhancements/{id}/transfer
pub async fn transfer_enhancement(
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<SuccessResponse<TransferResponse>>), AppError> {
    let Path(id) = path?;
    let payload: TransferRequest = optional_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let rule_type = payload.rule_type.unwrap_or_default();
    let proposal = state
        .workflow
        .transfer_enhancement(id, &rule_type, payload.submitted_by)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Enhancement transferred to proposal",
            TransferResponse {
                proposal_id: proposal.id,
                proposal,
            },
        )),
    ))
}
