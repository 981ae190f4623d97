//! Audit Routes

use crate::error::ApiResult;
use crate::models::{AuditListResponse, AuditQuery, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{
        rejection::QueryRejection,
        Query, State,
    },
    Json,
};

/// GET /api/audit?resourceType=&resourceId=&limit=
pub async fn list_audit_entries(
    State(state): State<SharedState>,
    query: Result<Query<AuditQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessResponse<AuditListResponse>>> {
    let Query(query) = query?;
    let entries = state
        .workflow
        .audit()
        .entries(
            query.resource_type.as_deref(),
            query.resource_id,
            query.effective_limit(),
        )
        .await;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} audit entries", entries.len()),
        AuditListResponse { entries },
    )))
}
