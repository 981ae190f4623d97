//! Bug Report Routes

use super::required_json;
use crate::audit::AuditAction;
use crate::error::{validation_error, ApiResult};
use crate::models::{BugReportListResponse, BugReportReceipt, BugReportRequest, SuccessResponse};
use crate::state::SharedState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use validator::Validate;

/// POST /api/bug-reports
pub async fn submit_bug_report(
    State(state): State<SharedState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SuccessResponse<BugReportReceipt>>)> {
    let payload: BugReportRequest = required_json(&body)?;
    payload.validate().map_err(|e| validation_error(e.to_string()))?;

    let report = state
        .bug_reports
        .submit(payload.description, payload.reporter, payload.page)
        .await?;

    state
        .workflow
        .audit()
        .record(AuditAction::BugReported, report.id, None)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data(
            "Bug report received",
            BugReportReceipt { id: report.id },
        )),
    ))
}

/// GET /api/bug-reports
pub async fn list_bug_reports(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<BugReportListResponse>>> {
    let bug_reports = state.bug_reports.list().await;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} bug reports", bug_reports.len()),
        BugReportListResponse { bug_reports },
    )))
}
