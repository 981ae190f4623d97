//! Bug report DTOs

use crate::bug_report::BugReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BugReportRequest {
    #[validate(length(min = 1, max = 10000, message = "Description must be between 1 and 10000 characters"))]
    pub description: String,

    #[validate(length(max = 256))]
    #[serde(default)]
    pub reporter: Option<String>,

    #[validate(length(max = 1024))]
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReportReceipt {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReportListResponse {
    pub bug_reports: Vec<BugReport>,
}
