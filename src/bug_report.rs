//! Bug report intake
//!
//! A plain append-only log. Reports sit outside the review workflow.

use crate::error::AppError;
use crate::workflow::{optional_text, required_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugReport {
    pub id: Uuid,
    pub description: String,
    pub reporter: Option<String>,
    pub page: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct BugReportLog {
    reports: RwLock<Vec<BugReport>>,
}

impl BugReportLog {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(Vec::new()),
        }
    }

    pub async fn submit(
        &self,
        description: String,
        reporter: Option<String>,
        page: Option<String>,
    ) -> Result<BugReport, AppError> {
        let report = BugReport {
            id: Uuid::new_v4(),
            description: required_text("description", description)?,
            reporter: optional_text(reporter),
            page: optional_text(page),
            timestamp: Utc::now(),
        };
        self.reports.write().await.push(report.clone());

        info!("Bug report received (id: {})", report.id);
        Ok(report)
    }

    /// All reports, newest first
    pub async fn list(&self) -> Vec<BugReport> {
        self.reports.read().await.iter().rev().cloned().collect()
    }
}

impl Default for BugReportLog {
    fn default() -> Self {
        Self::new()
    }
}
