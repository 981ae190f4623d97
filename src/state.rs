//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::bug_report::BugReportLog;
use crate::workflow::WorkflowEngine;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Review workflow: enhancements, proposals, rules (has internal locking)
    pub workflow: WorkflowEngine,

    /// Bug report intake
    pub bug_reports: BugReportLog,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workflow: WorkflowEngine::new(),
            bug_reports: BugReportLog::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
