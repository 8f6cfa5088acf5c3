//! Run states and the final report of one orchestrated run.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Orchestrator states, in the order a full run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Fetching,
    Scanning,
    NoEvidence,
    Analyzing,
    Notifying,
    Done,
}

/// How the analysis step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnalysisStatus {
    Diagnosed,
    RateLimited,
    Failed,
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    /// Logs could not be downloaded
    FetchFailed { status: Option<u16>, message: String },
    /// The downloaded archive could not be opened
    CorruptArchive { message: String },
    /// No evidence found; analysis and notification were skipped
    Healthy,
    /// Analysis ran and the notification was delivered
    Notified { analysis: AnalysisStatus },
    /// Analysis ran but the notification was rejected
    NotificationFailed {
        analysis: AnalysisStatus,
        message: String,
    },
}

/// Summary of a single run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub transitions: Vec<RunState>,
    pub excerpt_count: usize,
    pub skipped_members: Vec<String>,
    pub diagnosis: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Process exit code; non-zero only when the run aborted before scanning finished.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::FetchFailed { .. } | RunOutcome::CorruptArchive { .. } => 1,
            _ => 0,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.outcome == RunOutcome::Healthy
    }

    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
