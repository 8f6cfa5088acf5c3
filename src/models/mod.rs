// src/models/mod.rs

//! Domain models for the analysis pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod evidence;
mod report;
mod run;

// Re-export all public types
pub use config::{AnalysisConfig, Config, GithubConfig, NotificationConfig, ScanConfig};
pub use evidence::{CandidateExcerpt, EXCERPT_DELIMITER, EvidenceSet};
pub use report::{AnalysisStatus, RunOutcome, RunReport, RunState};
pub use run::{Credentials, RunTarget};

/// One named text entry of a log archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMember {
    pub name: String,
    pub content: String,
}
