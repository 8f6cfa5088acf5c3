//! Service layer for the analysis pipeline.
//!
//! This module contains the evidence engine:
//! - Archive decoding (`LogArchive`)
//! - Per-member keyword scanning (`LineScanner`)
//! - Run-wide evidence collection (`EvidenceAggregator`)
//!
//! and the adapters for the external collaborators:
//! - Log download (`GithubLogSource`)
//! - Diagnosis generation (`GeminiClient`)
//! - Delivery (`SmtpNotifier`)

mod aggregator;
mod analysis;
mod archive;
mod github;
mod notify;
mod scanner;

pub use aggregator::{AggregateOutcome, EvidenceAggregator};
pub use analysis::{
    AnalysisEngine, AnalysisResult, GeminiClient, RATE_LIMIT_GUIDANCE, build_prompt,
    is_rate_limit_message,
};
pub use archive::LogArchive;
pub use github::{GithubLogSource, LogSource};
pub use notify::{NotificationSink, SmtpNotifier, build_message};
pub use scanner::LineScanner;

#[cfg(test)]
pub(crate) use archive::tests::build_zip;
