// src/pipeline/run.rs

//! Entry point for analyzing a single CI run.

use crate::error::Result;
use crate::models::{Config, Credentials, RunOutcome, RunReport, RunTarget};
use crate::utils::log as console;

use super::orchestrator::Orchestrator;

/// Analyze one run end to end and log a summary.
///
/// Only construction errors are returned; stage failures end up in the report.
pub async fn run_analysis(
    config: Config,
    credentials: Credentials,
    target: &RunTarget,
) -> Result<RunReport> {
    console::header(&format!("ARCA Agent: analyzing {target}"));

    let orchestrator = Orchestrator::new(config, credentials)?;
    let report = orchestrator.run(target).await;

    console::summary("Run analysis", &summary_items(&report));
    Ok(report)
}

fn describe(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::FetchFailed {
            status: Some(status),
            ..
        } => format!("fetch failed (HTTP {status})"),
        RunOutcome::FetchFailed { message, .. } => format!("fetch failed ({message})"),
        RunOutcome::CorruptArchive { message } => format!("corrupt archive ({message})"),
        RunOutcome::Healthy => "pipeline healthy".to_string(),
        RunOutcome::Notified { analysis } => format!("notified ({analysis:?})"),
        RunOutcome::NotificationFailed { analysis, message } => {
            format!("notification failed ({analysis:?}): {message}")
        }
    }
}

fn summary_items(report: &RunReport) -> Vec<(&'static str, String)> {
    let mut items = vec![
        ("Outcome", describe(&report.outcome)),
        ("Excerpts", report.excerpt_count.to_string()),
        ("Elapsed", format!("{} ms", report.elapsed_ms())),
    ];
    if !report.skipped_members.is_empty() {
        items.push(("Skipped members", report.skipped_members.join(", ")));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisStatus, RunState};
    use chrono::Utc;

    #[test]
    fn test_describe() {
        assert_eq!(describe(&RunOutcome::Healthy), "pipeline healthy");
        assert_eq!(
            describe(&RunOutcome::FetchFailed {
                status: Some(404),
                message: "Fetch failed with HTTP status 404".into()
            }),
            "fetch failed (HTTP 404)"
        );
        assert_eq!(
            describe(&RunOutcome::Notified {
                analysis: AnalysisStatus::RateLimited
            }),
            "notified (RateLimited)"
        );
    }

    #[test]
    fn test_summary_lists_skipped_members() {
        let now = Utc::now();
        let report = RunReport {
            outcome: RunOutcome::Healthy,
            transitions: vec![RunState::Fetching, RunState::Done],
            excerpt_count: 0,
            skipped_members: vec!["1_setup.txt".into()],
            diagnosis: None,
            started_at: now,
            finished_at: now,
        };
        let items = summary_items(&report);
        assert_eq!(items.len(), 4);
        assert_eq!(items[3].1, "1_setup.txt");
    }
}
