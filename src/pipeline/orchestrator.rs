// src/pipeline/orchestrator.rs

//! Run orchestration: fetch, scan, analyze, notify.
//!
//! Each run walks `Fetching → Scanning → (NoEvidence | Analyzing) →
//! Notifying → Done` exactly once. Nothing is retried and no state outlives
//! the run.

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, Credentials, EvidenceSet, RunOutcome, RunReport, RunState, RunTarget};
use crate::services::{
    AnalysisEngine, AnalysisResult, EvidenceAggregator, GeminiClient, GithubLogSource, LogArchive,
    LogSource, NotificationSink, SmtpNotifier, build_prompt,
};
use crate::utils::log as console;

const TOTAL_STEPS: usize = 4;

/// A state together with the data it carries into the next one.
enum Step {
    Fetching,
    Scanning(Vec<u8>),
    NoEvidence,
    Analyzing(EvidenceSet),
    Notifying(AnalysisResult),
    Done(RunOutcome),
}

impl Step {
    fn state(&self) -> RunState {
        match self {
            Step::Fetching => RunState::Fetching,
            Step::Scanning(_) => RunState::Scanning,
            Step::NoEvidence => RunState::NoEvidence,
            Step::Analyzing(_) => RunState::Analyzing,
            Step::Notifying(_) => RunState::Notifying,
            Step::Done(_) => RunState::Done,
        }
    }
}

/// Sequences the pipeline stages for one run at a time.
pub struct Orchestrator {
    config: Config,
    recipient: String,
    source: Box<dyn LogSource>,
    engine: Box<dyn AnalysisEngine>,
    sink: Box<dyn NotificationSink>,
    aggregator: EvidenceAggregator,
}

impl Orchestrator {
    /// Build an orchestrator backed by GitHub, Gemini and SMTP.
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        let source = GithubLogSource::new(&config.github, credentials.github_token)?;
        let engine = GeminiClient::new(&config.analysis, credentials.gemini_key)?;
        let sink = SmtpNotifier::new(
            &config.notification,
            &credentials.smtp_user,
            &credentials.smtp_pass,
        )?;
        Ok(Self::with_collaborators(
            config,
            credentials.recipient,
            Box::new(source),
            Box::new(engine),
            Box::new(sink),
        ))
    }

    /// Build an orchestrator around arbitrary collaborators.
    pub fn with_collaborators(
        config: Config,
        recipient: impl Into<String>,
        source: Box<dyn LogSource>,
        engine: Box<dyn AnalysisEngine>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        let aggregator = EvidenceAggregator::new(&config.scan);
        Self {
            config,
            recipient: recipient.into(),
            source,
            engine,
            sink,
            aggregator,
        }
    }

    /// Run the state machine to completion.
    ///
    /// Failures are folded into the returned report rather than propagated.
    pub async fn run(&self, target: &RunTarget) -> RunReport {
        let started_at = Utc::now();
        let mut report = RunReport {
            outcome: RunOutcome::Healthy,
            transitions: Vec::new(),
            excerpt_count: 0,
            skipped_members: Vec::new(),
            diagnosis: None,
            started_at,
            finished_at: started_at,
        };

        let mut step = Step::Fetching;
        loop {
            report.transitions.push(step.state());
            step = match step {
                Step::Fetching => self.fetch(target).await,
                Step::Scanning(bytes) => self.scan(&bytes, &mut report),
                Step::NoEvidence => {
                    log::info!("No errors found. Pipeline looks healthy!");
                    Step::Done(RunOutcome::Healthy)
                }
                Step::Analyzing(evidence) => self.analyze(&evidence).await,
                Step::Notifying(result) => self.notify(target, result, &mut report).await,
                Step::Done(outcome) => {
                    report.outcome = outcome;
                    break;
                }
            };
        }

        report.finished_at = Utc::now();
        report
    }

    async fn fetch(&self, target: &RunTarget) -> Step {
        console::step(1, TOTAL_STEPS, "Fetch - Downloading run logs");
        match self.source.fetch(target).await {
            Ok(bytes) => Step::Scanning(bytes),
            Err(e) => {
                log::error!("Failed to get logs: {e}");
                let status = match e {
                    AppError::Fetch { status } => Some(status),
                    _ => None,
                };
                Step::Done(RunOutcome::FetchFailed {
                    status,
                    message: e.to_string(),
                })
            }
        }
    }

    fn scan(&self, bytes: &[u8], report: &mut RunReport) -> Step {
        console::step(2, TOTAL_STEPS, "Scan - Searching log files for errors");
        let archive = match LogArchive::open(bytes) {
            Ok(archive) => archive,
            Err(e) => {
                log::error!("Cannot open log archive: {e}");
                return Step::Done(RunOutcome::CorruptArchive {
                    message: e.to_string(),
                });
            }
        };

        let outcome = self.aggregator.aggregate(&archive);
        report.excerpt_count = outcome.evidence.len();
        report.skipped_members = outcome.skipped_members;
        console::sub_item(&format!(
            "{} members in archive, {} scanned, {} skipped",
            archive.len(),
            outcome.scanned_members,
            report.skipped_members.len()
        ));

        if outcome.evidence.is_empty() {
            return Step::NoEvidence;
        }
        log::info!(
            "Found {} potential issues in {} step logs.",
            outcome.evidence.len(),
            outcome.evidence.member_count()
        );
        Step::Analyzing(outcome.evidence)
    }

    async fn analyze(&self, evidence: &EvidenceSet) -> Step {
        console::step(3, TOTAL_STEPS, "Analyze - Asking the analysis engine");
        let prompt = build_prompt(evidence);
        log::debug!("Analysis prompt:\n{prompt}");

        let result = AnalysisResult::from_response(self.engine.generate(&prompt).await);
        console::header("ARCA AI ANALYSIS");
        console::block(&result.text);
        console::separator();
        Step::Notifying(result)
    }

    async fn notify(
        &self,
        target: &RunTarget,
        result: AnalysisResult,
        report: &mut RunReport,
    ) -> Step {
        console::step(4, TOTAL_STEPS, "Notify - Delivering the diagnosis");
        let subject = target.format(&self.config.notification.subject_template);
        let delivery = self.sink.send(&subject, &result.text, &self.recipient).await;
        let analysis = result.status;
        report.diagnosis = Some(result.text);

        match delivery {
            Ok(()) => Step::Done(RunOutcome::Notified { analysis }),
            Err(e) => {
                log::error!("Failed to send notification: {e}");
                Step::Done(RunOutcome::NotificationFailed {
                    analysis,
                    message: e.to_string(),
                })
            }
        }
    }
}
