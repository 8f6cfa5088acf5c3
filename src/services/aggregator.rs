// src/services/aggregator.rs

//! Evidence aggregation across every member of a log archive.

use crate::models::{EvidenceSet, ScanConfig};

use super::archive::LogArchive;
use super::scanner::LineScanner;

/// Evidence for one run plus the members that could not be read.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    pub evidence: EvidenceSet,
    pub scanned_members: usize,
    pub skipped_members: Vec<String>,
}

/// Drives the scanner over eligible members in archive order.
#[derive(Debug, Clone)]
pub struct EvidenceAggregator {
    scan: ScanConfig,
    scanner: LineScanner,
}

impl EvidenceAggregator {
    pub fn new(scan: &ScanConfig) -> Self {
        Self {
            scan: scan.clone(),
            scanner: LineScanner::new(scan),
        }
    }

    /// Collect evidence from all eligible members.
    ///
    /// Only the per-member cap applies; there is no cap across members.
    /// Members that fail to decompress or decode are skipped with a warning.
    pub fn aggregate(&self, archive: &LogArchive<'_>) -> AggregateOutcome {
        let mut outcome = AggregateOutcome::default();

        for name in archive.members() {
            if !self.scan.is_eligible(name) {
                log::debug!("Skipping non-step member {name}");
                continue;
            }

            let member = match archive.read(name) {
                Ok(member) => member,
                Err(e) => {
                    log::warn!("Skipping unreadable member {name}: {e}");
                    outcome.skipped_members.push(name.to_string());
                    continue;
                }
            };

            outcome.scanned_members += 1;
            outcome.evidence.extend(self.scanner.scan(&member));
        }

        outcome
    }
}
