// src/services/scanner.rs

//! Keyword scanner producing context windows around failure lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CandidateExcerpt, LogMember, ScanConfig};

/// Line boundaries: CRLF first, then any single universal-newline character.
static LINE_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\n\r\x0B\x0C\x1C\x1D\x1E\x{85}\x{2028}\x{2029}]").ok()
});

/// Finds failure evidence in one log member.
///
/// Matching is a plain substring test against the upper-cased line. A line
/// that matches a keyword but also contains a noise pattern is vetoed.
#[derive(Debug, Clone)]
pub struct LineScanner {
    keywords: Vec<String>,
    noise_patterns: Vec<String>,
    before: usize,
    after: usize,
    max_per_member: usize,
}

impl LineScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            keywords: normalize(&config.keywords),
            noise_patterns: normalize(&config.noise_patterns),
            before: config.context_before,
            after: config.context_after,
            max_per_member: config.max_excerpts_per_member,
        }
    }

    /// Whether a single line counts as a match.
    pub fn is_match(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        if !self.keywords.iter().any(|k| upper.contains(k.as_str())) {
            return false;
        }
        !self.noise_patterns.iter().any(|n| upper.contains(n.as_str()))
    }

    /// Scan a member, returning at most `max_per_member` excerpts in line order.
    pub fn scan(&self, member: &LogMember) -> Vec<CandidateExcerpt> {
        let lines = split_lines(&member.content);
        let mut excerpts = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if excerpts.len() >= self.max_per_member {
                break;
            }
            if !self.is_match(line) {
                continue;
            }

            log::debug!("Found match in: {} (Line {})", member.name, i + 1);

            let start = i.saturating_sub(self.before);
            let end = lines.len().min(i.saturating_add(self.after));
            excerpts.push(CandidateExcerpt {
                source_member: member.name.clone(),
                center_line_index: i,
                text: lines[start..end].join("\n"),
            });
        }

        excerpts
    }
}

/// Split on every line boundary, including a bare `\r`.
///
/// Progress output redraws a line with `\r`; each redraw counts as its own
/// line. A trailing terminator does not produce an empty last line.
fn split_lines(content: &str) -> Vec<&str> {
    let Some(re) = LINE_BREAK.as_ref() else {
        return content.lines().collect();
    };
    let mut lines: Vec<&str> = re.split(content).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

fn normalize(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.to_uppercase())
        .collect()
}
