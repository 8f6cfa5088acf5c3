//! Candidate excerpts and the evidence set handed to the analysis engine.

use serde::{Deserialize, Serialize};

/// Delimiter closing every rendered excerpt.
pub const EXCERPT_DELIMITER: &str = "---";

/// A window of log lines around one matched line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateExcerpt {
    /// Archive member the excerpt was taken from
    pub source_member: String,

    /// Zero-based index of the matched line
    pub center_line_index: usize,

    /// Newline-joined context window
    pub text: String,
}

impl CandidateExcerpt {
    /// Render the excerpt as one tagged section.
    pub fn render(&self) -> String {
        format!(
            "Step Log [{}]:\n{}\n{}",
            self.source_member, self.text, EXCERPT_DELIMITER
        )
    }
}

/// Ordered excerpts for one run, in member-scan order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceSet {
    excerpts: Vec<CandidateExcerpt>,
}

impl EvidenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, excerpts: impl IntoIterator<Item = CandidateExcerpt>) {
        self.excerpts.extend(excerpts);
    }

    pub fn is_empty(&self) -> bool {
        self.excerpts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.excerpts.len()
    }

    pub fn excerpts(&self) -> &[CandidateExcerpt] {
        &self.excerpts
    }

    /// Number of distinct members that contributed evidence.
    pub fn member_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&str> = None;
        for excerpt in &self.excerpts {
            if last != Some(excerpt.source_member.as_str()) {
                count += 1;
                last = Some(&excerpt.source_member);
            }
        }
        count
    }

    /// Render every excerpt as a single ordered text block.
    pub fn render(&self) -> String {
        self.excerpts
            .iter()
            .map(CandidateExcerpt::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for EvidenceSet {
    type Item = CandidateExcerpt;
    type IntoIter = std::vec::IntoIter<CandidateExcerpt>;

    fn into_iter(self) -> Self::IntoIter {
        self.excerpts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excerpt(member: &str, line: usize, text: &str) -> CandidateExcerpt {
        CandidateExcerpt {
            source_member: member.to_string(),
            center_line_index: line,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_single() {
        let e = excerpt("1_build.txt", 3, "make\nERROR: boom");
        assert_eq!(e.render(), "Step Log [1_build.txt]:\nmake\nERROR: boom\n---");
    }

    #[test]
    fn test_render_set_keeps_order() {
        let mut set = EvidenceSet::new();
        set.extend([excerpt("1_a.txt", 0, "a"), excerpt("2_b.txt", 0, "b")]);

        let rendered = set.render();
        assert_eq!(
            rendered,
            "Step Log [1_a.txt]:\na\n---\nStep Log [2_b.txt]:\nb\n---"
        );
    }

    #[test]
    fn test_member_count() {
        let mut set = EvidenceSet::new();
        assert_eq!(set.member_count(), 0);
        set.extend([
            excerpt("1_a.txt", 0, "a"),
            excerpt("1_a.txt", 4, "a"),
            excerpt("2_b.txt", 1, "b"),
        ]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.member_count(), 2);
    }
}
