//! Run identity and per-run credentials.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

static REPOSITORY_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").ok());

/// One CI run: `owner/name` plus the numeric run id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunTarget {
    pub repository: String,
    pub run_id: u64,
}

impl RunTarget {
    /// Build a validated run target.
    pub fn new(repository: impl Into<String>, run_id: u64) -> Result<Self> {
        let repository = repository.into();
        let valid = REPOSITORY_RE
            .as_ref()
            .is_some_and(|re| re.is_match(&repository));
        if !valid {
            return Err(AppError::validation(format!(
                "repository must look like 'owner/name', got '{repository}'"
            )));
        }
        if run_id == 0 {
            return Err(AppError::validation("run id must be positive"));
        }
        Ok(Self {
            repository,
            run_id,
        })
    }

    /// Split into `(owner, name)`.
    pub fn owner_and_name(&self) -> (&str, &str) {
        self.repository
            .split_once('/')
            .unwrap_or((self.repository.as_str(), ""))
    }

    /// Fill `{repo}` and `{run_id}` placeholders.
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{repo}", &self.repository)
            .replace("{run_id}", &self.run_id.to_string())
    }
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repository, self.run_id)
    }
}

/// Credentials for the three external services, plus the recipient.
#[derive(Clone)]
pub struct Credentials {
    pub github_token: String,
    pub gemini_key: String,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub recipient: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &"<redacted>")
            .field("gemini_key", &"<redacted>")
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_target() {
        let target = RunTarget::new("octo/widgets", 42).unwrap();
        assert_eq!(target.owner_and_name(), ("octo", "widgets"));
        assert_eq!(target.to_string(), "octo/widgets#42");
    }

    #[test]
    fn test_invalid_target() {
        assert!(RunTarget::new("widgets", 42).is_err());
        assert!(RunTarget::new("octo/widgets/extra", 42).is_err());
        assert!(RunTarget::new("octo/widgets", 0).is_err());
    }

    #[test]
    fn test_format_subject() {
        let target = RunTarget::new("octo/widgets", 7).unwrap();
        assert_eq!(
            target.format("Failure in {repo} (Run #{run_id})"),
            "Failure in octo/widgets (Run #7)"
        );
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials {
            github_token: "ghp_secret".into(),
            gemini_key: "gem_secret".into(),
            smtp_user: "bot@example.com".into(),
            smtp_pass: "hunter2".into(),
            recipient: "oncall@example.com".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("gem_secret"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("oncall@example.com"));
    }
}
