//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Log download settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Evidence extraction rules
    #[serde(default)]
    pub scan: ScanConfig,

    /// Analysis engine settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Notification delivery settings
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.github.user_agent.trim().is_empty() {
            return Err(AppError::validation("github.user_agent is empty"));
        }
        if self.github.timeout_secs == Some(0) {
            return Err(AppError::validation("github.timeout_secs must be > 0"));
        }
        if self.analysis.timeout_secs == Some(0) {
            return Err(AppError::validation("analysis.timeout_secs must be > 0"));
        }
        if self.analysis.model.trim().is_empty() {
            return Err(AppError::validation("analysis.model is empty"));
        }
        if self.scan.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::validation("No scan keywords defined"));
        }
        if self.scan.max_excerpts_per_member == 0 {
            return Err(AppError::validation(
                "scan.max_excerpts_per_member must be > 0",
            ));
        }
        if self.scan.context_after == 0 {
            return Err(AppError::validation("scan.context_after must be > 0"));
        }
        if self.scan.log_suffix.is_empty() {
            return Err(AppError::validation("scan.log_suffix is empty"));
        }
        if self.notification.smtp_host.trim().is_empty() {
            return Err(AppError::validation("notification.smtp_host is empty"));
        }
        Ok(())
    }
}

/// GitHub API settings for downloading run logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// User-Agent header (required by the GitHub API)
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Optional request deadline in seconds; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            user_agent: defaults::user_agent(),
            timeout_secs: None,
        }
    }
}

/// Keyword/noise rules and excerpt window sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Substrings that mark a line as failure evidence (case-insensitive)
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,

    /// Substrings that veto an otherwise matching line (case-insensitive)
    #[serde(default = "defaults::noise_patterns")]
    pub noise_patterns: Vec<String>,

    /// Lines of context kept before a match
    #[serde(default = "defaults::context_before")]
    pub context_before: usize,

    /// Lines kept from the match onward, the match included
    #[serde(default = "defaults::context_after")]
    pub context_after: usize,

    /// Excerpt cap per archive member
    #[serde(default = "defaults::max_excerpts_per_member")]
    pub max_excerpts_per_member: usize,

    /// Only members ending with this suffix are scanned
    #[serde(default = "defaults::log_suffix")]
    pub log_suffix: String,

    /// Members whose name contains this marker are infrastructure logs
    #[serde(default = "defaults::meta_marker")]
    pub meta_marker: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
            noise_patterns: defaults::noise_patterns(),
            context_before: defaults::context_before(),
            context_after: defaults::context_after(),
            max_excerpts_per_member: defaults::max_excerpts_per_member(),
            log_suffix: defaults::log_suffix(),
            meta_marker: defaults::meta_marker(),
        }
    }
}

impl ScanConfig {
    /// Whether an archive member should be scanned at all.
    pub fn is_eligible(&self, name: &str) -> bool {
        name.ends_with(&self.log_suffix)
            && (self.meta_marker.is_empty() || !name.contains(&self.meta_marker))
    }
}

/// Analysis engine (Gemini REST) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// API base URL
    #[serde(default = "defaults::analysis_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "defaults::model")]
    pub model: String,

    /// Optional request deadline in seconds; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::analysis_endpoint(),
            model: defaults::model(),
            timeout_secs: None,
        }
    }
}

/// SMTP notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Subject line; supports `{repo}` and `{run_id}`
    #[serde(default = "defaults::subject_template")]
    pub subject_template: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            smtp_port: defaults::smtp_port(),
            subject_template: defaults::subject_template(),
        }
    }
}

mod defaults {
    // GitHub defaults
    pub fn api_base() -> String {
        "https://api.github.com".into()
    }
    pub fn user_agent() -> String {
        concat!("arca/", env!("CARGO_PKG_VERSION")).into()
    }

    // Scan defaults
    pub fn keywords() -> Vec<String> {
        [
            "ERROR",
            "FAIL",
            "REFUSED",
            "UNABLE",
            "TIMEOUT",
            "EXCEPTION",
            "EXIT CODE",
            "UNABLE TO CONNECT",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn noise_patterns() -> Vec<String> {
        vec!["HEAD IS NOW AT".into(), "CHECKOUT".into()]
    }
    pub fn context_before() -> usize {
        5
    }
    pub fn context_after() -> usize {
        10
    }
    pub fn max_excerpts_per_member() -> usize {
        5
    }
    pub fn log_suffix() -> String {
        ".txt".into()
    }
    pub fn meta_marker() -> String {
        "system".into()
    }

    // Analysis defaults
    pub fn analysis_endpoint() -> String {
        "https://generativelanguage.googleapis.com/v1beta".into()
    }
    pub fn model() -> String {
        "gemini-flash-latest".into()
    }

    // Notification defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn subject_template() -> String {
        "ARCA Analysis: Failure in {repo} (Run #{run_id})".into()
    }
}
