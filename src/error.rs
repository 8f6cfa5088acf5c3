// src/error.rs

//! Unified error handling for the analysis pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Log download answered with a non-success status
    #[error("Fetch failed with HTTP status {status}")]
    Fetch { status: u16 },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The log archive could not be opened
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),

    /// One archive member is not valid UTF-8
    #[error("Failed to decode member '{member}': {source}")]
    Decode {
        member: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// One archive member could not be decompressed
    #[error("Failed to read member '{member}': {message}")]
    MemberRead { member: String, message: String },

    /// The analysis engine refused the request because of quota limits
    #[error("Analysis rate limited: {0}")]
    RateLimited(String),

    /// Any other analysis engine failure
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Notification delivery was rejected
    #[error("Notification error: {0}")]
    Notification(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a corrupt-archive error.
    pub fn corrupt(message: impl fmt::Display) -> Self {
        Self::CorruptArchive(message.to_string())
    }

    /// Create a member read error.
    pub fn member_read(member: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::MemberRead {
            member: member.into(),
            message: message.to_string(),
        }
    }

    /// Create a generic analysis error.
    pub fn analysis(message: impl fmt::Display) -> Self {
        Self::Analysis(message.to_string())
    }

    /// Create a rate-limit error.
    pub fn rate_limited(message: impl fmt::Display) -> Self {
        Self::RateLimited(message.to_string())
    }

    /// Create a notification error.
    pub fn notification(message: impl fmt::Display) -> Self {
        Self::Notification(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error only affects a single archive member.
    ///
    /// Member-level errors are skipped by the aggregator; everything else
    /// ends the run.
    pub fn is_member_level(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::MemberRead { .. })
    }
}
