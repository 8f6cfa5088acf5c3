// src/services/analysis.rs

//! Analysis engine client and prompt construction.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AnalysisConfig, AnalysisStatus, EvidenceSet};
use crate::utils::http::create_async_client;

const PREAMBLE: &str = "\
You are a Senior DevOps Engineer.
Analyze the following build error logs from a GitHub Action.

IMPORTANT RULES:
1. PRIORITIZE \"Hard Failures\" (Connection errors, Dial TCP, Connection Refused, Process Crashes).
2. IGNORE \"Soft Warnings\" like Checkstyle, Linter, or Formatting errors IF a hard failure is present.
3. Identify the ACTUAL ROOT CAUSE that stopped the pipeline and provide a clear one-sentence fix.
   Name one root cause and one fix; do not list every error.

Error logs:
";

const USER_AGENT: &str = concat!("arca/", env!("CARGO_PKG_VERSION"));

/// Shown to the human instead of a raw quota error.
pub const RATE_LIMIT_GUIDANCE: &str = "AI Quota Error: the analysis engine rejected the request \
because the request quota is exhausted. Please wait a minute and re-run the analysis, \
or check the billing and quota settings of the analysis API key.";

/// Opaque text-in/text-out analysis capability.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Returns the diagnosis, `AppError::RateLimited`, or `AppError::Analysis`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the full prompt for an evidence set.
pub fn build_prompt(evidence: &EvidenceSet) -> String {
    format!("{PREAMBLE}{}", evidence.render())
}

/// Text handed to the notifier for one analysis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub status: AnalysisStatus,
    pub text: String,
}

impl AnalysisResult {
    /// Turn an engine response into notifiable text.
    ///
    /// Rate limits become guidance; other failures are surfaced as-is.
    pub fn from_response(response: Result<String>) -> Self {
        match response {
            Ok(text) => Self {
                status: AnalysisStatus::Diagnosed,
                text,
            },
            Err(AppError::RateLimited(detail)) => {
                log::warn!("Analysis rate limited: {detail}");
                Self {
                    status: AnalysisStatus::RateLimited,
                    text: RATE_LIMIT_GUIDANCE.to_string(),
                }
            }
            Err(e) => {
                log::error!("Analysis failed: {e}");
                Self {
                    status: AnalysisStatus::Failed,
                    text: format!("Error connecting to analysis engine: {e}"),
                }
            }
        }
    }
}

/// Whether an error message carries a rate-limit indicator.
pub fn is_rate_limit_message(message: &str) -> bool {
    message.contains("429") || message.contains("RESOURCE_EXHAUSTED")
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Classify a non-success response from the engine.
fn classify_error(status: StatusCode, body: &str) -> AppError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    let exhausted = envelope
        .as_ref()
        .is_some_and(|e| e.error.status == "RESOURCE_EXHAUSTED");
    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        return AppError::rate_limited(format!("{status}: {message}"));
    }
    AppError::analysis(format!("{status}: {message}"))
}

/// Gemini `generateContent` REST client.
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AnalysisConfig, api_key: impl Into<String>) -> Result<Self> {
        let base = config.endpoint.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}/models/{}:generateContent", config.model))?;
        Ok(Self {
            client: create_async_client(USER_AGENT, config.timeout_secs)?,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisEngine for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if is_rate_limit_message(&message) {
                    AppError::rate_limited(message)
                } else {
                    AppError::analysis(message)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::analysis)?;
        if !status.is_success() {
            return Err(classify_error(status, &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::analysis(format!("unexpected response: {e}")))?;
        parsed
            .text()
            .ok_or_else(|| AppError::analysis("response contained no text"))
    }
}
