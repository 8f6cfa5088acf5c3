// src/services/github.rs

//! Run-log download from the GitHub Actions REST API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{GithubConfig, RunTarget};
use crate::utils::http::create_async_client;

/// Source of raw log archives for a run.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Download the run's log archive. Single attempt, no retry.
    async fn fetch(&self, target: &RunTarget) -> Result<Vec<u8>>;
}

/// Downloads `GET /repos/{owner}/{repo}/actions/runs/{id}/logs`.
pub struct GithubLogSource {
    client: Client,
    api_base: Url,
    token: String,
}

impl GithubLogSource {
    pub fn new(config: &GithubConfig, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.user_agent, config.timeout_secs)?,
            api_base: Url::parse(&config.api_base)?,
            token: token.into(),
        })
    }

    /// Build the logs endpoint for a run.
    pub fn logs_url(&self, target: &RunTarget) -> Result<Url> {
        let (owner, name) = target.owner_and_name();
        let run_id = target.run_id.to_string();
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config("github.api_base cannot be a base URL"))?
            .pop_if_empty()
            .extend([
                "repos",
                owner,
                name,
                "actions",
                "runs",
                run_id.as_str(),
                "logs",
            ]);
        Ok(url)
    }
}

#[async_trait]
impl LogSource for GithubLogSource {
    async fn fetch(&self, target: &RunTarget) -> Result<Vec<u8>> {
        let url = self.logs_url(target)?;
        log::info!("Connecting to GitHub API for {target}...");

        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Fetch {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        log::info!("Downloaded log archive ({} bytes)", bytes.len());
        Ok(bytes.to_vec())
    }
}
