use reqwest::Client;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every request builds its own conversation.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shared connection pool for completion calls; carries the request timeout.
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.completion_timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Completion client for one request. The API key is read from the
    /// environment on each call; fails before any network call when it is unset.
    pub fn llm_client(&self) -> Result<LlmClient, AppError> {
        let api_key = self.config.api_key().ok_or(AppError::Config)?;
        Ok(LlmClient::new(
            self.http.clone(),
            &self.config.completion_api_url,
            api_key,
        ))
    }
}
