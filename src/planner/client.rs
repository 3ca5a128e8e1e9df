use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{DepartureResult, DepartureSearchRequest, RouteSchedule, Stop};
use crate::config::PlannerConfig;

const RETRY_DELAY_MILLIS: u64 = 500;

/// Client for the remote planner API
#[derive(Debug, Clone)]
pub struct PlannerClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl PlannerClient {
    pub fn new(config: &PlannerConfig) -> Result<Self, PlannerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(5)))
            .build()
            .map_err(|e| PlannerError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.max(1),
        })
    }

    pub async fn stops(&self) -> Result<Vec<Stop>, PlannerError> {
        self.fetch(self.client.get(self.url("/api/stops"))).await
    }

    pub async fn search(
        &self,
        request: &DepartureSearchRequest,
    ) -> Result<Vec<DepartureResult>, PlannerError> {
        debug!(
            from = %request.from_stop,
            to = %request.to_stop,
            date = %request.travel_date,
            time = %request.travel_time,
            "Searching departures"
        );
        self.fetch(
            self.client
                .post(self.url("/api/departures/search"))
                .json(request),
        )
        .await
    }

    pub async fn full_schedule(&self) -> Result<Vec<RouteSchedule>, PlannerError> {
        self.fetch(self.client.get(self.url("/api/departures/full-schedule")))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, PlannerError> {
        let text = self.execute_with_retry(request).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse planner response"
            );
            PlannerError::ParseError(e.to_string())
        })
    }

    /// Send with retries for transient failures (network, 429, 5xx)
    async fn execute_with_retry(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<String, PlannerError> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                let delay = RETRY_DELAY_MILLIS * 2_u64.pow(attempt - 1);
                warn!(attempt, delay_ms = delay, "Retrying planner request...");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let Some(attempt_request) = request.try_clone() else {
                return Err(PlannerError::NetworkError(
                    "Request body cannot be retried".to_string(),
                ));
            };

            match execute_request(attempt_request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e, "Transient planner error, will retry");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| PlannerError::NetworkError("Max retries exceeded".to_string())))
    }
}

async fn execute_request(request: reqwest::RequestBuilder) -> Result<String, PlannerError> {
    let response = request
        .send()
        .await
        .map_err(|e| PlannerError::NetworkError(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| PlannerError::NetworkError(e.to_string()))?;

    if !status.is_success() {
        tracing::error!(status = %status, body_preview = %text.chars().take(200).collect::<String>(), "Planner API error");

        if status.as_u16() == 429 || status.is_server_error() {
            return Err(PlannerError::RetryableError(format!("HTTP {}", status)));
        }

        return Err(PlannerError::StatusError(status.as_u16()));
    }

    Ok(text)
}

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Retryable error: {0}")]
    RetryableError(String),
    #[error("Planner answered HTTP {0}")]
    StatusError(u16),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl PlannerError {
    /// Check if this error is transient and should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::NetworkError(_) | PlannerError::RetryableError(_)
        )
    }
}
