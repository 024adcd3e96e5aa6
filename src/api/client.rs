//! Matching service client implementation.
//!
//! This module provides the client for the `/devs` REST endpoints. It handles
//! the `user` identity header, error mapping and retry logic for reads.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{Decision, Dev, RegisterRequest};
use crate::config::Config;

/// Header carrying the session identity on every request.
pub const USER_HEADER: &str = "user";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for reads.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 500;

/// Client for the developer matching service.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct DevsClient {
    /// The HTTP client.
    client: Client,
    /// The base URL of the service, without a trailing slash.
    base_url: String,
}

impl DevsClient {
    /// Create a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = match config.settings.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        };
        info!(api_url = %config.server.api_url, "Creating matching service client");
        Self::new(&config.server.api_url, timeout)
    }

    /// Fetch the candidate queue for a user.
    ///
    /// Calls `GET /devs` with the `user` header. The order of the returned
    /// profiles is the backend's ranking order.
    #[instrument(skip(self))]
    pub async fn list_devs(&self, user: &str) -> Result<Vec<Dev>> {
        let url = format!("{}/devs", self.base_url);
        let devs: Vec<Dev> = self.get(&url, user).await?;
        debug!("Fetched {} candidates", devs.len());
        Ok(devs)
    }

    /// Record a like or dislike for a candidate.
    ///
    /// Calls `POST /devs/{candidate_id}/likes` or `/dislikes` with an empty
    /// body. The response body is not used.
    #[instrument(skip(self), fields(decision = %decision))]
    pub async fn decide(&self, user: &str, candidate_id: &str, decision: Decision) -> Result<()> {
        let url = format!(
            "{}/devs/{}/{}",
            self.base_url,
            urlencoding::encode(candidate_id),
            decision.path_segment()
        );

        let response = self
            .client
            .post(&url)
            .header(USER_HEADER, user)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Decision recorded");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_from_response(status, &url, &body))
        }
    }

    /// Record a positive decision.
    pub async fn like(&self, user: &str, candidate_id: &str) -> Result<()> {
        self.decide(user, candidate_id, Decision::Like).await
    }

    /// Record a negative decision.
    pub async fn dislike(&self, user: &str, candidate_id: &str) -> Result<()> {
        self.decide(user, candidate_id, Decision::Dislike).await
    }

    /// Sign in as a GitHub user.
    ///
    /// Calls `POST /devs` with `{ "username": ... }`. The backend creates the
    /// developer on first sign-in and returns the stored profile either way.
    #[instrument(skip(self))]
    pub async fn register(&self, username: &str) -> Result<Dev> {
        let url = format!("{}/devs", self.base_url);
        let body = RegisterRequest {
            username: username.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let dev: Dev = handle_response(response).await?;
        info!(dev_id = %dev.id, "Signed in");
        Ok(dev)
    }

    /// Perform a GET request with the identity header and retry logic.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str, user: &str) -> Result<T> {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.execute_get::<T>(url, user).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts < MAX_RETRIES => {
                    let delay = calculate_retry_delay(attempts);
                    warn!(
                        "Request failed (attempt {}), retrying in {}ms: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Execute a single GET request.
    async fn execute_get<T: serde::de::DeserializeOwned>(&self, url: &str, user: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(USER_HEADER, user)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        handle_response(response).await
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Check the status and parse the JSON body of a response.
async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let url = response.url().to_string();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    } else {
        let error_body = response.text().await.unwrap_or_default();
        debug!("Error response body: {}", error_body);
        Err(error_from_response(status, &url, &error_body))
    }
}

/// Create an appropriate error from an HTTP response.
///
/// The backend reports failures as `{ "error": "..." }` or `{ "message": "..." }`.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["error", "message"]
                .iter()
                .find_map(|&key| json.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });

    ApiError::from_status(status, message.as_deref().unwrap_or(url))
}

/// Calculate retry delay with exponential backoff.
fn calculate_retry_delay(attempt: u32) -> u64 {
    RETRY_DELAY_MS * 2u64.pow(attempt.saturating_sub(1))
}

/// Validate the base URL and remove trailing slashes.
fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ApiError::InvalidUrl(url.to_string()));
    }

    if url.starts_with("http://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}", url);
    }

    Ok(url.to_string())
}
