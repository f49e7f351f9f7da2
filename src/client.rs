use std::time::{Duration, Instant};

use reqwest::Client as ReqwestClient;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUEST_RETRIES, CLIENT_REQUESTS,
    PROBE_FAILURES, PROBE_REQUESTS,
};
use crate::types::{ApiConfig, QueryResponse};

/// Timeout for `/response` requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the `/test` connection probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for a chat-style HTTP endpoint.
///
/// One `send` call maps to one user message: a GET against
/// `{base_url}/response` carrying the query text, the session's sender id,
/// and optional customer context. Failed requests are retried with a fixed
/// delay before the error surfaces.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: ReqwestClient,
    probe_client: ReqwestClient,
}

impl ApiClient {
    /// Create a new client for the configured endpoint.
    ///
    /// The base URL is validated up front so that a typo surfaces here
    /// rather than as a retried network failure on the first message.
    pub fn new(config: ApiConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)
            .map_err(|e| Error::url(format!("invalid base URL {:?}: {e}", config.base_url), Some(e)))?;

        let client = ReqwestClient::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::network(format!("Failed to build HTTP client: {e}"), Some(Box::new(e)))
            })?;
        let probe_client = ReqwestClient::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::network(format!("Failed to build HTTP client: {e}"), Some(Box::new(e)))
            })?;

        Ok(Self {
            config,
            client,
            probe_client,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send one query and return the endpoint's reply text.
    ///
    /// Issues `GET {base_url}/response?query=..&senderId=..` with
    /// `customer_info` appended as a JSON string when present. On failure
    /// the request is reattempted up to the configured attempt count,
    /// sleeping the configured delay between attempts; the last error is
    /// returned once the budget is exhausted.
    ///
    /// # Errors
    ///
    /// [`Error::Network`] when no HTTP response arrived, [`Error::Http`]
    /// for a non-2xx status, [`Error::MalformedResponse`] when the body is
    /// not JSON with a string `result` field.
    pub async fn send(
        &self,
        query: &str,
        sender_id: &str,
        customer_info: Option<&serde_json::Value>,
    ) -> Result<String> {
        let mut params = vec![
            ("query", query.to_string()),
            ("senderId", sender_id.to_string()),
        ];
        if let Some(info) = customer_info {
            params.push(("customer_info", serde_json::to_string(info)?));
        }

        let start = Instant::now();
        let result = with_retry(
            self.config.retry_attempts,
            self.config.retry_delay,
            || self.attempt_send(&params),
        )
        .await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        result
    }

    /// One attempt against `/response`.
    async fn attempt_send(&self, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}/response", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(
                status.as_u16(),
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            ));
        }

        response
            .json::<QueryResponse>()
            .await
            .map(|body| body.result)
            .map_err(|e| {
                Error::malformed_response(
                    format!("body is not JSON with a string `result` field: {e}"),
                    Some(Box::new(e)),
                )
            })
    }

    /// Probe `{base_url}/test` and report whether the endpoint is
    /// reachable. Uses the same retry budget as `send`, with a shorter
    /// per-attempt timeout.
    pub async fn test_connection(&self) -> bool {
        PROBE_REQUESTS.click();
        let url = format!("{}/test", self.config.base_url);
        let result = with_retry(
            self.config.retry_attempts,
            self.config.retry_delay,
            || async {
                let response = self
                    .probe_client
                    .get(&url)
                    .send()
                    .await
                    .map_err(map_request_error)?;
                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    Err(Error::http(
                        status.as_u16(),
                        status
                            .canonical_reason()
                            .unwrap_or("unexpected status")
                            .to_string(),
                    ))
                }
            },
        )
        .await;
        if result.is_err() {
            PROBE_FAILURES.click();
        }
        result.is_ok()
    }
}

/// Map a reqwest transport error into the crate taxonomy.
fn map_request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::network(format!("Request timed out: {e}"), Some(Box::new(e)))
    } else if e.is_connect() {
        Error::network(format!("Connection error: {e}"), Some(Box::new(e)))
    } else {
        Error::network(format!("Request failed: {e}"), Some(Box::new(e)))
    }
}

/// Run `operation` up to `attempts` times total, sleeping `delay` between
/// attempts. No backoff, no jitter. Non-retryable errors surface
/// immediately; otherwise the last error is returned after the final
/// attempt.
async fn with_retry<F, Fut, T>(attempts: u32, delay: Duration, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 1..=attempts {
        CLIENT_REQUESTS.click();
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if !err.is_retryable() {
                    return Err(err);
                }
                if attempt < attempts {
                    CLIENT_REQUEST_RETRIES.click();
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(err);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| Error::network("request failed before any attempt was made", None)))
}
