use std::time::Duration;

/// Default message surfaced when a request exhausts its retries.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while communicating with the API";

/// Default total attempts per request.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default fixed delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the API client.
///
/// Set once per session; changed only through explicit reconfiguration
/// (slash commands in the REPL, or rebuilding the client).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the endpoint, without the `/response` suffix.
    pub base_url: String,

    /// Optional customer context, serialized as a JSON string on the wire.
    /// Validity is enforced where the value enters the configuration, so
    /// serialization at request time cannot fail.
    pub customer_info: Option<serde_json::Value>,

    /// The message shown in place of a reply when retries are exhausted.
    pub error_message: String,

    /// Total attempts per request (not additional retries).
    pub retry_attempts: u32,

    /// Fixed delay between attempts; no backoff, no jitter.
    pub retry_delay: Duration,
}

impl ApiConfig {
    /// Creates a configuration for the given base URL with default retry
    /// behavior. A trailing slash on the URL is tolerated and removed.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            customer_info: None,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Sets the customer context.
    pub fn with_customer_info(mut self, customer_info: Option<serde_json::Value>) -> Self {
        self.customer_info = customer_info;
        self
    }

    /// Sets the user-visible error message.
    pub fn with_error_message(mut self, error_message: impl Into<String>) -> Self {
        self.error_message = error_message.into();
        self
    }

    /// Sets the total attempts per request.
    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    /// Sets the delay between attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ApiConfig::new("http://localhost:5005");
        assert_eq!(config.base_url, "http://localhost:5005");
        assert!(config.customer_info.is_none());
        assert_eq!(config.error_message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn trailing_slash_removed() {
        let config = ApiConfig::new("http://localhost:5005/");
        assert_eq!(config.base_url, "http://localhost:5005");
    }

    #[test]
    fn builder_pattern() {
        let config = ApiConfig::new("http://localhost:5005")
            .with_customer_info(Some(serde_json::json!({"tier": "dev"})))
            .with_error_message("backend unreachable")
            .with_retry_attempts(5)
            .with_retry_delay(Duration::from_millis(250));

        assert_eq!(
            config.customer_info,
            Some(serde_json::json!({"tier": "dev"}))
        );
        assert_eq!(config.error_message, "backend unreachable");
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
    }
}
