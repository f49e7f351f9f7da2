//! Configuration types for the chat client.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling the session.

use std::env;
use std::error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::types::{
    ApiConfig, DEFAULT_ERROR_MESSAGE, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
};

/// Environment variable consulted for the endpoint when `--url` is absent.
const URL_ENV_VAR: &str = "DEVCHAT_API_URL";

/// Command-line arguments for the devchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat endpoint.
    #[arrrg(optional, "Base URL of the chat endpoint (default: $DEVCHAT_API_URL)", "URL")]
    pub url: Option<String>,

    /// Customer context sent with every request.
    #[arrrg(optional, "Customer context sent with every request, as JSON", "JSON")]
    pub customer_info: Option<String>,

    /// Message shown in place of a reply when a request fails.
    #[arrrg(optional, "Message shown when a request exhausts its retries", "TEXT")]
    pub error_message: Option<String>,

    /// Total attempts per request.
    #[arrrg(optional, "Total attempts per request (default: 3)", "N")]
    pub retries: Option<u32>,

    /// Delay between attempts, in whole seconds.
    #[arrrg(optional, "Delay between attempts in seconds (default: 1)", "SECONDS")]
    pub retry_delay: Option<u64>,

    /// Auto-save the transcript after each turn.
    #[arrrg(optional, "Auto-save the transcript to this file after each turn", "FILE")]
    pub transcript: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Error produced when command-line arguments cannot be resolved into a
/// configuration.
#[derive(Debug)]
pub enum ChatArgsError {
    /// `--customer-info` was not valid JSON.
    InvalidCustomerInfo(serde_json::Error),
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatArgsError::InvalidCustomerInfo(err) => {
                write!(f, "--customer-info is not valid JSON: {err}")
            }
        }
    }
}

impl error::Error for ChatArgsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ChatArgsError::InvalidCustomerInfo(err) => Some(err),
        }
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Base URL of the endpoint. `None` until the user configures one.
    pub base_url: Option<String>,

    /// Customer context serialized onto every request, when present.
    pub customer_info: Option<serde_json::Value>,

    /// The message surfaced in place of a reply when retries are exhausted.
    pub error_message: String,

    /// Total attempts per request.
    pub retry_attempts: u32,

    /// Fixed delay between attempts.
    pub retry_delay: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Path to persist transcripts automatically after each turn.
    pub transcript_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Endpoint: unset
    /// - Error message: the stock API failure text
    /// - Retries: 3 attempts, 1 second apart
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            customer_info: None,
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            use_color: true,
            transcript_path: None,
        }
    }

    /// Sets the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
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

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the transcript auto-save path.
    pub fn with_transcript_path(mut self, path: Option<PathBuf>) -> Self {
        self.transcript_path = path;
        self
    }

    /// The API client configuration for the current endpoint, or `None`
    /// when no endpoint is configured yet.
    pub fn api_config(&self) -> Option<ApiConfig> {
        self.base_url.as_ref().map(|base_url| {
            ApiConfig::new(base_url.clone())
                .with_customer_info(self.customer_info.clone())
                .with_error_message(self.error_message.clone())
                .with_retry_attempts(self.retry_attempts)
                .with_retry_delay(self.retry_delay)
        })
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = ChatArgsError;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        let base_url = args
            .url
            .or_else(|| env::var(URL_ENV_VAR).ok())
            .filter(|url| !url.trim().is_empty());

        let customer_info = args
            .customer_info
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(ChatArgsError::InvalidCustomerInfo)?;

        Ok(ChatConfig {
            base_url,
            customer_info,
            error_message: args
                .error_message
                .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
            retry_attempts: args.retries.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            retry_delay: args
                .retry_delay
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_DELAY),
            use_color: !args.no_color,
            transcript_path: args.transcript.map(PathBuf::from),
        })
    }
}
