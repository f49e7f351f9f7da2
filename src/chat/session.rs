//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the API client
//! and the session state store, and implements the request/response cycle:
//! append the user's turn, perform the request with retry, append the reply
//! or the configured error entry, update the connection status.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};

use crate::chat::config::ChatConfig;
use crate::client::ApiClient;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::store::SessionStore;
use crate::types::{ConnectionStatus, Message, SenderId};

/// A chat session against one endpoint.
///
/// The session holds all state for one interactive run: the client, the
/// store (history, sender id, status), and the resolved configuration.
/// `&mut self` on the send path guarantees at most one request in flight.
pub struct ChatSession {
    client: Option<ApiClient>,
    store: SessionStore,
    config: ChatConfig,
    request_count: u64,
    failure_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The session's sender id, if one has been generated yet.
    pub sender_id: Option<SenderId>,
    /// The number of turns in the history.
    pub message_count: usize,
    /// The outcome of the most recent request.
    pub status: ConnectionStatus,
    /// The configured endpoint, if any.
    pub base_url: Option<String>,
    /// Whether customer context is attached to requests.
    pub customer_info_set: bool,
    /// The message surfaced when a request fails.
    pub error_message: String,
    /// Total attempts per request.
    pub retry_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay: std::time::Duration,
    /// The auto-save transcript path, if set.
    pub transcript_path: Option<PathBuf>,
    /// Total messages submitted to the endpoint.
    pub total_requests: u64,
    /// Submissions that exhausted their retries.
    pub total_failures: u64,
}

impl ChatSession {
    /// Creates a new chat session from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a base URL is configured but invalid.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = match config.api_config() {
            Some(api) => Some(ApiClient::new(api)?),
            None => None,
        };
        Ok(Self {
            client,
            store: SessionStore::new(),
            config,
            request_count: 0,
            failure_count: 0,
        })
    }

    /// Sends a user message and records the outcome.
    ///
    /// This method:
    /// 1. Appends the user's turn to the history
    /// 2. Performs the request, retrying per the configured policy
    /// 3. Appends the reply, or the configured error message on exhaustion
    /// 4. Updates the connection status
    ///
    /// Request failures never escape: they are collapsed into an
    /// error-role transcript entry, and the session stays usable.
    pub async fn send_message(&mut self, input: &str, renderer: &mut dyn Renderer) {
        let Some(client) = self.client.clone() else {
            renderer.print_error("No endpoint configured. Set one with /url <base-url>.");
            return;
        };

        self.store.append_message(Message::user(input));
        let sender_id = self.store.get_or_create_sender_id().clone();
        self.request_count += 1;

        let outcome = client
            .send(input, sender_id.as_str(), self.config.customer_info.as_ref())
            .await;

        match outcome {
            Ok(result) => {
                let reply = Message::bot(result);
                renderer.render_message(&reply);
                self.store.append_message(reply);
                self.store.set_status(ConnectionStatus::Connected);
            }
            Err(_) => {
                self.failure_count += 1;
                let entry = Message::error(self.config.error_message.clone());
                renderer.render_message(&entry);
                self.store.append_message(entry);
                self.store.set_status(ConnectionStatus::Error);
            }
        }
        renderer.finish_response();

        if let Err(err) = self.auto_save_transcript() {
            renderer.print_error(&format!("Failed to auto-save transcript: {err}"));
        }
    }

    /// Probes the endpoint and refreshes the connection status.
    pub async fn test_connection(&mut self) -> bool {
        let Some(client) = self.client.clone() else {
            return false;
        };
        let reachable = client.test_connection().await;
        self.store.set_status(if reachable {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Error
        });
        reachable
    }

    /// The configured endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    /// Reconfigures the endpoint base URL.
    ///
    /// The session's sender id and history survive reconfiguration; the
    /// connection status resets to unknown until the next request.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the previous endpoint in place if the
    /// URL does not parse.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        let previous = self.config.base_url.replace(base_url.into());
        if let Err(err) = self.rebuild_client() {
            self.config.base_url = previous;
            self.rebuild_client()?;
            return Err(err);
        }
        self.store.set_status(ConnectionStatus::Unknown);
        Ok(())
    }

    /// Sets or clears the customer context.
    pub fn set_customer_info(&mut self, customer_info: Option<serde_json::Value>) {
        self.config.customer_info = customer_info;
        self.sync_client();
    }

    /// Returns the customer context, if set.
    pub fn customer_info(&self) -> Option<&serde_json::Value> {
        self.config.customer_info.as_ref()
    }

    /// Changes the message surfaced when a request fails.
    pub fn set_error_message(&mut self, error_message: impl Into<String>) {
        self.config.error_message = error_message.into();
        self.sync_client();
    }

    /// Sets the total attempts per request.
    pub fn set_retry_attempts(&mut self, retry_attempts: u32) {
        self.config.retry_attempts = retry_attempts;
        self.sync_client();
    }

    /// Sets the delay between attempts.
    pub fn set_retry_delay(&mut self, retry_delay: std::time::Duration) {
        self.config.retry_delay = retry_delay;
        self.sync_client();
    }

    /// Returns the session's sender id, generating it on first use.
    pub fn sender_id(&mut self) -> &SenderId {
        self.store.get_or_create_sender_id()
    }

    /// Read-only view of the chat history.
    pub fn history(&self) -> &[Message] {
        self.store.history()
    }

    /// The outcome of the most recent request.
    pub fn status(&self) -> ConnectionStatus {
        self.store.status()
    }

    /// Clears the chat history. The sender id is untouched.
    pub fn clear(&mut self) {
        self.store.clear_history();
    }

    /// Returns the number of turns in the history.
    pub fn message_count(&self) -> usize {
        self.store.message_count()
    }

    /// Sets the auto-save transcript path.
    pub fn set_transcript_path(&mut self, path: Option<PathBuf>) {
        self.config.transcript_path = path;
    }

    /// Returns the configured transcript path, if any.
    pub fn transcript_path(&self) -> Option<&Path> {
        self.config.transcript_path.as_deref()
    }

    /// Saves the transcript to the specified path.
    pub fn save_transcript_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let transcript = TranscriptFile::new(self.store.history());
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }

    /// Loads a transcript from disk, replacing the current chat history.
    /// The sender id is untouched: the loaded turns continue this
    /// session's conversation.
    pub fn load_transcript_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open transcript file", err))?;
        let reader = BufReader::new(file);
        let transcript: TranscriptFile = from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse transcript", Some(Box::new(err)))
        })?;
        self.store.clear_history();
        for message in transcript.messages {
            self.store.append_message(message);
        }
        Ok(())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            sender_id: self.store.sender_id().cloned(),
            message_count: self.store.message_count(),
            status: self.store.status(),
            base_url: self.config.base_url.clone(),
            customer_info_set: self.config.customer_info.is_some(),
            error_message: self.config.error_message.clone(),
            retry_attempts: self.config.retry_attempts,
            retry_delay: self.config.retry_delay,
            transcript_path: self.config.transcript_path.clone(),
            total_requests: self.request_count,
            total_failures: self.failure_count,
        }
    }

    fn sync_client(&mut self) {
        // The base URL was already validated, so rebuilding cannot fail
        // here; if it somehow does, the previous client stays in place.
        let _ = self.rebuild_client();
    }

    fn rebuild_client(&mut self) -> Result<()> {
        self.client = match self.config.api_config() {
            Some(api) => Some(ApiClient::new(api)?),
            None => None,
        };
        Ok(())
    }

    fn auto_save_transcript(&self) -> Result<()> {
        if let Some(path) = &self.config.transcript_path {
            self.save_transcript_to(path)
        } else {
            Ok(())
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    messages: Vec<Message>,
}

impl TranscriptFile {
    fn new(messages: &[Message]) -> Self {
        Self {
            version: 1,
            messages: messages.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::types::MessageRole;

    /// Renderer that records everything it is asked to print.
    #[derive(Default)]
    struct CapturingRenderer {
        rendered: Vec<(MessageRole, String)>,
        errors: Vec<String>,
        infos: Vec<String>,
    }

    impl Renderer for CapturingRenderer {
        fn render_message(&mut self, message: &Message) {
            self.rendered.push((message.role, message.text.clone()));
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, info: &str) {
            self.infos.push(info.to_string());
        }

        fn print_status(&mut self, _status: ConnectionStatus) {}

        fn finish_response(&mut self) {}
    }

    fn session_for(url: &str) -> ChatSession {
        let config = ChatConfig::new()
            .with_base_url(url)
            .with_retry_delay(Duration::ZERO);
        ChatSession::new(config).unwrap()
    }

    #[test]
    fn new_session_empty() {
        let session = ChatSession::new(ChatConfig::new()).unwrap();
        assert_eq!(session.message_count(), 0);
        assert_eq!(session.status(), ConnectionStatus::Unknown);
        assert!(session.endpoint().is_none());
    }

    #[test]
    fn sender_id_survives_clear_and_reconfiguration() {
        let mut session = session_for("http://localhost:5005");
        let id = session.sender_id().clone();

        session.clear();
        session.set_base_url("http://localhost:6006").unwrap();
        assert_eq!(session.sender_id(), &id);
    }

    #[test]
    fn set_base_url_rejects_garbage_and_keeps_previous() {
        let mut session = session_for("http://localhost:5005");
        let err = session.set_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
        assert_eq!(session.endpoint(), Some("http://localhost:5005"));
    }

    #[test]
    fn set_base_url_resets_status() {
        let mut session = session_for("http://localhost:5005");
        session.store.set_status(ConnectionStatus::Connected);
        session.set_base_url("http://localhost:6006").unwrap();
        assert_eq!(session.status(), ConnectionStatus::Unknown);
    }

    #[tokio::test]
    async fn send_without_endpoint_reports_error() {
        let mut session = ChatSession::new(ChatConfig::new()).unwrap();
        let mut renderer = CapturingRenderer::default();

        session.send_message("hello", &mut renderer).await;

        assert_eq!(session.message_count(), 0);
        assert_eq!(renderer.errors.len(), 1);
        assert!(renderer.errors[0].contains("/url"));
    }

    #[tokio::test]
    async fn send_appends_user_and_bot_turns() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/response")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "Hello".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":"Hi there!"}"#)
            .create_async()
            .await;

        let mut session = session_for(&server.url());
        let mut renderer = CapturingRenderer::default();

        session.send_message("Hello", &mut renderer).await;

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].text, "Hello");
        assert_eq!(history[1].role, MessageRole::Bot);
        assert_eq!(history[1].text, "Hi there!");
        assert_eq!(session.status(), ConnectionStatus::Connected);
        assert_eq!(
            renderer.rendered,
            vec![(MessageRole::Bot, "Hi there!".to_string())]
        );
    }

    #[tokio::test]
    async fn exhausted_retries_surface_the_configured_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/response")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let mut session = session_for(&server.url());
        let mut renderer = CapturingRenderer::default();

        session.send_message("Hello", &mut renderer).await;

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, MessageRole::Error);
        assert_eq!(
            history[1].text,
            crate::types::DEFAULT_ERROR_MESSAGE
        );
        assert_eq!(session.status(), ConnectionStatus::Error);
        assert_eq!(session.stats().total_failures, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failure_does_not_end_the_session() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server
            .mock("GET", "/response")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "first".into()))
            .with_status(502)
            .expect(3)
            .create_async()
            .await;
        let _good = server
            .mock("GET", "/response")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "second".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":"recovered"}"#)
            .create_async()
            .await;

        let mut session = session_for(&server.url());
        let mut renderer = CapturingRenderer::default();

        session.send_message("first", &mut renderer).await;
        assert_eq!(session.status(), ConnectionStatus::Error);

        session.send_message("second", &mut renderer).await;
        assert_eq!(session.status(), ConnectionStatus::Connected);
        assert_eq!(session.history().len(), 4);
        assert_eq!(session.history()[3].text, "recovered");
    }

    #[tokio::test]
    async fn probe_updates_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/test")
            .with_status(200)
            .create_async()
            .await;

        let mut session = session_for(&server.url());
        assert!(session.test_connection().await);
        assert_eq!(session.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn transcript_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");

        let mut session = session_for("http://localhost:5005");
        session.store.append_message(Message::user("Hello"));
        session.store.append_message(Message::bot("Hi there!"));
        session.save_transcript_to(&path).unwrap();

        let mut restored = session_for("http://localhost:5005");
        restored.load_transcript_from(&path).unwrap();
        assert_eq!(restored.history(), session.history());
    }

    #[test]
    fn load_transcript_keeps_sender_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.json");

        let mut session = session_for("http://localhost:5005");
        session.store.append_message(Message::user("Hello"));
        session.save_transcript_to(&path).unwrap();

        let id = session.sender_id().clone();
        session.load_transcript_from(&path).unwrap();
        assert_eq!(session.sender_id(), &id);
    }

    #[test]
    fn stats_snapshot() {
        let mut session = session_for("http://localhost:5005");
        session.set_retry_attempts(5);
        session.set_retry_delay(Duration::from_millis(250));
        session.set_customer_info(Some(serde_json::json!({"tier": "dev"})));

        let stats = session.stats();
        assert_eq!(stats.base_url.as_deref(), Some("http://localhost:5005"));
        assert_eq!(stats.retry_attempts, 5);
        assert_eq!(stats.retry_delay, Duration::from_millis(250));
        assert!(stats.customer_info_set);
        assert_eq!(stats.total_requests, 0);
        assert!(stats.sender_id.is_none());
    }
}
