//! Session-scoped state.
//!
//! All mutable state for one interactive session lives in an explicit
//! [`SessionStore`] passed by reference to the components that need it.
//! Nothing here persists beyond the process: a new session gets a fresh
//! sender id and an empty history.

use crate::types::{ConnectionStatus, Message, SenderId};

/// In-memory holder for one session's chat history, sender identifier, and
/// connection status.
#[derive(Debug, Default)]
pub struct SessionStore {
    sender_id: Option<SenderId>,
    messages: Vec<Message>,
    status: ConnectionStatus,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session's sender id, generating it on first call.
    ///
    /// Idempotent: every subsequent call returns the same id. Regenerating
    /// it mid-session would fragment the backend conversation.
    pub fn get_or_create_sender_id(&mut self) -> &SenderId {
        self.sender_id.get_or_insert_with(SenderId::generate)
    }

    /// The sender id, if one has been generated yet.
    pub fn sender_id(&self) -> Option<&SenderId> {
        self.sender_id.as_ref()
    }

    /// Appends one turn to the history. History is append-only; past
    /// entries are never reordered or mutated.
    pub fn append_message(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    /// Empties the chat history. The sender id and connection status are
    /// left untouched.
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }

    /// Read-only view of the history, in insertion order.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// Number of turns recorded so far.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The outcome of the most recent request.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Records the outcome of a request.
    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }
}
