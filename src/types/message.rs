use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::time as time_utils;

/// One chat turn: who said it, what was said, and when.
///
/// Messages are immutable once created and are only ever appended to the
/// session history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// The role of the sender.
    pub role: MessageRole,

    /// The text of the turn.
    pub text: String,

    /// When the turn was recorded.
    #[serde(with = "time_utils")]
    pub timestamp: OffsetDateTime,
}

/// Role type for a chat turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A turn typed by the user.
    User,

    /// A successful reply from the endpoint.
    Bot,

    /// A failure surfaced in place of a reply.
    Error,
}

impl Message {
    /// Create a new `Message` with the given role and text, stamped now.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Create a new user `Message`.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create a new bot `Message`.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Bot, text)
    }

    /// Create a new error `Message`.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Error, text)
    }

    /// The timestamp formatted for display, e.g. `2026-08-06 14:03:57`.
    pub fn display_timestamp(&self) -> String {
        time_utils::format_display(&self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serialization() {
        assert_eq!(serde_json::to_string(&MessageRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&MessageRole::Bot).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::to_string(&MessageRole::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn message_round_trip() {
        let msg = Message::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn constructors_assign_roles() {
        assert_eq!(Message::user("a").role, MessageRole::User);
        assert_eq!(Message::bot("b").role, MessageRole::Bot);
        assert_eq!(Message::error("c").role, MessageRole::Error);
    }

    #[test]
    fn display_timestamp_shape() {
        let msg = Message::bot("hi");
        let shown = msg.display_timestamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(shown.len(), 19);
        assert_eq!(&shown[4..5], "-");
        assert_eq!(&shown[10..11], " ");
        assert_eq!(&shown[13..14], ":");
    }
}
