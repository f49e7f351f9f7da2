use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the most recent request against the endpoint.
///
/// This is derived state: it reflects the last attempt only and is never
/// persisted across sessions.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No request has been made yet.
    #[default]
    Unknown,

    /// The most recent request succeeded.
    Connected,

    /// The most recent request exhausted its retries.
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Unknown => write!(f, "unknown"),
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Error => write!(f, "disconnected"),
        }
    }
}
