//! Types for the devchat client.

mod api_config;
mod connection_status;
mod message;
mod query_response;
mod sender_id;

pub use api_config::{
    ApiConfig, DEFAULT_ERROR_MESSAGE, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
pub use connection_status::ConnectionStatus;
pub use message::{Message, MessageRole};
pub use query_response::QueryResponse;
pub use sender_id::SenderId;
