//! Chat application module for interactive sessions against the endpoint.
//!
//! This module provides the REPL chat interface built on top of the
//! devchat client library. It supports:
//!
//! - A sequential request/response loop with bounded retry
//! - A per-session sender id correlating all requests
//! - Slash commands for session control and reconfiguration
//! - ANSI-styled transcript and status output
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and endpoint interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatArgsError, ChatConfig};
pub use session::{ChatSession, SessionStats};
