//! Slash command parsing for the chat client.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the session without sending messages to the
//! endpoint.

use std::time::Duration;

/// A parsed chat command.
///
/// These commands control the session and are not sent to the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the chat history.
    Clear,

    /// Reconfigure the endpoint base URL.
    Url(String),

    /// Set or clear the customer context.
    /// `None` clears the current context.
    CustomerInfo(Option<serde_json::Value>),

    /// Change the message shown when a request fails.
    ErrorMessage(String),

    /// Set the total attempts per request.
    Retries(u32),

    /// Set the delay between attempts.
    RetryDelay(Duration),

    /// Probe the endpoint and refresh the connection status.
    Test,

    /// Show the connection status.
    Status,

    /// Replay the chat history.
    History,

    /// Show the session's sender id.
    Sender,

    /// Set the auto-save transcript path.
    TranscriptPath(String),

    /// Clear the auto-save transcript path.
    ClearTranscriptPath,

    /// Save the transcript to a specific file immediately.
    SaveTranscript(String),

    /// Load chat history from a file.
    LoadTranscript(String),

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Display help information.
    Help,

    /// Exit the chat client.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use devchat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/url http://localhost:5005").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "url" => match argument {
            Some(url) => ChatCommand::Url(url.to_string()),
            None => ChatCommand::Invalid("/url requires a base URL".to_string()),
        },
        "customer" => match argument {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => ChatCommand::CustomerInfo(Some(value)),
                Err(err) => ChatCommand::Invalid(format!("/customer expects valid JSON: {err}")),
            },
            None => ChatCommand::CustomerInfo(None),
        },
        "error-message" => match argument {
            Some(text) => ChatCommand::ErrorMessage(text.to_string()),
            None => ChatCommand::Invalid("/error-message requires a message".to_string()),
        },
        "retries" => parse_u32_command(argument, ChatCommand::Retries, "/retries"),
        "delay" => match argument {
            Some(arg) => match parse_seconds(arg) {
                Ok(duration) => ChatCommand::RetryDelay(duration),
                Err(err) => ChatCommand::Invalid(format!("/delay {err}")),
            },
            None => ChatCommand::Invalid("/delay requires a value in seconds".to_string()),
        },
        "test" => ChatCommand::Test,
        "status" => ChatCommand::Status,
        "history" => ChatCommand::History,
        "sender" => ChatCommand::Sender,
        "transcript" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("clear") => ChatCommand::ClearTranscriptPath,
            Some(arg) => ChatCommand::TranscriptPath(arg.to_string()),
            None => ChatCommand::Invalid("/transcript requires a file path".to_string()),
        },
        "save" => match argument {
            Some(arg) => ChatCommand::SaveTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        "load" => match argument {
            Some(arg) => ChatCommand::LoadTranscript(arg.to_string()),
            None => ChatCommand::Invalid("/load requires a file path".to_string()),
        },
        "stats" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_u32_command<F>(argument: Option<&str>, constructor: F, name: &str) -> ChatCommand
where
    F: Fn(u32) -> ChatCommand,
{
    match argument {
        Some(arg) => match arg.parse::<u32>() {
            Ok(value) if value > 0 => constructor(value),
            _ => ChatCommand::Invalid(format!("{} expects a positive integer", name)),
        },
        None => ChatCommand::Invalid(format!("{} requires a value", name)),
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| "expects a non-negative number of seconds".to_string())?;
    if parsed.is_finite() && parsed >= 0.0 {
        Ok(Duration::from_secs_f64(parsed))
    } else {
        Err("expects a non-negative number of seconds".to_string())
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear chat history
  /url <base-url>        Reconfigure the endpoint (e.g., /url http://localhost:5005)
  /customer [json]       Set customer context (no argument clears it)
  /error-message <text>  Change the message shown when a request fails
  /retries <n>           Set total attempts per request
  /delay <seconds>       Set the delay between attempts
  /test                  Probe the endpoint and refresh the status
  /status                Show the connection status
  /history               Replay the chat history
  /sender                Show this session's sender id
  /transcript <file>     Enable auto-saving transcripts (or 'clear')
  /save <file>           Save the current transcript immediately
  /load <file>           Load a transcript from disk
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
