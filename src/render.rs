//! Output rendering for the chat client.
//!
//! This module provides a trait-based rendering abstraction so the REPL,
//! tests, and any future frontend can present transcripts differently.
//! The default implementation writes to stdout with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::types::{ConnectionStatus, Message, MessageRole};

/// ANSI escape code for dim text (used for timestamps).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the bot label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the connected indicator).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for the unknown indicator).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors and the disconnected
/// indicator).
const ANSI_RED: &str = "\x1b[31m";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Render one transcript entry: role label, text, timestamp.
    fn render_message(&mut self, message: &Message);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print the connection status indicator.
    fn print_status(&mut self, status: ConnectionStatus);

    /// Called when a chat turn is complete.
    ///
    /// Used to ensure proper newlines and cleanup after a reply.
    fn finish_response(&mut self);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            use_color: true,
        }
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    /// Flushes stdout so output lands before the next readline prompt.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn label_color(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "",
            MessageRole::Bot => ANSI_CYAN,
            MessageRole::Error => ANSI_RED,
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The transcript label for a role.
pub fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Bot => "Bot",
        MessageRole::Error => "Error",
    }
}

/// The indicator dot and label for a connection status.
fn status_parts(status: ConnectionStatus) -> (&'static str, &'static str) {
    match status {
        ConnectionStatus::Unknown => (ANSI_YELLOW, "unknown"),
        ConnectionStatus::Connected => (ANSI_GREEN, "connected"),
        ConnectionStatus::Error => (ANSI_RED, "disconnected"),
    }
}

impl Renderer for PlainTextRenderer {
    fn render_message(&mut self, message: &Message) {
        let label = role_label(message.role);
        let stamp = message.display_timestamp();
        if self.use_color {
            let color = Self::label_color(message.role);
            println!(
                "{color}{label}{ANSI_RESET} {ANSI_DIM}[{stamp}]{ANSI_RESET}: {}",
                message.text
            );
        } else {
            println!("{label} [{stamp}]: {}", message.text);
        }
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        if self.use_color {
            eprintln!("\n{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            eprintln!("\nError: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_status(&mut self, status: ConnectionStatus) {
        let (color, label) = status_parts(status);
        if self.use_color {
            println!("{color}\u{25cf}{ANSI_RESET} {label}");
        } else {
            println!("[{label}]");
        }
        self.flush();
    }

    fn finish_response(&mut self) {
        println!();
        self.flush();
    }
}
