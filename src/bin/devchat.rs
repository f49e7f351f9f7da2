//! Interactive chat client for exercising a chat-style HTTP endpoint.
//!
//! This binary provides a REPL for sending messages to a development
//! backend and inspecting its replies, with bounded retry and a
//! per-session sender id.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage against a local backend
//! devchat --url http://localhost:5005
//!
//! # Endpoint from the environment
//! DEVCHAT_API_URL=https://your-tunnel.example.com devchat
//!
//! # Attach customer context to every request
//! devchat --url http://localhost:5005 --customer-info '{"tier":"dev"}'
//!
//! # Disable colors (useful for piping output)
//! devchat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear chat history
//! - `/url <base>` - Reconfigure the endpoint
//! - `/test` - Probe the endpoint
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the client

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use devchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};

/// Main entry point for the devchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("devchat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    let use_color = config.use_color;

    let mut session = ChatSession::new(config)?;
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupts arriving while a request is in flight.
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler. A request in progress always runs to the end
    // of its retry budget; the interrupt is acknowledged afterwards.
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Developer Chat Interface");
    match session.endpoint() {
        Some(url) => println!("Endpoint: {url}"),
        None => println!("No endpoint configured; set one with /url <base-url>"),
    }
    println!("Sender ID: {}", session.sender_id());
    println!("Type /help for commands, /quit to exit\n");

    if session.endpoint().is_some() {
        session.test_connection().await;
        renderer.print_status(session.status());
    }

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Chat history cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Url(url) => match session.set_base_url(&url) {
                            Ok(()) => {
                                renderer.print_info(&format!("Endpoint set to: {url}"));
                                session.test_connection().await;
                                renderer.print_status(session.status());
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::CustomerInfo(info) => {
                            let cleared = info.is_none();
                            session.set_customer_info(info);
                            if cleared {
                                renderer.print_info("Customer info cleared.");
                            } else {
                                renderer.print_info("Customer info set.");
                            }
                        }
                        ChatCommand::ErrorMessage(text) => {
                            session.set_error_message(text.clone());
                            renderer.print_info(&format!("Error message set to: {text}"));
                        }
                        ChatCommand::Retries(value) => {
                            session.set_retry_attempts(value);
                            renderer.print_info(&format!("Retry attempts set to {value}"));
                        }
                        ChatCommand::RetryDelay(delay) => {
                            session.set_retry_delay(delay);
                            renderer.print_info(&format!(
                                "Retry delay set to {:.2}s",
                                delay.as_secs_f64()
                            ));
                        }
                        ChatCommand::Test => {
                            if session.endpoint().is_none() {
                                renderer.print_error(
                                    "No endpoint configured. Set one with /url <base-url>.",
                                );
                            } else {
                                renderer.print_info("Testing connection...");
                                session.test_connection().await;
                                renderer.print_status(session.status());
                            }
                        }
                        ChatCommand::Status => {
                            renderer.print_status(session.status());
                        }
                        ChatCommand::History => {
                            if session.history().is_empty() {
                                renderer.print_info("(no messages)");
                            } else {
                                for message in session.history() {
                                    renderer.render_message(message);
                                }
                            }
                        }
                        ChatCommand::Sender => {
                            let sender = session.sender_id().to_string();
                            renderer.print_info(&format!("Sender ID: {sender}"));
                        }
                        ChatCommand::TranscriptPath(path) => {
                            session.set_transcript_path(Some(PathBuf::from(&path)));
                            renderer.print_info(&format!("Transcript auto-save set to {}", path));
                        }
                        ChatCommand::ClearTranscriptPath => {
                            session.set_transcript_path(None);
                            renderer.print_info("Transcript auto-save disabled.");
                        }
                        ChatCommand::SaveTranscript(path) => {
                            match session.save_transcript_to(&path) {
                                Ok(()) => {
                                    renderer.print_info(&format!("Transcript saved to {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to save transcript: {}", err)),
                            }
                        }
                        ChatCommand::LoadTranscript(path) => {
                            match session.load_transcript_from(&path) {
                                Ok(()) => {
                                    renderer.print_info(&format!("Transcript loaded from {}", path))
                                }
                                Err(err) => renderer
                                    .print_error(&format!("Failed to load transcript: {}", err)),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the endpoint
                session.send_message(line, &mut renderer).await;
                if interrupted.swap(false, Ordering::Relaxed) {
                    renderer
                        .print_info("Interrupt received; the request completed its retry budget.");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    match stats.sender_id {
        Some(ref id) => println!("      Sender ID: {id}"),
        None => println!("      Sender ID: (not generated yet)"),
    }
    println!("      Messages: {}", stats.message_count);
    println!("      Status: {}", stats.status);
    match stats.base_url {
        Some(ref url) => println!("      Endpoint: {url}"),
        None => println!("      Endpoint: (none)"),
    }
    println!(
        "      Requests: {} sent, {} failed",
        stats.total_requests, stats.total_failures
    );
    println!(
        "      Retry policy: {} attempts, {:.2}s apart",
        stats.retry_attempts,
        stats.retry_delay.as_secs_f64()
    );
    match stats.transcript_path {
        Some(ref path) => println!("      Transcript file: {}", path.display()),
        None => println!("      Transcript file: (disabled)"),
    }
}

fn print_config(session: &ChatSession) {
    let stats = session.stats();
    println!("    Current Configuration:");
    match stats.base_url {
        Some(ref url) => println!("      Endpoint: {url}"),
        None => println!("      Endpoint: (none)"),
    }
    println!(
        "      Customer info: {}",
        if stats.customer_info_set {
            "set"
        } else {
            "(none)"
        }
    );
    println!("      Error message: {}", stats.error_message);
    println!(
        "      Retry policy: {} attempts, {:.2}s apart",
        stats.retry_attempts,
        stats.retry_delay.as_secs_f64()
    );
    match stats.transcript_path {
        Some(ref path) => println!("      Transcript file: {}", path.display()),
        None => println!("      Transcript file: (disabled)"),
    }
}
