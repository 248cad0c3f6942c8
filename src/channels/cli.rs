//! CLI channel: stdin/stdout REPL for local testing.
//!
//! Quick replies are printed as numbered hints; typing `/N` sends the N-th
//! offered label verbatim.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::channels::{
    Channel, IncomingMessage, MessageStream, OutgoingResponse, ReplyKeyboard, StatusUpdate,
};
use crate::error::ChannelError;

/// User id attached to every message typed at the terminal.
pub const CLI_USER_ID: &str = "local-user";

/// A simple CLI channel that reads from stdin and writes to stdout.
pub struct CliChannel {
    last_keyboard: Arc<Mutex<Option<ReplyKeyboard>>>,
}

impl CliChannel {
    pub fn new() -> Self {
        Self {
            last_keyboard: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let last_keyboard = Arc::clone(&self.last_keyboard);

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            eprint!("> ");

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let text = match last_keyboard.lock() {
                            Ok(keyboard) => inbound_text(&line, keyboard.as_ref()),
                            Err(_) => inbound_text(&line, None),
                        };
                        let msg = IncomingMessage::new("cli", CLI_USER_ID, text);
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(
        &self,
        _msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        println!("\n{}\n", response.content);
        if let Some(ref keyboard) = response.reply_options {
            println!("{}", render_keyboard(keyboard));
        }
        if let Ok(mut last) = self.last_keyboard.lock() {
            if response.reply_options.is_some() {
                *last = response.reply_options;
            }
        }
        eprint!("> ");
        Ok(())
    }

    async fn send_status(
        &self,
        status: StatusUpdate,
        _metadata: &serde_json::Value,
    ) -> Result<(), ChannelError> {
        match status {
            StatusUpdate::Thinking(msg) => eprintln!("⏳ {}", msg),
        }
        Ok(())
    }
}

/// Numbered hint lines, e.g. `  /1 Офис   /2 Удаленно`.
fn render_keyboard(keyboard: &ReplyKeyboard) -> String {
    let mut n = 0;
    keyboard
        .rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|label| {
                    n += 1;
                    format!("/{n} {label}")
                })
                .collect();
            format!("  {}", cells.join("   "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text to submit for one typed line.
///
/// The line is sent as typed, blank lines included, so an empty answer can
/// be given. Only a `/N` shortcut is rewritten to its label.
fn inbound_text(line: &str, keyboard: Option<&ReplyKeyboard>) -> String {
    let line = line.strip_suffix('\r').unwrap_or(line);
    resolve_shortcut(line, keyboard).unwrap_or_else(|| line.to_string())
}

/// Map `/N` onto the N-th label of the last keyboard shown.
fn resolve_shortcut(line: &str, keyboard: Option<&ReplyKeyboard>) -> Option<String> {
    let index: usize = line.trim().strip_prefix('/')?.parse().ok()?;
    let keyboard = keyboard?;
    keyboard
        .labels()
        .nth(index.checked_sub(1)?)
        .map(str::to_string)
}
