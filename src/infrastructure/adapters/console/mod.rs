//! Console adapter for development/testing
//!
//! Each stdin line becomes one event in the configured group:
//! - `@<phone> <text>` is a message from that member
//! - `+<phone>` is a join, `-<phone>` a leave
//! - anything else is a message from the admin

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::{mpsc, Mutex};
use crate::domain::entities::{ChatEvent, Membership, Message, Sender};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;
use crate::infrastructure::config::Config;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    sender: Option<mpsc::Sender<String>>,
    input: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "music-club-bot".to_string(),
                username: "console".to_string(),
            },
            sender: None,
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Mirror every outbound message into a channel
    pub fn with_sender(mut self, sender: mpsc::Sender<String>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Read the next line; `None` at end of input
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(prompt.as_bytes()).await;
        let _ = stdout.flush().await;

        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(line) => line.map(|l| l.trim().to_string()),
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                None
            }
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn one console line into a chat event for the configured group
pub fn event_from_line(line: &str, config: &Config) -> Option<ChatEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let group = config.group.id.clone();
    let membership = |phone: &str| {
        let phone = phone.trim();
        (!phone.is_empty()).then(|| Membership::new(group.clone(), Sender::new(phone)))
    };

    if let Some(phone) = line.strip_prefix('+') {
        return membership(phone).map(ChatEvent::GroupJoin);
    }
    if let Some(phone) = line.strip_prefix('-') {
        return membership(phone).map(ChatEvent::GroupLeave);
    }

    let (sender, text) = match line.strip_prefix('@') {
        Some(rest) => {
            let (phone, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            (Sender::new(phone), text.trim())
        }
        None => (Sender::new(&config.admin.phone), line),
    };

    Some(ChatEvent::Message(
        Message::from_text(group, sender, text).with_platform("console"),
    ))
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        if let Some(sender) = &self.sender {
            sender
                .send(text.to_string())
                .await
                .map_err(|e| BotError::Internal(e.to_string()))?;
        }
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
