//! Message parser - Parses raw message text into structured content

use crate::domain::entities::Content;

/// Every reply text tells members to type commands with this prefix
pub const COMMAND_PREFIX: &str = "!";

/// Splits inbound text into a command (`!name args...`) or plain text
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageParser;

impl MessageParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a text message body
    pub fn parse(&self, text: &str) -> Content {
        let text = text.trim();
        if text.is_empty() {
            return Content::Empty;
        }

        match text.strip_prefix(COMMAND_PREFIX) {
            Some(rest) => Self::parse_command(rest),
            None => Content::Text(text.to_string()),
        }
    }

    /// Only the command name is lowercased; arguments stay as typed
    fn parse_command(cmd_text: &str) -> Content {
        let mut parts = cmd_text.split_whitespace();
        let name = parts.next().unwrap_or("").to_lowercase();
        let args = parts.map(|s| s.to_string()).collect();

        Content::Command { name, args }
    }
}
