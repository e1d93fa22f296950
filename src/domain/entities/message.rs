use super::Sender;
use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    /// `name` is lowercased without the prefix; `args` are kept as typed
    Command { name: String, args: Vec<String> },
    Empty,
}

impl Content {
    pub fn text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Content::Command { .. })
    }
}

/// Represents an incoming text message
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender: Sender,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat_id: impl Into<String>, sender: Sender, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id: chat_id.into(),
            sender,
            content,
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn from_text(chat_id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self::new(chat_id, sender, Content::Text(text.into()))
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }
}

/// A join or leave notification for a group chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub chat_id: String,
    pub chat_name: Option<String>,
    pub participant: Sender,
}

impl Membership {
    pub fn new(chat_id: impl Into<String>, participant: Sender) -> Self {
        Self {
            chat_id: chat_id.into(),
            chat_name: None,
            participant,
        }
    }

    pub fn with_chat_name(mut self, name: impl Into<String>) -> Self {
        self.chat_name = Some(name.into());
        self
    }
}

/// Everything a transport can deliver to the dispatcher
#[derive(Debug, Clone)]
pub enum ChatEvent {
    Message(Message),
    GroupJoin(Membership),
    GroupLeave(Membership),
}

impl ChatEvent {
    pub fn chat_id(&self) -> &str {
        match self {
            ChatEvent::Message(m) => &m.chat_id,
            ChatEvent::GroupJoin(m) | ChatEvent::GroupLeave(m) => &m.chat_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::Message(_) => "message",
            ChatEvent::GroupJoin(_) => "group_join",
            ChatEvent::GroupLeave(_) => "group_leave",
        }
    }
}
