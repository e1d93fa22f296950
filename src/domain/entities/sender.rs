use std::fmt;

/// Strip transport decoration from a phone identity.
///
/// `94755982430@c.us`, `+94755982430` and ` 94755982430 ` all normalize to
/// `94755982430`.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let local = trimmed.split('@').next().unwrap_or(trimmed);
    local.trim().trim_start_matches('+').to_string()
}

/// The author of an inbound chat event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sender {
    /// Normalized phone number (or the transport's numeric user id)
    pub id: String,
    pub display_name: Option<String>,
    /// True when the event was produced by the bot's own account
    pub is_me: bool,
}

impl Sender {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: normalize_phone(id.as_ref()),
            display_name: None,
            is_me: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn me(mut self) -> Self {
        self.is_me = true;
        self
    }

    pub fn display_name(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| self.id.clone())
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
