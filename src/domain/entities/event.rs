use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A club event. `date` and `time` are free text as typed by the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub time: String,
    pub description: Option<String>,
    pub created_by: String,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for [`Event`]; id, attendees and creation time are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    pub time: String,
    pub description: Option<String>,
    pub created_by: String,
}

impl NewEvent {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            time: time.into(),
            description: None,
            created_by: created_by.into(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}
