//! File-based backup storage

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::application::errors::StorageError;
use crate::domain::entities::{Event, Member};

/// Full point-in-time copy of club data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_members: usize,
    pub total_events: usize,
    pub members: Vec<Member>,
    pub events: Vec<Event>,
}

impl BackupSnapshot {
    pub fn new(members: Vec<Member>, events: Vec<Event>) -> Self {
        Self {
            timestamp: Utc::now(),
            total_members: members.len(),
            total_events: events.len(),
            members,
            events,
        }
    }

    pub fn file_name(&self) -> String {
        format!("backup-{}.json", self.timestamp.format("%Y%m%dT%H%M%S%.3fZ"))
    }
}

/// Writes snapshots as pretty JSON files under a base directory
pub struct BackupStore {
    base_path: PathBuf,
}

impl BackupStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Persist `snapshot`, returning the path written
    pub async fn write(&self, snapshot: &BackupSnapshot) -> Result<PathBuf, StorageError> {
        self.init().await?;
        let path = self.base_path.join(snapshot.file_name());
        let body = serde_json::to_vec_pretty(snapshot)?;
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}
