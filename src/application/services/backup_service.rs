use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::errors::CommandError;
use crate::domain::traits::Store;
use crate::infrastructure::storage::{BackupSnapshot, BackupStore};

/// What a finished backup contained and where it went
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub timestamp: DateTime<Utc>,
    pub members: usize,
    pub events: usize,
    /// `None` when no backup directory is configured
    pub path: Option<PathBuf>,
}

/// Service for snapshotting all members and events
pub struct BackupService {
    store: Arc<dyn Store>,
    target: Option<BackupStore>,
}

impl BackupService {
    pub fn new(store: Arc<dyn Store>, target: Option<BackupStore>) -> Self {
        Self { store, target }
    }

    pub async fn run(&self) -> Result<BackupReport, CommandError> {
        let members = self.store.all_members().await?;
        let events = self.store.all_events().await?;
        let snapshot = BackupSnapshot::new(members, events);

        let path = match &self.target {
            Some(target) => Some(target.write(&snapshot).await?),
            None => None,
        };

        tracing::info!(
            "Backup created: {} ({} members, {} events, {})",
            snapshot.timestamp.to_rfc3339(),
            snapshot.total_members,
            snapshot.total_events,
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not written, no backup directory".to_string())
        );

        Ok(BackupReport {
            timestamp: snapshot.timestamp,
            members: snapshot.total_members,
            events: snapshot.total_events,
            path,
        })
    }
}
