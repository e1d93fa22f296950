//! One-shot delayed messages
//!
//! Reminders live only in memory: they are lost on restart and are not
//! cancelled when the member they target leaves the group.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::traits::Bot;

/// Delay before the post-join registration reminder
pub const REGISTRATION_REMINDER_DELAY: Duration = Duration::from_secs(300);

/// Identifies a scheduled reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderHandle {
    pub id: Uuid,
    pub chat_id: String,
    pub due_at: DateTime<Utc>,
}

type PendingMap = Arc<Mutex<HashMap<Uuid, JoinHandle<()>>>>;

pub struct ReminderScheduler {
    bot: Arc<dyn Bot>,
    pending: PendingMap,
}

impl ReminderScheduler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Send `text` to `chat_id` once `delay` has elapsed. Must be called inside a tokio runtime.
    pub fn schedule(&self, chat_id: impl Into<String>, text: impl Into<String>, delay: Duration) -> ReminderHandle {
        let id = Uuid::new_v4();
        let chat_id = chat_id.into();
        let text = text.into();
        let due_at = Utc::now()
            + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

        // Hold the lock across spawn so the task cannot deregister before it is registered
        let mut pending = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let bot = self.bot.clone();
        let registry = self.pending.clone();
        let target = chat_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match bot.send_message(&target, &text).await {
                Ok(_) => tracing::debug!("Reminder {} delivered to {}", id, target),
                Err(e) => tracing::error!("Reminder {} to {} failed: {}", id, target, e),
            }
            if let Ok(mut pending) = registry.lock() {
                pending.remove(&id);
            }
        });
        pending.insert(id, task);

        tracing::debug!("Scheduled reminder {} for {} in {:?}", id, chat_id, delay);
        ReminderHandle { id, chat_id, due_at }
    }

    /// Abort a reminder that has not fired yet
    pub fn cancel(&self, id: &Uuid) -> bool {
        let task = self.pending.lock().ok().and_then(|mut p| p.remove(id));
        match task {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Abort every pending reminder, returning how many were dropped
    pub fn shutdown(&self) -> usize {
        let tasks: Vec<_> = match self.pending.lock() {
            Ok(mut pending) => pending.drain().map(|(_, task)| task).collect(),
            Err(_) => return 0,
        };
        for task in &tasks {
            task.abort();
        }
        if !tasks.is_empty() {
            tracing::info!("Dropped {} pending reminders", tasks.len());
        }
        tasks.len()
    }
}
