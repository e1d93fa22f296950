use async_trait::async_trait;
use crate::application::errors::StorageError;
use crate::domain::entities::{Event, GroupCount, Member, NewEvent, Registration, UpsertOutcome};

/// Store trait - abstraction for member and event persistence
#[async_trait]
pub trait Store: Send + Sync {
    // Member operations
    async fn find_member(&self, phone: &str) -> Result<Option<Member>, StorageError>;
    /// Insert, or replace only name/genre/role of an existing member
    async fn upsert_member(&self, phone: &str, registration: &Registration) -> Result<UpsertOutcome, StorageError>;
    /// Active members, newest join first
    async fn active_members(&self) -> Result<Vec<Member>, StorageError>;
    async fn all_members(&self) -> Result<Vec<Member>, StorageError>;
    async fn count_members(&self) -> Result<u64, StorageError>;
    async fn count_active_members(&self) -> Result<u64, StorageError>;
    async fn top_genres(&self, limit: usize) -> Result<Vec<GroupCount>, StorageError>;
    async fn top_roles(&self, limit: usize) -> Result<Vec<GroupCount>, StorageError>;

    // Event operations
    async fn insert_event(&self, event: &NewEvent) -> Result<Event, StorageError>;
    /// Most recently created first
    async fn recent_events(&self, limit: usize) -> Result<Vec<Event>, StorageError>;
    async fn all_events(&self) -> Result<Vec<Event>, StorageError>;
    async fn count_events(&self) -> Result<u64, StorageError>;
}
