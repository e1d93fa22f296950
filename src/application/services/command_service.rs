use std::sync::Arc;

use crate::application::errors::{CommandError, ParseError};
use crate::application::services::backup_service::BackupService;
use crate::application::services::recommendations::{self, FALLBACK_GENRE};
use crate::application::services::replies::{self, StatsReport};
use crate::domain::entities::{Command, CommandKind, NewEvent, Registration};
use crate::domain::traits::Store;
use crate::infrastructure::config::Config;

const RECENT_EVENTS_LIMIT: usize = 5;
const TOP_GROUPS_LIMIT: usize = 3;
const EVENT_DESCRIPTION: &str = "Event created through the Music Club bot";

/// Who issued a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Normalized phone number
    pub phone: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(phone: impl Into<String>, is_admin: bool) -> Self {
        Self {
            phone: phone.into(),
            is_admin,
        }
    }
}

/// Service for validating and executing commands
pub struct CommandService {
    store: Arc<dyn Store>,
    config: Arc<Config>,
    backups: BackupService,
}

impl CommandService {
    pub fn new(store: Arc<dyn Store>, config: Arc<Config>, backups: BackupService) -> Self {
        Self {
            store,
            config,
            backups,
        }
    }

    /// Resolve, authorize, validate and run a command. Always yields reply text.
    ///
    /// Admin-only commands are refused before their arguments are checked, so
    /// members never see usage hints for commands they cannot run.
    pub async fn handle(&self, name: &str, args: &[String], caller: &Caller) -> String {
        let command = match Command::parse(name, args) {
            Ok(command) => command,
            Err(ParseError::Usage(kind)) if kind.is_admin_only() && !caller.is_admin => {
                return self.deny(kind, caller);
            }
            Err(ParseError::Usage(kind)) => return replies::usage(kind),
            Err(e @ (ParseError::Unknown(_) | ParseError::Empty)) => {
                tracing::debug!("{}", e);
                return replies::UNKNOWN_COMMAND.to_string();
            }
        };

        let kind = command.kind();
        match self.execute(&command, caller).await {
            Ok(reply) => reply,
            Err(CommandError::PermissionDenied) => self.deny(kind, caller),
            Err(e) => {
                tracing::error!("!{} failed for {}: {}", kind.name(), caller.phone, e);
                replies::failure(kind).to_string()
            }
        }
    }

    fn deny(&self, kind: CommandKind, caller: &Caller) -> String {
        tracing::info!("Denied !{} for {}", kind.name(), caller.phone);
        replies::permission_denied(kind).to_string()
    }

    /// Run an already parsed command
    pub async fn execute(&self, command: &Command, caller: &Caller) -> Result<String, CommandError> {
        if command.kind().is_admin_only() && !caller.is_admin {
            return Err(CommandError::PermissionDenied);
        }

        match command {
            Command::Help => Ok(replies::help(&self.config.bot.name)),
            Command::Register { name, genre, role } => {
                let registration = Registration {
                    name: name.clone(),
                    genre: genre.clone(),
                    role: role.clone(),
                };
                self.register(caller, &registration).await
            }
            Command::Profile => self.profile(caller).await,
            Command::Events => self.events().await,
            Command::Recommend { genre } => Ok(self.recommend(genre.as_deref())),
            Command::Stats => self.stats().await,
            Command::Members => self.members(caller).await,
            Command::Announce { text } => {
                Ok(replies::announcement(text, &self.config.admin_phone()))
            }
            Command::CreateEvent { date, time, name } => {
                self.create_event(caller, date, time, name).await
            }
            Command::Backup => {
                let report = self.backups.run().await?;
                Ok(replies::backup_created(report.members, report.events, &report.timestamp))
            }
        }
    }

    async fn register(&self, caller: &Caller, registration: &Registration) -> Result<String, CommandError> {
        let outcome = self.store.upsert_member(&caller.phone, registration).await?;
        tracing::info!("Member {} {:?}", caller.phone, outcome);
        Ok(replies::registered(outcome, registration))
    }

    async fn profile(&self, caller: &Caller) -> Result<String, CommandError> {
        match self.store.find_member(&caller.phone).await? {
            Some(member) => Ok(replies::profile(&member)),
            None => Ok(replies::NOT_REGISTERED.to_string()),
        }
    }

    async fn events(&self) -> Result<String, CommandError> {
        let events = self.store.recent_events(RECENT_EVENTS_LIMIT).await?;
        if events.is_empty() {
            return Ok(replies::NO_EVENTS.to_string());
        }
        Ok(replies::events(&events))
    }

    fn recommend(&self, genre: Option<&str>) -> String {
        let genre = genre.unwrap_or(FALLBACK_GENRE);
        let song = recommendations::recommend(genre, &mut rand::thread_rng());
        replies::recommendation(song, &recommendations::genre_label(genre))
    }

    async fn stats(&self) -> Result<String, CommandError> {
        let report = StatsReport {
            total_members: self.store.count_members().await?,
            active_members: self.store.count_active_members().await?,
            total_events: self.store.count_events().await?,
            top_genres: self.store.top_genres(TOP_GROUPS_LIMIT).await?,
            top_roles: self.store.top_roles(TOP_GROUPS_LIMIT).await?,
        };
        Ok(replies::stats(&report))
    }

    async fn members(&self, caller: &Caller) -> Result<String, CommandError> {
        let members = self.store.active_members().await?;
        if members.is_empty() {
            return Ok(replies::NO_MEMBERS.to_string());
        }
        Ok(replies::members(&members, caller.is_admin))
    }

    async fn create_event(&self, caller: &Caller, date: &str, time: &str, name: &str) -> Result<String, CommandError> {
        let event = NewEvent::new(name, date, time, caller.phone.clone())
            .with_description(EVENT_DESCRIPTION);
        let stored = self.store.insert_event(&event).await?;
        tracing::info!("Event {} '{}' created by {}", stored.id, stored.name, caller.phone);
        Ok(replies::event_created(&stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::StorageError;
    use crate::domain::entities::{Event, GroupCount, Member, UpsertOutcome};
    use crate::infrastructure::database::Database;
    use async_trait::async_trait;

    const ADMIN: &str = "94755982430";
    const MEMBER: &str = "94711111111";

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    fn service_with(store: Arc<dyn Store>) -> CommandService {
        let config = Arc::new(Config::default());
        let backups = BackupService::new(store.clone(), None);
        CommandService::new(store, config, backups)
    }

    fn service() -> (CommandService, Arc<Database>) {
        let db = Arc::new(Database::open_in_memory().unwrap());
        (service_with(db.clone()), db)
    }

    fn admin() -> Caller {
        Caller::new(ADMIN, true)
    }

    fn member() -> Caller {
        Caller::new(MEMBER, false)
    }

    /// Fails every call
    struct BrokenStore;

    fn broken() -> StorageError {
        StorageError::Corrupt("disk on fire".to_string())
    }

    #[async_trait]
    impl Store for BrokenStore {
        async fn find_member(&self, _: &str) -> Result<Option<Member>, StorageError> { Err(broken()) }
        async fn upsert_member(&self, _: &str, _: &Registration) -> Result<UpsertOutcome, StorageError> { Err(broken()) }
        async fn active_members(&self) -> Result<Vec<Member>, StorageError> { Err(broken()) }
        async fn all_members(&self) -> Result<Vec<Member>, StorageError> { Err(broken()) }
        async fn count_members(&self) -> Result<u64, StorageError> { Err(broken()) }
        async fn count_active_members(&self) -> Result<u64, StorageError> { Err(broken()) }
        async fn top_genres(&self, _: usize) -> Result<Vec<GroupCount>, StorageError> { Err(broken()) }
        async fn top_roles(&self, _: usize) -> Result<Vec<GroupCount>, StorageError> { Err(broken()) }
        async fn insert_event(&self, _: &NewEvent) -> Result<Event, StorageError> { Err(broken()) }
        async fn recent_events(&self, _: usize) -> Result<Vec<Event>, StorageError> { Err(broken()) }
        async fn all_events(&self) -> Result<Vec<Event>, StorageError> { Err(broken()) }
        async fn count_events(&self) -> Result<u64, StorageError> { Err(broken()) }
    }

    #[tokio::test]
    async fn register_then_profile() {
        let (service, db) = service();

        let reply = service.handle("register", &args("Kamal Rock Lead Guitarist"), &member()).await;
        assert!(reply.contains("Registration Successful"));

        let stored = db.find_member(MEMBER).await.unwrap().unwrap();
        assert_eq!(stored.name, "Kamal");
        assert_eq!(stored.genre, "Rock");
        assert_eq!(stored.role, "Lead Guitarist");

        let profile = service.handle("profile", &[], &member()).await;
        assert!(profile.contains("Kamal"));
        assert!(profile.contains("Rock"));
        assert!(profile.contains("Lead Guitarist"));
        assert!(profile.contains("Beginner"));
    }

    #[tokio::test]
    async fn re_register_updates_in_place() {
        let (service, db) = service();
        service.handle("register", &args("Kamal Rock Guitarist"), &member()).await;
        let reply = service.handle("register", &args("Nimal Jazz Piano Player"), &member()).await;
        assert!(reply.contains("Profile Updated"));

        assert_eq!(db.count_members().await.unwrap(), 1);
        let stored = db.find_member(MEMBER).await.unwrap().unwrap();
        assert_eq!(stored.phone_number, MEMBER);
        assert_eq!(stored.name, "Nimal");
        assert_eq!(stored.role, "Piano Player");
    }

    #[tokio::test]
    async fn short_register_shows_usage_without_writing() {
        let (service, db) = service();
        let reply = service.handle("register", &args("Kamal Rock"), &member()).await;
        assert_eq!(reply, replies::usage(CommandKind::Register));
        assert_eq!(db.count_members().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn profile_for_stranger_is_not_registered() {
        let (service, db) = service();
        let reply = service.handle("profile", &[], &member()).await;
        assert_eq!(reply, replies::NOT_REGISTERED);
        assert_eq!(db.count_members().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn events_empty_and_listed() {
        let (service, _db) = service();
        assert_eq!(service.handle("events", &[], &member()).await, replies::NO_EVENTS);

        for i in 1..=6 {
            service
                .handle("event", &args(&format!("create 2024-12-{:02} 19:00 Show_{}", i, i)), &admin())
                .await;
        }
        let reply = service.handle("events", &[], &member()).await;
        assert!(reply.starts_with("🎵 *Upcoming Music Events*"));
        assert!(reply.contains("1. 🎤 *Show 6*"));
        assert!(reply.contains("5. 🎤 *Show 2*"));
        assert!(!reply.contains("Show 1*"));
        assert!(reply.contains("👥 0 attending"));
    }

    #[tokio::test]
    async fn admin_creates_event() {
        let (service, db) = service();
        let reply = service
            .handle("event", &args("create 2024-12-25 19:00 Christmas_Concert"), &admin())
            .await;
        assert!(reply.contains("Christmas Concert"));

        let events = db.all_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Christmas Concert");
        assert_eq!(events[0].date, "2024-12-25");
        assert_eq!(events[0].time, "19:00");
        assert_eq!(events[0].created_by, ADMIN);
        assert_eq!(events[0].description.as_deref(), Some(EVENT_DESCRIPTION));
    }

    #[tokio::test]
    async fn admin_bad_event_gets_usage() {
        let (service, db) = service();
        let reply = service.handle("event", &args("create 2024-12-25"), &admin()).await;
        assert_eq!(reply, replies::usage(CommandKind::Event));
        assert_eq!(db.count_events().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_admin_is_denied_gated_commands() {
        let (service, db) = service();

        let reply = service.handle("announce", &args("hello"), &member()).await;
        assert_eq!(reply, replies::permission_denied(CommandKind::Announce));

        let reply = service
            .handle("event", &args("create 2024-12-25 19:00 Party"), &member())
            .await;
        assert_eq!(reply, replies::permission_denied(CommandKind::Event));

        let reply = service.handle("backup", &[], &member()).await;
        assert_eq!(reply, replies::permission_denied(CommandKind::Backup));

        // denial wins over usage errors
        let reply = service.handle("announce", &[], &member()).await;
        assert_eq!(reply, replies::permission_denied(CommandKind::Announce));

        assert_eq!(db.count_events().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_gated_commands_deny_members_but_guide_admin() {
        let (service, _db) = service();

        let reply = service.handle("EVENT", &args("make 2024-12-25 19:00 Party"), &member()).await;
        assert_eq!(reply, replies::permission_denied(CommandKind::Event));

        let reply = service.handle("EVENT", &args("make 2024-12-25 19:00 Party"), &admin()).await;
        assert_eq!(reply, replies::usage(CommandKind::Event));

        let reply = service.handle("announce", &[], &admin()).await;
        assert_eq!(reply, replies::usage(CommandKind::Announce));
    }

    #[tokio::test]
    async fn execute_rechecks_admin() {
        let (service, _db) = service();
        let result = service
            .execute(&Command::Announce { text: "hi".into() }, &member())
            .await;
        assert!(matches!(result, Err(CommandError::PermissionDenied)));
    }

    #[tokio::test]
    async fn announce_wraps_text_in_banner() {
        let (service, _db) = service();
        let reply = service.handle("announce", &args("Practice moved to 6pm"), &admin()).await;
        assert!(reply.contains("MUSIC CLUB ANNOUNCEMENT"));
        assert!(reply.contains("Practice moved to 6pm"));
        assert!(reply.contains("+94755982430"));

        let reply = service.handle("announce", &[], &admin()).await;
        assert_eq!(reply, replies::usage(CommandKind::Announce));
    }

    #[tokio::test]
    async fn recommend_uses_genre_or_fallback() {
        let (service, _db) = service();
        let reply = service.handle("recommend", &args("rock"), &member()).await;
        assert!(recommendations::songs_for("rock").iter().any(|s| reply.contains(s)));
        assert!(reply.contains("*Genre:* Rock"));

        let reply = service.handle("recommend", &args("bogus"), &member()).await;
        assert!(recommendations::songs_for(FALLBACK_GENRE).iter().any(|s| reply.contains(s)));

        let reply = service.handle("recommend", &[], &member()).await;
        assert!(reply.contains("*Genre:* Random"));
    }

    #[tokio::test]
    async fn stats_reports_counts_and_top_groups() {
        let (service, _db) = service();
        service.handle("register", &args("A Rock Singer"), &Caller::new("1", false)).await;
        service.handle("register", &args("B Rock DJ"), &Caller::new("2", false)).await;
        service.handle("register", &args("C Pop Singer"), &Caller::new("3", false)).await;
        service.handle("event", &args("create today 8pm Jam"), &admin()).await;

        let reply = service.handle("stats", &[], &member()).await;
        assert!(reply.contains("*Total Members:* 3"));
        assert!(reply.contains("*Active Members:* 3"));
        assert!(reply.contains("*Total Events:* 1"));
        assert!(reply.contains("1. Rock: 2 members"));
        assert!(reply.contains("1. Singer: 2 members"));
    }

    #[tokio::test]
    async fn members_shows_phone_only_to_admin() {
        let (service, _db) = service();
        assert_eq!(service.handle("members", &[], &member()).await, replies::NO_MEMBERS);

        service.handle("register", &args("Kamal Rock Guitarist"), &member()).await;
        let public = service.handle("members", &[], &member()).await;
        assert!(public.contains("Kamal"));
        assert!(!public.contains(MEMBER));

        let private = service.handle("members", &[], &admin()).await;
        assert!(private.contains(MEMBER));
    }

    #[tokio::test]
    async fn backup_reports_counts() {
        let (service, _db) = service();
        service.handle("register", &args("Kamal Rock Guitarist"), &member()).await;
        let reply = service.handle("backup", &[], &admin()).await;
        assert!(reply.contains("Backup Created Successfully"));
        assert!(reply.contains("• Members: 1"));
        assert!(reply.contains("• Events: 0"));
    }

    #[tokio::test]
    async fn storage_failures_become_command_specific_replies() {
        let service = service_with(Arc::new(BrokenStore));
        assert_eq!(
            service.handle("register", &args("Kamal Rock Guitarist"), &member()).await,
            replies::failure(CommandKind::Register)
        );
        assert_eq!(service.handle("profile", &[], &member()).await, replies::failure(CommandKind::Profile));
        assert_eq!(service.handle("stats", &[], &member()).await, replies::failure(CommandKind::Stats));
        assert_eq!(service.handle("backup", &[], &admin()).await, replies::failure(CommandKind::Backup));
        // pure commands are unaffected
        assert!(service.handle("help", &[], &member()).await.contains("Commands"));
    }

    #[tokio::test]
    async fn unknown_command_reply() {
        let (service, _db) = service();
        assert_eq!(service.handle("dance", &[], &member()).await, replies::UNKNOWN_COMMAND);
        assert_eq!(service.handle("", &[], &member()).await, replies::UNKNOWN_COMMAND);
    }
}
