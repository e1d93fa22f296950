//! End-to-end chat scenarios through the dispatcher
//! Run with: cargo test --test end_to_end

use async_trait::async_trait;
use std::sync::{Arc, Mutex, Once};

use music_club_bot::application::errors::BotError;
use music_club_bot::application::messaging::{MessageDispatcher, Outcome};
use music_club_bot::application::services::{BackupService, CommandService, MembershipService};
use music_club_bot::domain::entities::{ChatEvent, Membership, Message, Sender};
use music_club_bot::domain::traits::{Bot, BotInfo, Store};
use music_club_bot::infrastructure::config::Config;
use music_club_bot::infrastructure::database::Database;
use music_club_bot::infrastructure::storage::BackupStore;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    fn last(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, text)| text.clone())
    }

    fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Bot for Outbox {
    async fn start(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        self.sent.lock().unwrap().push((chat_id.to_string(), text.to_string()));
        Ok("sent".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "outbox".to_string(),
            name: "outbox".to_string(),
            username: "outbox".to_string(),
        }
    }
}

struct Club {
    config: Config,
    outbox: Arc<Outbox>,
    db: Arc<Database>,
    dispatcher: MessageDispatcher,
}

impl Club {
    fn new(backup_dir: Option<&std::path::Path>) -> Self {
        ensure_init();
        let config = Config::default();
        let outbox = Arc::new(Outbox::default());
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store: Arc<dyn Store> = db.clone();
        let backups = BackupService::new(store.clone(), backup_dir.map(BackupStore::new));
        let commands = CommandService::new(store, Arc::new(config.clone()), backups);
        let membership = MembershipService::new(outbox.clone(), "Music Club");
        let dispatcher = MessageDispatcher::new(&config, outbox.clone(), commands, membership);
        Self { config, outbox, db, dispatcher }
    }

    async fn say(&self, from: &str, text: &str) -> Outcome {
        self.say_in(&self.config.group.id, from, text).await
    }

    async fn say_in(&self, chat: &str, from: &str, text: &str) -> Outcome {
        let message = Message::from_text(chat, Sender::new(from), text);
        self.dispatcher.dispatch(ChatEvent::Message(message)).await.unwrap()
    }

    fn admin(&self) -> String {
        self.config.admin_phone()
    }
}

const KAMAL: &str = "94711111111@c.us";

#[tokio::test]
async fn test_register_then_profile() {
    let club = Club::new(None);

    club.say(KAMAL, "!register Kamal Rock Guitarist").await;
    assert!(club.outbox.last().unwrap().contains("Registration Successful"));

    club.say(KAMAL, "!profile").await;
    let profile = club.outbox.last().unwrap();
    assert!(profile.contains("Kamal"));
    assert!(profile.contains("Rock"));
    assert!(profile.contains("Guitarist"));
    assert!(profile.contains("Beginner"));

    club.say(KAMAL, "!register Kamal Jazz Lead Vocalist").await;
    assert!(club.outbox.last().unwrap().contains("Profile Updated"));
    assert_eq!(club.db.count_members().await.unwrap(), 1);
    let member = club.db.find_member("94711111111").await.unwrap().unwrap();
    assert_eq!(member.role, "Lead Vocalist");
}

#[tokio::test]
async fn test_admin_creates_event_and_members_see_it() {
    let club = Club::new(None);

    club.say(&club.admin(), "!event create 2024-12-25 19:00 Christmas_Concert").await;
    assert!(club.outbox.last().unwrap().contains("Christmas Concert"));

    club.say(KAMAL, "!events").await;
    let listing = club.outbox.last().unwrap();
    assert!(listing.contains("Christmas Concert"));
    assert!(listing.contains("2024-12-25"));
}

#[tokio::test]
async fn test_member_cannot_use_admin_commands() {
    let club = Club::new(None);

    club.say(KAMAL, "!announce Rehearsal moved").await;
    assert_eq!(club.outbox.last().unwrap(), "❌ Only an admin can make announcements!");

    club.say(KAMAL, "!event create 2024-12-25 19:00 Party").await;
    assert_eq!(club.outbox.last().unwrap(), "❌ Only an admin can create events!");
    assert_eq!(club.db.count_events().await.unwrap(), 0);
}

#[tokio::test]
async fn test_other_groups_are_ignored() {
    let club = Club::new(None);

    let outcome = club.say_in("another@g.us", KAMAL, "!register Kamal Rock Guitarist").await;
    assert_eq!(outcome, Outcome::Ignored);
    assert_eq!(club.outbox.len(), 0);
    assert!(club.db.find_member("94711111111").await.unwrap().is_none());
}

#[tokio::test]
async fn test_stats_and_members_after_registrations() {
    let club = Club::new(None);

    club.say(KAMAL, "!register Kamal Rock Guitarist").await;
    club.say("94722222222", "!register Nimal Rock Drummer").await;
    club.say("94733333333", "!register Sunil Baila Vocalist").await;

    club.say(KAMAL, "!stats").await;
    let stats = club.outbox.last().unwrap();
    assert!(stats.contains("Rock: 2"));
    assert!(stats.contains("Baila: 1"));

    club.say(&club.admin(), "!members").await;
    let members = club.outbox.last().unwrap();
    assert!(members.contains("Total: 3 members"));
    assert!(members.contains("94722222222"));
}

#[tokio::test]
async fn test_backup_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let club = Club::new(Some(dir.path()));

    club.say(KAMAL, "!register Kamal Rock Guitarist").await;
    club.say(&club.admin(), "!backup").await;
    assert!(club.outbox.last().unwrap().contains("Members: 1"));

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let body = std::fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["totalMembers"], 1);
    assert_eq!(json["members"][0]["phoneNumber"], "94711111111");
}

#[tokio::test]
async fn test_join_welcomes_and_arms_reminder() {
    let club = Club::new(None);
    let join = Membership::new(club.config.group.id.clone(), Sender::new(KAMAL));

    let outcome = club.dispatcher.dispatch(ChatEvent::GroupJoin(join)).await.unwrap();
    assert_eq!(outcome, Outcome::Handled);
    assert!(club.outbox.last().unwrap().contains("Welcome to Music Club"));
    assert_eq!(club.dispatcher.membership().scheduler().pending_count(), 1);
    assert_eq!(club.dispatcher.membership().scheduler().shutdown(), 1);
}
