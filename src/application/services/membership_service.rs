use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::replies;
use crate::application::services::reminder::{ReminderHandle, ReminderScheduler, REGISTRATION_REMINDER_DELAY};
use crate::domain::entities::Membership;
use crate::domain::traits::Bot;

/// Service for group join/leave notifications
pub struct MembershipService {
    bot: Arc<dyn Bot>,
    scheduler: ReminderScheduler,
    default_group_name: String,
}

impl MembershipService {
    pub fn new(bot: Arc<dyn Bot>, default_group_name: impl Into<String>) -> Self {
        Self {
            scheduler: ReminderScheduler::new(bot.clone()),
            bot,
            default_group_name: default_group_name.into(),
        }
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    /// Welcome the newcomer, then remind them to register after a delay
    pub async fn on_join(&self, membership: &Membership) -> Result<ReminderHandle, BotError> {
        tracing::info!("{} joined {}", membership.participant, membership.chat_id);

        let group_name = membership
            .chat_name
            .as_deref()
            .unwrap_or(&self.default_group_name);
        self.bot
            .send_message(&membership.chat_id, &replies::welcome(group_name))
            .await?;

        Ok(self.scheduler.schedule(
            membership.chat_id.clone(),
            replies::REGISTRATION_REMINDER,
            REGISTRATION_REMINDER_DELAY,
        ))
    }

    pub async fn on_leave(&self, membership: &Membership) -> Result<(), BotError> {
        tracing::info!("{} left {}", membership.participant, membership.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Sender;
    use crate::test_support::RecordingBot;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn join_sends_welcome_then_reminder() {
        let bot = Arc::new(RecordingBot::default());
        let service = MembershipService::new(bot.clone(), "Music Club");
        let join = Membership::new("club@g.us", Sender::new("94711111111")).with_chat_name("Colombo Music Club");

        let handle = service.on_join(&join).await.unwrap();
        assert_eq!(handle.chat_id, "club@g.us");

        let sent = bot.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Welcome to Colombo Music Club!"));

        tokio::time::sleep(REGISTRATION_REMINDER_DELAY + Duration::from_secs(1)).await;
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let sent = bot.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], ("club@g.us".to_string(), replies::REGISTRATION_REMINDER.to_string()));
    }

    #[tokio::test]
    async fn join_without_chat_name_uses_default() {
        let bot = Arc::new(RecordingBot::default());
        let service = MembershipService::new(bot.clone(), "Music Club");
        service
            .on_join(&Membership::new("club@g.us", Sender::new("1")))
            .await
            .unwrap();
        assert!(bot.sent()[0].1.contains("Welcome to Music Club!"));
        assert_eq!(service.scheduler().shutdown(), 1);
    }

    #[tokio::test]
    async fn leave_is_silent() {
        let bot = Arc::new(RecordingBot::default());
        let service = MembershipService::new(bot.clone(), "Music Club");
        service
            .on_leave(&Membership::new("club@g.us", Sender::new("1")))
            .await
            .unwrap();
        assert!(bot.sent().is_empty());
        assert_eq!(service.scheduler().pending_count(), 0);
    }

    #[tokio::test]
    async fn failed_welcome_schedules_nothing() {
        let bot = Arc::new(RecordingBot::failing());
        let service = MembershipService::new(bot, "Music Club");
        let result = service.on_join(&Membership::new("club@g.us", Sender::new("1"))).await;
        assert!(result.is_err());
        assert_eq!(service.scheduler().pending_count(), 0);
    }
}
