//! Message dispatcher - Routes chat events to handlers

use std::sync::Arc;
use crate::domain::entities::{ChatEvent, Content, Message};
use crate::domain::traits::Bot;
use crate::application::errors::BotError;
use crate::application::services::{Caller, CommandService, MembershipService};
use crate::infrastructure::config::Config;
use super::parser::MessageParser;
use super::middleware::{
    AdminMiddleware, Context, LoggingMiddleware, Middleware, MiddlewareChain, MiddlewareError, Next,
    ScopeMiddleware,
};

/// What happened to one inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Filtered out before any handler ran
    Ignored,
    /// A reply was sent to the chat
    Replied(String),
    /// Handled without a reply
    Handled,
}

/// Message dispatcher - routes events through middleware to handlers
pub struct MessageDispatcher {
    parser: MessageParser,
    middleware: Vec<Arc<dyn Middleware>>,
    commands: CommandService,
    membership: MembershipService,
    bot: Arc<dyn Bot>,
}

impl MessageDispatcher {
    pub fn new(
        config: &Config,
        bot: Arc<dyn Bot>,
        commands: CommandService,
        membership: MembershipService,
    ) -> Self {
        let middleware = MiddlewareChain::new()
            .add(LoggingMiddleware)
            .add(ScopeMiddleware::new(config.group.id.clone()))
            .add(AdminMiddleware::new(&config.admin.phone))
            .build();

        Self {
            parser: MessageParser::new(),
            middleware,
            commands,
            membership,
            bot,
        }
    }

    pub fn membership(&self) -> &MembershipService {
        &self.membership
    }

    /// Process one inbound event to completion
    pub async fn dispatch(&self, event: ChatEvent) -> Result<Outcome, BotError> {
        let ctx = match Next::new(self.middleware.clone()).run(Context::new(event)) {
            Ok(ctx) => ctx,
            Err(MiddlewareError::Ignored(_)) => return Ok(Outcome::Ignored),
        };

        match &ctx.event {
            ChatEvent::Message(message) => self.handle_message(message, ctx.is_admin).await,
            ChatEvent::GroupJoin(membership) => {
                self.membership.on_join(membership).await?;
                Ok(Outcome::Handled)
            }
            ChatEvent::GroupLeave(membership) => {
                self.membership.on_leave(membership).await?;
                Ok(Outcome::Handled)
            }
        }
    }

    async fn handle_message(&self, message: &Message, is_admin: bool) -> Result<Outcome, BotError> {
        let text = match &message.content {
            Content::Text(text) => text.as_str(),
            Content::Command { .. } | Content::Empty => return Ok(Outcome::Handled),
        };

        let reply = match self.parser.parse(text) {
            Content::Command { name, args } => {
                let caller = Caller::new(message.sender.id.clone(), is_admin);
                tracing::debug!("Command !{} from {} (admin: {})", name, caller.phone, is_admin);
                Some(self.commands.handle(&name, &args, &caller).await)
            }
            Content::Text(text) => self.auto_respond(&text),
            Content::Empty => None,
        };

        match reply {
            Some(reply) => {
                self.bot.send_message(&message.chat_id, &reply).await.map_err(|e| {
                    tracing::error!("Failed to send reply to {}: {}", message.chat_id, e);
                    e
                })?;
                Ok(Outcome::Replied(reply))
            }
            None => Ok(Outcome::Handled),
        }
    }

    /// Hook for replies to plain chat text. Stays quiet for now.
    fn auto_respond(&self, _text: &str) -> Option<String> {
        None
    }
}
