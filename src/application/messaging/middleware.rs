//! Middleware system for the pre-dispatch pipeline

use std::sync::Arc;
use crate::domain::entities::{normalize_phone, ChatEvent};

/// Context passed through middleware chain
#[derive(Debug, Clone)]
pub struct Context {
    pub event: ChatEvent,
    pub chat_id: String,
    pub user_id: Option<String>,
    pub is_admin: bool,
}

impl Context {
    pub fn new(event: ChatEvent) -> Self {
        let chat_id = event.chat_id().to_string();
        let user_id = match &event {
            ChatEvent::Message(m) => Some(m.sender.id.clone()),
            ChatEvent::GroupJoin(m) | ChatEvent::GroupLeave(m) => Some(m.participant.id.clone()),
        };

        Self {
            event,
            chat_id,
            user_id,
            is_admin: false,
        }
    }
}

/// Middleware trait - processors that can intercept and modify event handling
pub trait Middleware: Send + Sync {
    /// Process an event and optionally modify the context
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult;
}

/// Result of middleware processing
pub type MiddlewareResult = Result<Context, MiddlewareError>;

/// Middleware errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiddlewareError {
    /// Drop the event silently
    Ignored(String),
}

impl std::fmt::Display for MiddlewareError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiddlewareError::Ignored(msg) => write!(f, "Ignored: {}", msg),
        }
    }
}

impl std::error::Error for MiddlewareError {}

/// Next middleware in chain
#[derive(Clone)]
pub struct Next {
    remaining: Arc<Vec<Arc<dyn Middleware>>>,
}

impl Next {
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            remaining: Arc::new(middlewares),
        }
    }

    /// Process remaining middleware
    pub fn run(self, ctx: Context) -> MiddlewareResult {
        if let Some(first) = self.remaining.first() {
            let remaining = self.remaining[1..].to_vec();
            let next = Next::new(remaining);
            first.process(ctx, next)
        } else {
            // No more middleware, processing complete
            Ok(ctx)
        }
    }
}

/// Middleware chain builder
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    pub fn add<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Vec<Arc<dyn Middleware>> {
        self.middlewares
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops events from any chat but the target group, and the bot's own messages
pub struct ScopeMiddleware {
    group_id: String,
}

impl ScopeMiddleware {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
        }
    }
}

impl Middleware for ScopeMiddleware {
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult {
        if let ChatEvent::Message(message) = &ctx.event {
            if message.sender.is_me {
                return Err(MiddlewareError::Ignored("own message".to_string()));
            }
        }

        if ctx.chat_id != self.group_id {
            return Err(MiddlewareError::Ignored(format!("outside target group: {}", ctx.chat_id)));
        }

        next.run(ctx)
    }
}

/// Marks the context as admin when the sender matches the configured admin phone
pub struct AdminMiddleware {
    admin_phone: String,
}

impl AdminMiddleware {
    pub fn new(admin_phone: &str) -> Self {
        Self {
            admin_phone: normalize_phone(admin_phone),
        }
    }
}

impl Middleware for AdminMiddleware {
    fn process(&self, mut ctx: Context, next: Next) -> MiddlewareResult {
        ctx.is_admin = ctx
            .user_id
            .as_deref()
            .map(|id| normalize_phone(id) == self.admin_phone)
            .unwrap_or(false);
        next.run(ctx)
    }
}

/// Logging middleware for debugging
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn process(&self, ctx: Context, next: Next) -> MiddlewareResult {
        let preview = match &ctx.event {
            ChatEvent::Message(m) => m
                .content
                .text()
                .map(|s| s.chars().take(50).collect::<String>())
                .unwrap_or_else(|| "[command]".to_string()),
            other => format!("[{}]", other.kind()),
        };

        tracing::debug!("[{}] {:?}: {}", ctx.chat_id, ctx.user_id, preview);

        let chat_id = ctx.chat_id.clone();
        let result = next.run(ctx);

        if let Err(e) = &result {
            tracing::trace!("[{}] {}", chat_id, e);
        }

        result
    }
}
