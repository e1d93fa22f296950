//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command handlers, membership events, reminders, backups
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing, middleware, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
