//! Domain layer - Core club objects with no infrastructure dependencies
//! 
//! This layer contains:
//! - Entities: Member, Event, inbound chat events, parsed commands
//! - Traits: Abstractions for infrastructure (Bot, Store)

pub mod entities;
pub mod traits;
