//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod event;
pub mod member;
pub mod message;
pub mod sender;

pub use command::{Command, CommandKind};
pub use event::{Event, NewEvent};
pub use member::{GroupCount, Member, MemberLevel, Registration, UpsertOutcome};
pub use message::{ChatEvent, Content, Membership, Message};
pub use sender::{normalize_phone, Sender};
