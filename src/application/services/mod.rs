//! Application services - Business logic orchestration

pub mod backup_service;
pub mod command_service;
pub mod membership_service;
pub mod recommendations;
pub mod reminder;
pub mod replies;

pub use backup_service::{BackupReport, BackupService};
pub use command_service::{Caller, CommandService};
pub use membership_service::MembershipService;
pub use reminder::{ReminderHandle, ReminderScheduler};
