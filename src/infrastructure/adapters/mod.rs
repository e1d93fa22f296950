//! Platform adapters

pub mod console;
pub mod telegram;

pub use console::{event_from_line, ConsoleAdapter};
pub use telegram::TelegramAdapter;
