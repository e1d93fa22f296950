//! Music club group bot
//!
//! Layers follow the usual split: `domain` holds entities and the seams
//! (`Bot`, `Store`), `application` the command and membership services,
//! `infrastructure` config, SQLite, backups and chat adapters.

pub mod domain;
pub mod application;
pub mod infrastructure;

#[cfg(test)]
pub mod test_support;
