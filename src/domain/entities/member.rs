use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered club member, keyed by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub phone_number: String,
    pub name: String,
    pub genre: String,
    pub role: String,
    pub join_date: DateTime<Utc>,
    pub participation_score: i64,
    pub is_active: bool,
}

impl Member {
    pub fn level(&self) -> MemberLevel {
        MemberLevel::from_score(self.participation_score)
    }
}

/// The fields a `!register` call replaces. Everything else on [`Member`]
/// survives a re-registration untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub genre: String,
    pub role: String,
}

/// Result of an upsert keyed on phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// One row of a group-by-count aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

/// Display label bucketed from a participation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberLevel {
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

impl MemberLevel {
    pub fn from_score(score: i64) -> Self {
        match score {
            s if s < 10 => MemberLevel::Beginner,
            s if s < 50 => MemberLevel::Intermediate,
            s if s < 100 => MemberLevel::Advanced,
            _ => MemberLevel::Master,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberLevel::Beginner => "🌱 Beginner",
            MemberLevel::Intermediate => "🎵 Intermediate",
            MemberLevel::Advanced => "🎸 Advanced",
            MemberLevel::Master => "🏆 Master",
        }
    }
}

impl fmt::Display for MemberLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(MemberLevel::from_score(0), MemberLevel::Beginner);
        assert_eq!(MemberLevel::from_score(9), MemberLevel::Beginner);
        assert_eq!(MemberLevel::from_score(10), MemberLevel::Intermediate);
        assert_eq!(MemberLevel::from_score(49), MemberLevel::Intermediate);
        assert_eq!(MemberLevel::from_score(50), MemberLevel::Advanced);
        assert_eq!(MemberLevel::from_score(100), MemberLevel::Master);
    }

    #[test]
    fn level_is_monotonic_in_score() {
        let mut previous = MemberLevel::from_score(-5);
        for score in -5..250 {
            let level = MemberLevel::from_score(score);
            assert!(level >= previous, "level dropped at score {}", score);
            previous = level;
        }
    }
}
