//! SQLite persistence for members and events

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

use crate::application::errors::StorageError;
use crate::domain::entities::{Event, GroupCount, Member, NewEvent, Registration, UpsertOutcome};
use crate::domain::traits::Store;

const MEMBER_COLUMNS: &str =
    "phone_number, name, genre, role, join_date, participation_score, is_active";
const EVENT_COLUMNS: &str =
    "id, name, date, time, description, created_by, attendees, created_at";

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file. `:memory:` gives a private in-memory database.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        let db = Self { conn: Mutex::new(conn) };
        db.with_conn(|conn| init_tables(conn))?;
        Ok(db)
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        f(&mut conn)
    }
}

fn init_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            phone_number TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            genre TEXT NOT NULL,
            role TEXT NOT NULL,
            join_date TEXT NOT NULL,
            participation_score INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            description TEXT,
            created_by TEXT NOT NULL,
            attendees TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_members_join_date ON members(join_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at)",
        [],
    )?;

    Ok(())
}

/// Current time at the precision the database keeps
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width UTC so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        phone_number: row.get(0)?,
        name: row.get(1)?,
        genre: row.get(2)?,
        role: row.get(3)?,
        join_date: parse_timestamp(4, row.get(4)?)?,
        participation_score: row.get(5)?,
        is_active: row.get(6)?,
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let attendees: String = row.get(6)?;
    let attendees = serde_json::from_str(&attendees)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        description: row.get(4)?,
        created_by: row.get(5)?,
        attendees,
        created_at: parse_timestamp(7, row.get(7)?)?,
    })
}

fn query_members(conn: &Connection, filter_and_order: &str) -> Result<Vec<Member>, StorageError> {
    let sql = format!("SELECT {} FROM members {}", MEMBER_COLUMNS, filter_and_order);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], member_from_row)?;

    let mut members = Vec::new();
    for member in rows {
        members.push(member?);
    }
    Ok(members)
}

fn count(conn: &Connection, sql: &str) -> Result<u64, StorageError> {
    let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

/// Group members by `column`, largest groups first. Ties keep first-registration order.
fn group_counts(conn: &Connection, column: &str, limit: usize) -> Result<Vec<GroupCount>, StorageError> {
    let sql = format!(
        "SELECT {col}, COUNT(*) AS n FROM members GROUP BY {col} ORDER BY n DESC, MIN(id) ASC LIMIT ?1",
        col = column
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([limit as i64], |row| {
        let n: i64 = row.get(1)?;
        Ok(GroupCount {
            key: row.get(0)?,
            count: n.max(0) as u64,
        })
    })?;

    let mut groups = Vec::new();
    for group in rows {
        groups.push(group?);
    }
    Ok(groups)
}

#[async_trait]
impl Store for Database {
    async fn find_member(&self, phone: &str) -> Result<Option<Member>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM members WHERE phone_number = ?1", MEMBER_COLUMNS);
            let member = conn.query_row(&sql, [phone], member_from_row).optional()?;
            Ok(member)
        })
    }

    async fn upsert_member(&self, phone: &str, registration: &Registration) -> Result<UpsertOutcome, StorageError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let existed: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM members WHERE phone_number = ?1)",
                [phone],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO members (phone_number, name, genre, role, join_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(phone_number) DO UPDATE SET
                    name = excluded.name,
                    genre = excluded.genre,
                    role = excluded.role",
                params![
                    phone,
                    registration.name,
                    registration.genre,
                    registration.role,
                    format_timestamp(&now()),
                ],
            )?;
            tx.commit()?;

            Ok(if existed {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            })
        })
    }

    async fn active_members(&self) -> Result<Vec<Member>, StorageError> {
        self.with_conn(|conn| {
            query_members(conn, "WHERE is_active = 1 ORDER BY join_date DESC, id DESC")
        })
    }

    async fn all_members(&self) -> Result<Vec<Member>, StorageError> {
        self.with_conn(|conn| query_members(conn, "ORDER BY join_date ASC, id ASC"))
    }

    async fn count_members(&self) -> Result<u64, StorageError> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM members"))
    }

    async fn count_active_members(&self) -> Result<u64, StorageError> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM members WHERE is_active = 1"))
    }

    async fn top_genres(&self, limit: usize) -> Result<Vec<GroupCount>, StorageError> {
        self.with_conn(|conn| group_counts(conn, "genre", limit))
    }

    async fn top_roles(&self, limit: usize) -> Result<Vec<GroupCount>, StorageError> {
        self.with_conn(|conn| group_counts(conn, "role", limit))
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<Event, StorageError> {
        self.with_conn(|conn| {
            let created_at = now();
            conn.execute(
                "INSERT INTO events (name, date, time, description, created_by, attendees, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, '[]', ?6)",
                params![
                    event.name,
                    event.date,
                    event.time,
                    event.description,
                    event.created_by,
                    format_timestamp(&created_at),
                ],
            )?;

            Ok(Event {
                id: conn.last_insert_rowid(),
                name: event.name.clone(),
                date: event.date.clone(),
                time: event.time.clone(),
                description: event.description.clone(),
                created_by: event.created_by.clone(),
                attendees: Vec::new(),
                created_at,
            })
        })
    }

    async fn recent_events(&self, limit: usize) -> Result<Vec<Event>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM events ORDER BY created_at DESC, id DESC LIMIT ?1",
                EVENT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([limit as i64], event_from_row)?;

            let mut events = Vec::new();
            for event in rows {
                events.push(event?);
            }
            Ok(events)
        })
    }

    async fn all_events(&self) -> Result<Vec<Event>, StorageError> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM events ORDER BY created_at ASC, id ASC", EVENT_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], event_from_row)?;

            let mut events = Vec::new();
            for event in rows {
                events.push(event?);
            }
            Ok(events)
        })
    }

    async fn count_events(&self) -> Result<u64, StorageError> {
        self.with_conn(|conn| count(conn, "SELECT COUNT(*) FROM events"))
    }
}
