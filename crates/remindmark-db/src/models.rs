//! Row mapping and write parameters for the bookmark store.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

use remindmark_types::models::{Bookmark, UserProfile};

use crate::error::{Result, StoreError};

/// Input of a create-or-update. The natural key is
/// `(guild_id, channel_id, message_id, user_id)`.
#[derive(Debug, Clone, Default)]
pub struct UpsertBookmark {
    /// Empty for direct messages.
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub author_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
}

impl UpsertBookmark {
    pub(crate) fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.channel_id.is_empty() {
            return Err(StoreError::Validation("channel id is empty".into()));
        }
        if self.message_id.is_empty() {
            return Err(StoreError::Validation("message id is empty".into()));
        }
        if self.user_id.is_empty() {
            return Err(StoreError::Validation("user id is empty".into()));
        }
        if self.timestamp == DateTime::<Utc>::default() {
            return Err(StoreError::Validation("timestamp is not set".into()));
        }
        if let Some(due_at) = self.due_at {
            ensure_future(due_at, now)?;
        }
        Ok(())
    }
}

/// Result of a create-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub id: i64,
    pub created: bool,
}

pub(crate) fn ensure_future(due_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if due_at <= now {
        return Err(StoreError::Validation(format!(
            "reminder time {} is not in the future",
            encode_time(due_at)
        )));
    }
    Ok(())
}

pub(crate) const BOOKMARK_COLUMNS: &str = "id, guild_id, channel_id, message_id, user_id, \
     author_id, content, timestamp, due_at, created_at, updated_at";

/// Fixed-width UTC text, so string order equals time order in SQL.
pub(crate) fn encode_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    decode_time(idx, &raw)
}

pub(crate) fn bookmark_from_row(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    let due_at = match row.get::<_, Option<String>>(8)? {
        Some(raw) => Some(decode_time(8, &raw)?),
        None => None,
    };
    Ok(Bookmark {
        id: row.get(0)?,
        guild_id: row.get(1)?,
        channel_id: row.get(2)?,
        message_id: row.get(3)?,
        user_id: row.get(4)?,
        author_id: row.get(5)?,
        content: row.get(6)?,
        timestamp: get_time(row, 7)?,
        due_at,
        created_at: get_time(row, 9)?,
        updated_at: get_time(row, 10)?,
    })
}

pub(crate) fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        avatar_url: row.get(2)?,
    })
}
