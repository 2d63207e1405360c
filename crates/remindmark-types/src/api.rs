use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Bookmark;

// -- JWT Claims --

/// JWT claims shared by the REST middleware and the WebSocket upgrade.
/// `sub` is the chat-platform user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub exp: usize,
}

// -- Bookmarks --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBookmarkRequest {
    /// Empty or absent for direct messages.
    #[serde(default)]
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub author_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds from now; absent or 0 means no reminder.
    #[serde(default)]
    pub remind_in_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookmarkResponse {
    pub id: i64,
    pub created: bool,
    pub due_at: Option<DateTime<Utc>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListBookmarksQuery {
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBookmarksResponse {
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub bookmarks: Vec<Bookmark>,
}

// -- Reminders --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetReminderRequest {
    /// Seconds from now; 0 removes the reminder.
    pub remind_in_secs: u64,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
