use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events sent over the WebSocket gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GatewayEvent {
    /// Server confirms the connection is authenticated
    Ready { user_id: String, username: String },

    /// A direct message from the bot to the connected user
    DirectMessage(Notification),
}

/// A rendered message delivered to a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<BookmarkEmbed>,
}

impl Notification {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embed: None,
        }
    }
}

/// Card-style rendering of a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkEmbed {
    pub author_name: String,
    pub author_avatar_url: Option<String>,
    pub description: String,
    /// `#<bookmark id>`
    pub footer: String,
    pub timestamp: DateTime<Utc>,
}
