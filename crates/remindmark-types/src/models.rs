use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Guild scope used for bookmarks of direct-message messages.
pub const DM_GUILD_ID: &str = "";

/// A saved reference to a chat message, optionally with a pending reminder.
///
/// The natural key is `(guild_id, channel_id, message_id, user_id)`; `id` is
/// the surrogate handle shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub guild_id: String,
    pub channel_id: String,
    pub message_id: String,
    pub user_id: String,
    pub author_id: String,
    pub content: String,
    /// Creation time of the bookmarked message.
    pub timestamp: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Link back to the bookmarked message. DMs use the `@me` scope.
    pub fn message_link(&self) -> String {
        message_link(&self.guild_id, &self.channel_id, &self.message_id)
    }
}

pub fn message_link(guild_id: &str, channel_id: &str, message_id: &str) -> String {
    let guild = if guild_id == DM_GUILD_ID { "@me" } else { guild_id };
    format!("https://discord.com/channels/{}/{}/{}", guild, channel_id, message_id)
}

/// Display information for a platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}
