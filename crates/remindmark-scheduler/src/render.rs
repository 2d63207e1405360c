use std::time::Duration;

use remindmark_types::events::{BookmarkEmbed, Notification};
use remindmark_types::models::{Bookmark, UserProfile};

/// The direct message sent when a bookmark's reminder is due.
pub fn reminder_notification(bookmark: &Bookmark, author: &UserProfile) -> Notification {
    Notification {
        content: format!(
            "You asked me to remind you about this message from {}:",
            author.display_name
        ),
        embed: Some(bookmark_embed(bookmark, author)),
    }
}

pub fn bookmark_embed(bookmark: &Bookmark, author: &UserProfile) -> BookmarkEmbed {
    BookmarkEmbed {
        author_name: author.display_name.clone(),
        author_avatar_url: author.avatar_url.clone(),
        description: format!("{}\n\n{}", bookmark.content, bookmark.message_link()),
        footer: format!("#{}", bookmark.id),
        timestamp: bookmark.timestamp,
    }
}

/// Coarse human wording for a duration, e.g. "10 seconds", "3 hours".
pub fn human_duration(d: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const WEEK: u64 = 7 * DAY;

    let secs = d.as_secs();
    let (n, unit) = match secs {
        0 => return "less than a second".to_string(),
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s => (s / WEEK, "week"),
    };
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
