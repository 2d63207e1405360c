use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Bookmark DB: running migration v1 (initial schema)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE bookmarks (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id    TEXT NOT NULL DEFAULT '',
                channel_id  TEXT NOT NULL,
                message_id  TEXT NOT NULL,
                user_id     TEXT NOT NULL,
                author_id   TEXT NOT NULL,
                content     TEXT NOT NULL,
                timestamp   TEXT NOT NULL,
                due_at      TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                UNIQUE(guild_id, channel_id, message_id, user_id)
            );

            CREATE INDEX idx_bookmarks_user
                ON bookmarks(user_id, id);

            CREATE INDEX idx_bookmarks_due
                ON bookmarks(due_at) WHERE due_at IS NOT NULL;

            CREATE TABLE user_profiles (
                user_id       TEXT PRIMARY KEY,
                display_name  TEXT NOT NULL,
                avatar_url    TEXT,
                updated_at    TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
