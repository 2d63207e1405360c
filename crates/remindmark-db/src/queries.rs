use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use tracing::info;

use remindmark_types::models::{Bookmark, UserProfile};

use crate::Database;
use crate::error::{Result, StoreError};
use crate::models::{
    BOOKMARK_COLUMNS, UpsertBookmark, UpsertOutcome, bookmark_from_row, encode_time,
    ensure_future, profile_from_row,
};

impl Database {
    // -- Bookmarks --

    /// Create the bookmark for this natural key, or refresh the existing one.
    ///
    /// On update, `author_id`, `content`, `timestamp`, `due_at` and
    /// `updated_at` are overwritten; `id` and `created_at` are kept.
    pub fn create_or_update_bookmark(&self, arg: &UpsertBookmark) -> Result<UpsertOutcome> {
        self.upsert_bookmark(arg, None)
    }

    /// Same as [`Database::create_or_update_bookmark`], but refuses to insert
    /// a new row once the user owns `max` bookmarks. The count and the insert
    /// share one transaction, so concurrent creators cannot overshoot.
    /// Updating an existing bookmark is always allowed.
    pub fn create_or_update_bookmark_capped(
        &self,
        arg: &UpsertBookmark,
        max: usize,
    ) -> Result<UpsertOutcome> {
        self.upsert_bookmark(arg, Some(max))
    }

    fn upsert_bookmark(&self, arg: &UpsertBookmark, max: Option<usize>) -> Result<UpsertOutcome> {
        let now = Utc::now();
        arg.validate(now)?;

        let outcome = self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let now_text = encode_time(now);
            let due_at = arg.due_at.map(encode_time);

            // Existence on the natural key decides insert vs update
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM bookmarks
                     WHERE guild_id = ?1 AND channel_id = ?2 AND message_id = ?3 AND user_id = ?4",
                    params![arg.guild_id, arg.channel_id, arg.message_id, arg.user_id],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match existing {
                Some(id) => {
                    tx.execute(
                        "UPDATE bookmarks
                         SET author_id = ?2, content = ?3, timestamp = ?4, due_at = ?5, updated_at = ?6
                         WHERE id = ?1",
                        params![
                            id,
                            arg.author_id,
                            arg.content,
                            encode_time(arg.timestamp),
                            due_at,
                            now_text
                        ],
                    )?;
                    UpsertOutcome { id, created: false }
                }
                None => {
                    if let Some(max) = max {
                        if count_for_user(&tx, &arg.user_id)? >= max {
                            return Err(StoreError::LimitReached {
                                user_id: arg.user_id.clone(),
                                max,
                            });
                        }
                    }
                    tx.execute(
                        "INSERT INTO bookmarks
                         (guild_id, channel_id, message_id, user_id, author_id, content,
                          timestamp, due_at, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                        params![
                            arg.guild_id,
                            arg.channel_id,
                            arg.message_id,
                            arg.user_id,
                            arg.author_id,
                            arg.content,
                            encode_time(arg.timestamp),
                            due_at,
                            now_text
                        ],
                    )?;
                    UpsertOutcome {
                        id: tx.last_insert_rowid(),
                        created: true,
                    }
                }
            };

            tx.commit()?;
            Ok(outcome)
        })?;

        info!(
            id = outcome.id,
            created = outcome.created,
            user = %arg.user_id,
            "Updated bookmark"
        );
        Ok(outcome)
    }

    pub fn get_bookmark(&self, id: i64) -> Result<Bookmark> {
        self.with_conn(|conn| query_bookmark(conn, id))?
            .ok_or(StoreError::NotFound(id))
    }

    /// All bookmarks of a user, ordered by id.
    pub fn list_bookmarks_for_user(&self, user_id: &str) -> Result<Vec<Bookmark>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM bookmarks WHERE user_id = ?1 ORDER BY id",
                BOOKMARK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], bookmark_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_bookmarks_for_user(&self, user_id: &str) -> Result<usize> {
        self.with_conn(|conn| count_for_user(conn, user_id))
    }

    /// Bookmarks whose reminder is set and at or before `now`, oldest due
    /// first. Does not claim the rows.
    pub fn list_due_bookmarks(&self, now: DateTime<Utc>) -> Result<Vec<Bookmark>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM bookmarks
                 WHERE due_at IS NOT NULL AND due_at <= ?1
                 ORDER BY due_at, id",
                BOOKMARK_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([encode_time(now)], bookmark_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Schedule a reminder, or remove it with `None`. A new reminder must be
    /// in the future.
    pub fn set_reminder(&self, id: i64, due_at: Option<DateTime<Utc>>) -> Result<()> {
        let now = Utc::now();
        if let Some(due_at) = due_at {
            ensure_future(due_at, now)?;
        }

        let changed = self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE bookmarks SET due_at = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, due_at.map(encode_time), encode_time(now)],
            )?;
            Ok(n)
        })?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        if due_at.is_some() {
            info!(id, "Reminder set");
        } else {
            info!(id, "Reminder removed");
        }
        Ok(())
    }

    pub fn clear_reminder(&self, id: i64) -> Result<()> {
        self.set_reminder(id, None)
    }

    /// Clear a reminder only if it is still set to `delivered_due`.
    ///
    /// Returns `false` when the reminder was rescheduled or removed since it
    /// was listed; the newer state is left untouched.
    pub fn clear_delivered_reminder(&self, id: i64, delivered_due: DateTime<Utc>) -> Result<bool> {
        let cleared = self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE bookmarks SET due_at = NULL, updated_at = ?3 \
                 WHERE id = ?1 AND due_at = ?2",
                params![id, encode_time(delivered_due), encode_time(Utc::now())],
            )?;
            if n > 0 {
                return Ok(true);
            }
            match query_bookmark(conn, id)? {
                Some(_) => Ok(false),
                None => Err(StoreError::NotFound(id)),
            }
        })?;
        if cleared {
            info!(id, "Reminder cleared after delivery");
        }
        Ok(cleared)
    }

    pub fn delete_bookmark(&self, id: i64) -> Result<()> {
        let deleted = self.with_conn_mut(|conn| {
            Ok(conn.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?)
        })?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(id, "Bookmark deleted");
        Ok(())
    }

    /// Remove every bookmark. Returns how many were deleted.
    pub fn delete_all_bookmarks(&self) -> Result<usize> {
        let deleted = self.with_conn_mut(|conn| Ok(conn.execute("DELETE FROM bookmarks", [])?))?;
        info!(deleted, "All bookmarks deleted");
        Ok(deleted)
    }

    // -- User profiles --

    pub fn upsert_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO user_profiles (user_id, display_name, avatar_url, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                    display_name = excluded.display_name,
                    avatar_url = excluded.avatar_url,
                    updated_at = excluded.updated_at",
                params![
                    profile.user_id,
                    profile.display_name,
                    profile.avatar_url,
                    encode_time(Utc::now())
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT user_id, display_name, avatar_url FROM user_profiles WHERE user_id = ?1",
                [user_id],
                profile_from_row,
            )
            .optional()
        })
    }
}

fn query_bookmark(conn: &Connection, id: i64) -> Result<Option<Bookmark>> {
    let sql = format!("SELECT {} FROM bookmarks WHERE id = ?1", BOOKMARK_COLUMNS);
    conn.query_row(&sql, [id], bookmark_from_row).optional()
}

fn count_for_user(conn: &Connection, user_id: &str) -> Result<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookmarks WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_db;
    use chrono::Duration;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static UNIQUE: AtomicUsize = AtomicUsize::new(0);

    fn unique_id() -> String {
        format!("ID-{}", UNIQUE.fetch_add(1, Ordering::Relaxed))
    }

    /// Fill blank fields of `arg` with unique values and store it.
    fn create_bookmark(db: &Database, arg: UpsertBookmark) -> Bookmark {
        let arg = UpsertBookmark {
            guild_id: if arg.guild_id.is_empty() { unique_id() } else { arg.guild_id },
            channel_id: if arg.channel_id.is_empty() { unique_id() } else { arg.channel_id },
            message_id: if arg.message_id.is_empty() { unique_id() } else { arg.message_id },
            user_id: if arg.user_id.is_empty() { unique_id() } else { arg.user_id },
            author_id: if arg.author_id.is_empty() { unique_id() } else { arg.author_id },
            content: if arg.content.is_empty() { "Lorem ipsum".into() } else { arg.content },
            timestamp: if arg.timestamp == DateTime::<Utc>::default() {
                Utc::now()
            } else {
                arg.timestamp
            },
            due_at: arg.due_at,
        };
        let outcome = db.create_or_update_bookmark(&arg).unwrap();
        db.get_bookmark(outcome.id).unwrap()
    }

    fn for_user(user_id: &str) -> UpsertBookmark {
        UpsertBookmark {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    fn ids(bookmarks: &[Bookmark]) -> Vec<i64> {
        bookmarks.iter().map(|b| b.id).collect()
    }

    #[test]
    fn create_then_get_returns_submitted_fields() {
        let (_dir, db) = test_db();
        let timestamp = Utc::now();
        let due_at = timestamp + Duration::hours(3);

        let outcome = db
            .create_or_update_bookmark(&UpsertBookmark {
                guild_id: "GuildID".into(),
                channel_id: "ChannelID".into(),
                message_id: "MessageID".into(),
                user_id: "UserID".into(),
                author_id: "AuthorID".into(),
                content: "Content".into(),
                timestamp,
                due_at: Some(due_at),
            })
            .unwrap();
        assert!(outcome.created);

        let bm = db.get_bookmark(outcome.id).unwrap();
        assert_eq!(bm.guild_id, "GuildID");
        assert_eq!(bm.channel_id, "ChannelID");
        assert_eq!(bm.message_id, "MessageID");
        assert_eq!(bm.user_id, "UserID");
        assert_eq!(bm.author_id, "AuthorID");
        assert_eq!(bm.content, "Content");
        assert_eq!(bm.timestamp, timestamp);
        assert_eq!(bm.due_at, Some(due_at));
        assert_eq!(bm.created_at, bm.updated_at);
    }

    #[test]
    fn second_upsert_for_same_key_updates_in_place() {
        let (_dir, db) = test_db();
        let key = UpsertBookmark {
            guild_id: "G".into(),
            channel_id: "C".into(),
            message_id: "M".into(),
            user_id: "U".into(),
            author_id: "A".into(),
            content: "hello".into(),
            timestamp: Utc::now(),
            due_at: None,
        };

        let first = db.create_or_update_bookmark(&key).unwrap();
        assert_eq!(first, UpsertOutcome { id: 1, created: true });
        let before = db.get_bookmark(1).unwrap();

        let due_at = Utc::now() + Duration::hours(1);
        let second = db
            .create_or_update_bookmark(&UpsertBookmark {
                content: "hello v2".into(),
                due_at: Some(due_at),
                ..key.clone()
            })
            .unwrap();
        assert_eq!(second, UpsertOutcome { id: 1, created: false });

        let after = db.get_bookmark(1).unwrap();
        assert_eq!(after.content, "hello v2");
        assert_eq!(after.due_at, Some(due_at));
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(db.count_bookmarks_for_user("U").unwrap(), 1);
    }

    #[test]
    fn same_message_bookmarked_by_two_users_gives_two_rows() {
        let (_dir, db) = test_db();
        let a = create_bookmark(&db, UpsertBookmark {
            guild_id: "G".into(),
            channel_id: "C".into(),
            message_id: "M".into(),
            user_id: "alice".into(),
            ..Default::default()
        });
        let b = create_bookmark(&db, UpsertBookmark {
            guild_id: "G".into(),
            channel_id: "C".into(),
            message_id: "M".into(),
            user_id: "bob".into(),
            ..Default::default()
        });
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn direct_message_scope_is_a_distinct_key() {
        let (_dir, db) = test_db();
        let dm = UpsertBookmark {
            guild_id: String::new(),
            channel_id: "C".into(),
            message_id: "M".into(),
            user_id: "U".into(),
            timestamp: Utc::now(),
            ..Default::default()
        };
        let first = db.create_or_update_bookmark(&dm).unwrap();
        let again = db.create_or_update_bookmark(&dm).unwrap();
        assert!(first.created);
        assert_eq!(again, UpsertOutcome { id: first.id, created: false });

        let in_guild = db
            .create_or_update_bookmark(&UpsertBookmark { guild_id: "G".into(), ..dm })
            .unwrap();
        assert!(in_guild.created);
        assert_eq!(db.get_bookmark(first.id).unwrap().guild_id, "");
    }

    #[test]
    fn invalid_upserts_are_rejected_without_writing() {
        let (_dir, db) = test_db();
        let err = db
            .create_or_update_bookmark(&UpsertBookmark {
                channel_id: "C".into(),
                user_id: "U".into(),
                timestamp: Utc::now(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = db
            .create_or_update_bookmark(&UpsertBookmark {
                channel_id: "C".into(),
                message_id: "M".into(),
                user_id: "U".into(),
                timestamp: Utc::now(),
                due_at: Some(Utc::now() - Duration::minutes(1)),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert_eq!(db.count_bookmarks_for_user("U").unwrap(), 0);
    }

    #[test]
    fn lists_bookmarks_of_one_user_in_id_order() {
        let (_dir, db) = test_db();
        let bm1 = create_bookmark(&db, for_user("abc123"));
        create_bookmark(&db, UpsertBookmark::default());
        let bm2 = create_bookmark(&db, for_user("abc123"));

        let got = db.list_bookmarks_for_user("abc123").unwrap();
        assert_eq!(ids(&got), vec![bm1.id, bm2.id]);
        assert!(db.list_bookmarks_for_user("nobody").unwrap().is_empty());
    }

    #[test]
    fn count_tracks_creates_and_deletes() {
        let (_dir, db) = test_db();
        assert_eq!(db.count_bookmarks_for_user("abc123").unwrap(), 0);

        let bm1 = create_bookmark(&db, for_user("abc123"));
        let bm2 = create_bookmark(&db, for_user("abc123"));
        create_bookmark(&db, UpsertBookmark::default());
        assert_eq!(db.count_bookmarks_for_user("abc123").unwrap(), 2);

        db.delete_bookmark(bm1.id).unwrap();
        assert_eq!(db.count_bookmarks_for_user("abc123").unwrap(), 1);
        db.delete_bookmark(bm2.id).unwrap();
        assert_eq!(db.count_bookmarks_for_user("abc123").unwrap(), 0);
    }

    #[test]
    fn list_due_returns_exactly_the_due_set() {
        let (_dir, db) = test_db();
        let now = Utc::now();
        let soon = create_bookmark(&db, UpsertBookmark {
            due_at: Some(now + Duration::minutes(1)),
            ..Default::default()
        });
        let later = create_bookmark(&db, UpsertBookmark {
            due_at: Some(now + Duration::minutes(10)),
            ..Default::default()
        });
        create_bookmark(&db, UpsertBookmark::default());

        assert!(db.list_due_bookmarks(now).unwrap().is_empty());
        assert_eq!(
            ids(&db.list_due_bookmarks(now + Duration::minutes(1)).unwrap()),
            vec![soon.id]
        );
        assert_eq!(
            ids(&db.list_due_bookmarks(now + Duration::hours(1)).unwrap()),
            vec![soon.id, later.id]
        );
    }

    #[test]
    fn set_and_clear_reminder_controls_due_set() {
        let (_dir, db) = test_db();
        let bm = create_bookmark(&db, UpsertBookmark::default());
        let now = Utc::now();

        db.set_reminder(bm.id, Some(now + Duration::seconds(10))).unwrap();
        assert!(!ids(&db.list_due_bookmarks(now).unwrap()).contains(&bm.id));
        assert!(ids(&db.list_due_bookmarks(now + Duration::seconds(11)).unwrap()).contains(&bm.id));

        db.clear_reminder(bm.id).unwrap();
        assert!(db.get_bookmark(bm.id).unwrap().due_at.is_none());
        assert!(!ids(&db.list_due_bookmarks(now + Duration::seconds(11)).unwrap()).contains(&bm.id));
        assert!(!ids(&db.list_due_bookmarks(now + Duration::days(365)).unwrap()).contains(&bm.id));
    }

    #[test]
    fn delivered_clear_keeps_a_rescheduled_reminder() {
        let (_dir, db) = test_db();
        let bm = create_bookmark(&db, UpsertBookmark::default());
        let first = Utc::now() + Duration::seconds(10);
        db.set_reminder(bm.id, Some(first)).unwrap();

        let next = Utc::now() + Duration::hours(1);
        db.set_reminder(bm.id, Some(next)).unwrap();
        assert!(!db.clear_delivered_reminder(bm.id, first).unwrap());
        assert_eq!(db.get_bookmark(bm.id).unwrap().due_at, Some(next));

        assert!(db.clear_delivered_reminder(bm.id, next).unwrap());
        assert!(db.get_bookmark(bm.id).unwrap().due_at.is_none());

        // Already cleared
        assert!(!db.clear_delivered_reminder(bm.id, next).unwrap());

        db.delete_bookmark(bm.id).unwrap();
        assert!(matches!(
            db.clear_delivered_reminder(bm.id, next),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn set_reminder_rejects_past_instants() {
        let (_dir, db) = test_db();
        let bm = create_bookmark(&db, UpsertBookmark::default());
        let err = db
            .set_reminder(bm.id, Some(Utc::now() - Duration::seconds(1)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(db.get_bookmark(bm.id).unwrap().due_at.is_none());
    }

    #[test]
    fn operations_on_missing_ids_report_not_found() {
        let (_dir, db) = test_db();
        assert!(matches!(db.get_bookmark(42), Err(StoreError::NotFound(42))));
        assert!(matches!(db.delete_bookmark(42), Err(StoreError::NotFound(42))));
        assert!(matches!(db.clear_reminder(42), Err(StoreError::NotFound(42))));
        assert!(matches!(
            db.set_reminder(42, Some(Utc::now() + Duration::hours(1))),
            Err(StoreError::NotFound(42))
        ));
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let (_dir, db) = test_db();
        let first = create_bookmark(&db, UpsertBookmark::default());
        db.delete_bookmark(first.id).unwrap();
        assert!(matches!(db.get_bookmark(first.id), Err(StoreError::NotFound(_))));

        let second = create_bookmark(&db, UpsertBookmark::default());
        assert!(second.id > first.id);
    }

    #[test]
    fn delete_all_clears_every_row() {
        let (_dir, db) = test_db();
        create_bookmark(&db, UpsertBookmark::default());
        create_bookmark(&db, UpsertBookmark::default());
        assert_eq!(db.delete_all_bookmarks().unwrap(), 2);
        assert!(db.list_due_bookmarks(Utc::now() + Duration::days(1)).unwrap().is_empty());
    }

    #[test]
    fn capped_upsert_refuses_new_rows_at_the_ceiling() {
        let (_dir, db) = test_db();
        let base = UpsertBookmark {
            guild_id: "G".into(),
            channel_id: "C".into(),
            user_id: "U".into(),
            timestamp: Utc::now(),
            ..Default::default()
        };
        for n in 0..3 {
            let arg = UpsertBookmark { message_id: format!("M{n}"), ..base.clone() };
            assert!(db.create_or_update_bookmark_capped(&arg, 3).unwrap().created);
        }

        let overflow = UpsertBookmark { message_id: "M3".into(), ..base.clone() };
        let err = db.create_or_update_bookmark_capped(&overflow, 3).unwrap_err();
        assert!(matches!(err, StoreError::LimitReached { max: 3, .. }));
        assert_eq!(db.count_bookmarks_for_user("U").unwrap(), 3);

        // Refreshing an existing bookmark is still fine at the ceiling
        let refresh = UpsertBookmark {
            message_id: "M0".into(),
            content: "edited".into(),
            ..base
        };
        let outcome = db.create_or_update_bookmark_capped(&refresh, 3).unwrap();
        assert!(!outcome.created);
    }

    #[test]
    fn concurrent_upserts_of_one_key_keep_a_single_row() {
        let (_dir, db) = test_db();
        let db = Arc::new(db);
        let key = UpsertBookmark {
            guild_id: "G".into(),
            channel_id: "C".into(),
            message_id: "M".into(),
            user_id: "U".into(),
            timestamp: Utc::now(),
            ..Default::default()
        };

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let db = db.clone();
                let arg = UpsertBookmark { content: format!("v{n}"), ..key.clone() };
                std::thread::spawn(move || db.create_or_update_bookmark(&arg).unwrap())
            })
            .collect();
        let outcomes: Vec<UpsertOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(outcomes.iter().filter(|o| o.created).count(), 1);
        assert!(outcomes.iter().all(|o| o.id == outcomes[0].id));
        assert_eq!(db.count_bookmarks_for_user("U").unwrap(), 1);
    }

    #[test]
    fn user_profiles_upsert_and_read_back() {
        let (_dir, db) = test_db();
        assert!(db.get_user_profile("42").unwrap().is_none());

        let mut profile = UserProfile {
            user_id: "42".into(),
            display_name: "Erik".into(),
            avatar_url: None,
        };
        db.upsert_user_profile(&profile).unwrap();
        assert_eq!(db.get_user_profile("42").unwrap(), Some(profile.clone()));

        profile.display_name = "Erik N.".into();
        profile.avatar_url = Some("https://cdn.example/a.png".into());
        db.upsert_user_profile(&profile).unwrap();
        assert_eq!(db.get_user_profile("42").unwrap(), Some(profile));
    }
}
