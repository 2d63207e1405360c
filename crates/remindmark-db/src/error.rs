/// Errors surfaced by the bookmark store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed input. A caller bug, never worth retrying.
    #[error("validation error: {0}")]
    Validation(String),

    /// No bookmark with this id.
    #[error("bookmark #{0} not found")]
    NotFound(i64),

    /// The user already owns the maximum number of bookmarks.
    #[error("user {user_id} reached the maximum of {max} bookmarks")]
    LimitReached { user_id: String, max: usize },

    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
