pub mod bookmarks;
pub mod error;
pub mod middleware;
pub mod reminders;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use remindmark_db::Database;
use remindmark_scheduler::{CachedUserDirectory, Notifier};

use crate::error::ApiError;

/// Most bookmarks a single user may keep.
pub const MAX_BOOKMARKS_PER_USER: usize = 100;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub directory: Arc<CachedUserDirectory>,
    pub notifier: Arc<dyn Notifier>,
    pub jwt_secret: String,
}

/// All command routes. Everything except `/health` requires a bearer token.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/bookmarks",
            post(bookmarks::create_bookmark).get(bookmarks::list_bookmarks),
        )
        .route(
            "/bookmarks/{id}",
            get(bookmarks::get_bookmark).delete(bookmarks::delete_bookmark),
        )
        .route(
            "/bookmarks/{id}/reminder",
            put(reminders::set_reminder).delete(reminders::clear_reminder),
        )
        .route("/test", post(reminders::send_test))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(protected)
}

pub async fn health() -> &'static str {
    "ok"
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> remindmark_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    let value = tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| ApiError::Internal(format!("spawn_blocking join error: {}", e)))??;
    Ok(value)
}
