use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::warn;

use remindmark_db::UpsertBookmark;
use remindmark_types::api::{
    Claims, CreateBookmarkRequest, CreateBookmarkResponse, ListBookmarksQuery,
    ListBookmarksResponse, MessageResponse,
};
use remindmark_types::models::{Bookmark, UserProfile};

use crate::error::ApiError;
use crate::reminders::{due_in, reminder_phrase};
use crate::{AppState, MAX_BOOKMARKS_PER_USER, run_blocking};

const BOOKMARKS_PER_PAGE: usize = 10;

/// Bookmark a message, optionally with a reminder. Bookmarking the same
/// message again refreshes the existing bookmark.
pub async fn create_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<CreateBookmarkResponse>), ApiError> {
    let due_at = due_in(req.remind_in_secs)?;

    let author = req
        .author_name
        .filter(|n| !n.is_empty())
        .map(|name| UserProfile {
            user_id: req.author_id.clone(),
            display_name: name,
            avatar_url: req.author_avatar_url,
        });

    let arg = UpsertBookmark {
        guild_id: req.guild_id,
        channel_id: req.channel_id,
        message_id: req.message_id,
        user_id: claims.sub,
        author_id: req.author_id,
        content: req.content,
        timestamp: req.timestamp,
        due_at,
    };
    let outcome = run_blocking(&state, move |db| {
        db.create_or_update_bookmark_capped(&arg, MAX_BOOKMARKS_PER_USER)
    })
    .await?;

    // Keep the author's display info around for rendering the reminder
    if let Some(profile) = author {
        let author_id = profile.user_id.clone();
        if let Err(e) = state.directory.remember(profile).await {
            warn!("Failed to record author profile {}: {}", author_id, e);
        }
    }

    let verb = if outcome.created { "created" } else { "updated" };
    let mut message = format!("Bookmark #{} {}", outcome.id, verb);
    if req.remind_in_secs > 0 {
        message = format!("{}. {}", message, reminder_phrase(req.remind_in_secs));
    }

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(CreateBookmarkResponse {
            id: outcome.id,
            created: outcome.created,
            due_at,
            message,
        }),
    ))
}

/// The caller's bookmarks, oldest first, in pages of ten.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListBookmarksQuery>,
) -> Result<Json<ListBookmarksResponse>, ApiError> {
    if query.page == 0 {
        return Err(ApiError::BadRequest("pages start at 1".into()));
    }

    let user_id = claims.sub;
    let all = run_blocking(&state, move |db| db.list_bookmarks_for_user(&user_id)).await?;

    let total = all.len();
    let pages = total.div_ceil(BOOKMARKS_PER_PAGE);
    // Pages past the end are empty
    let offset = (query.page - 1).saturating_mul(BOOKMARKS_PER_PAGE);
    let bookmarks = all
        .into_iter()
        .skip(offset)
        .take(BOOKMARKS_PER_PAGE)
        .collect();

    Ok(Json(ListBookmarksResponse {
        total,
        page: query.page,
        pages,
        bookmarks,
    }))
}

pub async fn get_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<Bookmark>, ApiError> {
    let bookmark = owned_bookmark(&state, &claims, id).await?;
    Ok(Json(bookmark))
}

pub async fn delete_bookmark(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    owned_bookmark(&state, &claims, id).await?;
    run_blocking(&state, move |db| db.delete_bookmark(id)).await?;
    Ok(Json(MessageResponse {
        message: format!("Bookmark #{} removed", id),
    }))
}

/// Fetch a bookmark owned by the caller. Other users' bookmarks look
/// exactly like missing ones.
pub(crate) async fn owned_bookmark(
    state: &AppState,
    claims: &Claims,
    id: i64,
) -> Result<Bookmark, ApiError> {
    let bookmark = run_blocking(state, move |db| db.get_bookmark(id)).await?;
    if bookmark.user_id != claims.sub {
        return Err(ApiError::NotFound(id));
    }
    Ok(bookmark)
}
