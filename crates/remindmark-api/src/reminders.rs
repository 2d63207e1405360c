use std::time::Duration;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, TimeDelta, Utc};

use remindmark_scheduler::render::human_duration;
use remindmark_types::api::{Claims, MessageResponse, SetReminderRequest};
use remindmark_types::events::Notification;

use crate::bookmarks::owned_bookmark;
use crate::error::ApiError;
use crate::{AppState, run_blocking};

/// Reminder instant `secs` from now; 0 means no reminder.
pub(crate) fn due_in(secs: u64) -> Result<Option<DateTime<Utc>>, ApiError> {
    if secs == 0 {
        return Ok(None);
    }
    let too_far = || ApiError::BadRequest("reminder is too far in the future".into());
    let delta = i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(too_far)?;
    Utc::now()
        .checked_add_signed(delta)
        .map(Some)
        .ok_or_else(too_far)
}

pub(crate) fn reminder_phrase(secs: u64) -> String {
    format!("Will remind you in {}.", human_duration(Duration::from_secs(secs)))
}

/// Set (`remind_in_secs > 0`) or remove (`0`) the reminder of a bookmark.
pub async fn set_reminder(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<SetReminderRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let due_at = due_in(req.remind_in_secs)?;
    owned_bookmark(&state, &claims, id).await?;
    run_blocking(&state, move |db| db.set_reminder(id, due_at)).await?;

    let message = if due_at.is_some() {
        format!("Reminder set for bookmark #{}. {}", id, reminder_phrase(req.remind_in_secs))
    } else {
        format!("Reminder removed for bookmark #{}", id)
    };
    Ok(Json(MessageResponse { message }))
}

pub async fn clear_reminder(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    owned_bookmark(&state, &claims, id).await?;
    run_blocking(&state, move |db| db.clear_reminder(id)).await?;
    Ok(Json(MessageResponse {
        message: format!("Reminder removed for bookmark #{}", id),
    }))
}

/// Send the caller a direct message to check that delivery works.
pub async fn send_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .notifier
        .notify_user(
            &claims.sub,
            &Notification::text("Hi, there! I am ready to assist you."),
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "Message sent".into(),
    }))
}
