use async_trait::async_trait;

use remindmark_db::StoreError;
use remindmark_types::events::Notification;
use remindmark_types::models::UserProfile;

/// Delivers a rendered message to one user. `Ok` means delivered.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_user(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> Result<(), DeliveryError>;
}

/// Resolves display information for a user id.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve_user(&self, user_id: &str) -> Result<UserProfile, LookupError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("user {0} has no live connection")]
    NotConnected(String),

    #[error("connection of user {0} closed before delivery")]
    ConnectionClosed(String),

    #[error("delivery to user {0} timed out")]
    TimedOut(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown user {0}")]
    UnknownUser(String),

    #[error("user lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("user lookup task failed: {0}")]
    Task(String),
}
