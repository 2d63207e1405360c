use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use remindmark_db::Database;
use remindmark_types::models::UserProfile;

use crate::notifier::{LookupError, UserDirectory};

/// User profiles persisted in the store, fronted by an in-process cache.
pub struct CachedUserDirectory {
    db: Arc<Database>,
    cache: RwLock<HashMap<String, UserProfile>>,
}

impl CachedUserDirectory {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Record the latest known display info for a user.
    pub async fn remember(&self, profile: UserProfile) -> Result<(), LookupError> {
        let db = self.db.clone();
        let stored = profile.clone();
        tokio::task::spawn_blocking(move || db.upsert_user_profile(&stored))
            .await
            .map_err(|e| LookupError::Task(e.to_string()))??;

        self.cache
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for CachedUserDirectory {
    async fn resolve_user(&self, user_id: &str) -> Result<UserProfile, LookupError> {
        if let Some(profile) = self.cache.read().await.get(user_id) {
            return Ok(profile.clone());
        }

        let db = self.db.clone();
        let id = user_id.to_string();
        let profile = tokio::task::spawn_blocking(move || db.get_user_profile(&id))
            .await
            .map_err(|e| LookupError::Task(e.to_string()))??
            .ok_or_else(|| LookupError::UnknownUser(user_id.to_string()))?;

        self.cache
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }
}
