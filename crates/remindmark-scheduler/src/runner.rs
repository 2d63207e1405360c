use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use remindmark_db::Database;
use remindmark_types::models::Bookmark;

use crate::notifier::{Notifier, UserDirectory};
use crate::render::reminder_notification;

/// How often the store is polled for due reminders.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Outcome counts of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Bookmarks found due.
    pub due: usize,
    /// Delivered and cleared.
    pub delivered: usize,
    /// Notifier refused; left due.
    pub failed: usize,
    /// Author could not be resolved; left due.
    pub skipped: usize,
    /// Delivered, but clearing the reminder failed. May be sent again.
    pub clear_failed: usize,
}

enum Dispatch {
    Delivered,
    Failed,
    Skipped,
    ClearFailed,
}

/// Periodic loop that delivers due bookmark reminders.
pub struct ReminderScheduler {
    db: Arc<Database>,
    notifier: Arc<dyn Notifier>,
    directory: Arc<dyn UserDirectory>,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(
        db: Arc<Database>,
        notifier: Arc<dyn Notifier>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            db,
            notifier,
            directory,
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start the loop on the runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Tick until `shutdown` is cancelled. A batch that already started is
    /// always finished before the loop returns.
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Reminder scheduler started (every {:?})", self.interval);
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            let report = self.tick(Utc::now()).await;
            if report.due > 0 {
                info!(
                    due = report.due,
                    delivered = report.delivered,
                    failed = report.failed,
                    skipped = report.skipped,
                    clear_failed = report.clear_failed,
                    "Reminder tick finished"
                );
            }
        }

        info!("Reminder scheduler stopped");
    }

    /// Deliver every reminder due at `now`, one after another. A failing
    /// item never stops the rest of the batch.
    pub async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let mut report = TickReport::default();

        let db = self.db.clone();
        let due = match run_blocking(move || db.list_due_bookmarks(now)).await {
            Ok(due) => due,
            Err(e) => {
                error!("Failed to fetch due bookmarks: {:#}", e);
                return report;
            }
        };
        report.due = due.len();

        for bookmark in &due {
            match self.dispatch(bookmark).await {
                Dispatch::Delivered => report.delivered += 1,
                Dispatch::Failed => report.failed += 1,
                Dispatch::Skipped => report.skipped += 1,
                Dispatch::ClearFailed => report.clear_failed += 1,
            }
        }

        report
    }

    async fn dispatch(&self, bookmark: &Bookmark) -> Dispatch {
        let Some(due_at) = bookmark.due_at else {
            return Dispatch::Skipped;
        };
        let author = match self.directory.resolve_user(&bookmark.author_id).await {
            Ok(author) => author,
            Err(e) => {
                warn!(
                    id = bookmark.id,
                    author = %bookmark.author_id,
                    "Failed to resolve reminder author: {}", e
                );
                return Dispatch::Skipped;
            }
        };

        let notification = reminder_notification(bookmark, &author);
        if let Err(e) = self
            .notifier
            .notify_user(&bookmark.user_id, &notification)
            .await
        {
            warn!(id = bookmark.id, user = %bookmark.user_id, "Failed to send reminder: {}", e);
            return Dispatch::Failed;
        }
        info!(id = bookmark.id, user = %bookmark.user_id, "Reminder sent");

        let db = self.db.clone();
        let id = bookmark.id;
        match run_blocking(move || db.clear_delivered_reminder(id, due_at)).await {
            Ok(true) => Dispatch::Delivered,
            Ok(false) => {
                debug!(id, "Reminder was rescheduled during delivery, keeping it");
                Dispatch::Delivered
            }
            Err(e) => {
                error!(id, "Failed to reset bookmark: {:#}", e);
                Dispatch::ClearFailed
            }
        }
    }
}

async fn run_blocking<F, T>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> remindmark_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let value = tokio::task::spawn_blocking(f)
        .await
        .context("store task panicked")??;
    Ok(value)
}
