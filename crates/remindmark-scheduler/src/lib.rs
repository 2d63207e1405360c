//! Reminder delivery for bookmarks.
//!
//! A [`runner::ReminderScheduler`] polls the store for due bookmarks, renders
//! each one, hands it to a [`notifier::Notifier`] and clears the reminder once
//! delivery succeeded. Failed items stay due and are retried on the next tick.

pub mod directory;
pub mod notifier;
pub mod render;
pub mod runner;

pub use directory::CachedUserDirectory;
pub use notifier::{DeliveryError, LookupError, Notifier, UserDirectory};
pub use runner::{POLL_INTERVAL, ReminderScheduler, TickReport};
