//! Snooze/reminder system for messages.
//!
//! This module provides the ability to snooze messages and have them
//! reappear at a specified time.

mod model;
mod repository;

pub use model::{SnoozeDuration, SnoozedMessage};
pub use repository::SnoozeRepository;
