//! The soft-delete recovery window.
//!
//! Read paths and the sweeper must agree on when a deleted event expires,
//! so both go through this one predicate.

use chrono::{DateTime, Duration, Utc};

/// How long a soft-deleted event stays recoverable, in wall-clock hours.
pub const RECOVERY_WINDOW_HOURS: i64 = 24;

pub fn recovery_window() -> Duration {
    Duration::hours(RECOVERY_WINDOW_HOURS)
}

/// Whether a deletion has outlived the recovery window. The boundary is
/// inclusive: an event deleted at T is purge-eligible at exactly T + 24h.
pub fn is_expired(deleted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - deleted_at >= recovery_window()
}

/// Time left before a deleted event becomes purge-eligible. Zero once
/// expired.
pub fn time_remaining(deleted_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (deleted_at + recovery_window() - now).max(Duration::zero())
}
