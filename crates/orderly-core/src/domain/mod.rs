//! # Orderly Domain
//!
//! Entities and inbound payloads for Users, Orders, and Histories.

pub mod entities;

pub use entities::*;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to the millisecond precision the store keeps.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    truncate_millis(Utc::now())
}

/// Truncates a timestamp to millisecond precision.
#[must_use]
pub fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(3)
}
