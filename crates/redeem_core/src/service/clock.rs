//! Claim timestamp sources.
//!
//! # Invariants
//! - Labels are non-empty, human-readable local times.

use chrono::{DateTime, Local, TimeZone};

/// Display format of claim timestamps: `2026/10/18 09:05:00`.
pub const CLAIM_TIME_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

/// Source of the `claimedAt` label written on claim.
pub trait Clock {
    fn now_label(&self) -> String;
}

/// Wall clock in the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_label(&self) -> String {
        format_claim_time(&Local::now())
    }
}

/// Clock that always reports the same label. Useful for deterministic callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now_label(&self) -> String {
        self.0.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_label(&self) -> String {
        (**self).now_label()
    }
}

/// Formats a timestamp the way claim labels are stored.
pub fn format_claim_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format(CLAIM_TIME_FORMAT).to_string()
}
