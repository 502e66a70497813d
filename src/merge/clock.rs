//! Wall-clock source for the time-derived recipient fields.

use chrono::{Local, NaiveDateTime};

/// Source of the current local time.
///
/// The record builder reads the clock exactly once per recipient, so every
/// time-derived field of one record describes the same instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
