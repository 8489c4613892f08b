//! Desk clock: the only source of complaint timestamps.
//!
//! The engine never reads the wall clock directly. Production wiring uses
//! SystemClock; tests use ManualClock so arrival order is reproducible.

use crate::types::Timestamp;
use chrono::{Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

pub trait DeskClock: Send {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl DeskClock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Deterministic clock. Every reading returns the current instant and then
/// steps forward by `step`, so consecutive submissions get distinct,
/// increasing timestamps. Clones share the same instant, so a test can keep
/// a handle after moving the clock into an engine.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<Timestamp>>,
    step:    Duration,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
            step:    Duration::seconds(1),
        }
    }

    /// A clock starting at 2024-01-01T00:00:00Z.
    pub fn at_epoch() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default())
    }

    /// Use a zero step to hand out identical timestamps (tie-break tests).
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    pub fn peek(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeskClock for ManualClock {
    fn now(&self) -> Timestamp {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let now = *current;
        *current = now + self.step;
        now
    }
}
