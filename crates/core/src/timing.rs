// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timing primitives shared by the producer and consumer engines
//!
//! All three gates treat a zero duration as "disabled", never as an error:
//! a disabled delay fires immediately, a disabled deadline never fires, and
//! a disabled pacer lets every iteration through.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Wait out a job's initial delay. Returns immediately when disabled.
pub async fn initial_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Bounds one engine run. Constructed at loop entry, not at job creation,
/// so an initial delay does not eat into the run budget.
#[derive(Debug, Clone, Copy)]
pub struct RunDeadline {
    deadline: Option<Instant>,
}

impl RunDeadline {
    pub fn after(run_duration: Duration) -> Self {
        let deadline = if run_duration.is_zero() {
            None
        } else {
            Some(Instant::now() + run_duration)
        };
        Self { deadline }
    }

    /// A disabled deadline never expires; the run ends only on stream
    /// exhaustion or cancellation.
    pub fn expired(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// Periodic gate limiting how fast an engine loop advances.
///
/// Ticks are periodic at the configured interval, the first tick lands one
/// full period after construction, and missed ticks are skipped rather than
/// bursted (Go-ticker semantics).
pub struct IntervalPacer {
    interval: Option<Interval>,
}

impl IntervalPacer {
    pub fn new(period: Duration) -> Self {
        let interval = if period.is_zero() {
            None
        } else {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            Some(interval)
        };
        Self { interval }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick boundary. A no-op when pacing is disabled.
    pub async fn tick(&mut self) {
        if let Some(interval) = &mut self.interval {
            interval.tick().await;
        }
    }
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
