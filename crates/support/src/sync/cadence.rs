//! Poll cadence bookkeeping
//!
//! Pure state machine behind the adaptive poller: tracks the current
//! interval, the run of unchanged polls and the last seen fingerprint.
//! Kept free of timers so it can be tested without a runtime.

use std::time::Duration;

use super::Fingerprint;
use crate::config::PollConfig;

/// What a poll observed, as far as the cadence is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Snapshot differs from the previous one (or is the first)
    Changed,
    /// Snapshot equals the previous one
    Unchanged,
    /// Fetch succeeded without data; nothing to compare
    NoData,
    /// Fetch failed
    Failed,
}

/// Interval, idle counter and last fingerprint of a poller
#[derive(Debug, Clone)]
pub struct Cadence {
    config: PollConfig,
    interval: Duration,
    idle_ticks: u32,
    fingerprint: Option<Fingerprint>,
}

impl Cadence {
    /// Start at the minimum interval with no fingerprint
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            interval: config.min_interval(),
            idle_ticks: 0,
            fingerprint: None,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Delay before the next poll
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consecutive polls that saw no change
    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// Go back to the fast cadence. The stored fingerprint is kept.
    pub fn reset(&mut self) {
        self.idle_ticks = 0;
        self.interval = self.config.min_interval();
    }

    /// Record a successful poll and report whether it was a change
    pub fn observe(&mut self, fingerprint: Fingerprint) -> Activity {
        if self.fingerprint.as_ref() == Some(&fingerprint) {
            self.idle_ticks = self.idle_ticks.saturating_add(1);
            // idle_ticks keeps counting past the threshold, so the interval
            // steps up once per threshold window rather than every poll.
            if self.idle_ticks % self.config.idle_threshold.max(1) == 0 {
                self.back_off();
            }
            Activity::Unchanged
        } else {
            self.fingerprint = Some(fingerprint);
            self.reset();
            Activity::Changed
        }
    }

    /// Record a failed poll: one backoff step, idle run and fingerprint kept
    pub fn observe_failure(&mut self) -> Activity {
        self.back_off();
        Activity::Failed
    }

    fn back_off(&mut self) {
        let next = self.interval.saturating_add(self.config.backoff_step());
        self.interval = next.min(self.config.max_interval());
    }
}
