//! Inter-download pacing and failure-streak throttling.
//!
//! The pacer is the explicit mutable context threaded through the download
//! engine: it owns the process-wide success count and failure streak and
//! turns them into sleep durations. The irregular cadence (random window per
//! download, a longer pause every so many successes) keeps the request
//! pattern human-like.

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone)]
pub struct PacerConfig {
    /// Inclusive pause window after each non-skipped asset, in seconds.
    pub pause_window: (u64, u64),
    /// Inclusive window for the extra long pause, in seconds.
    pub long_pause_window: (u64, u64),
    /// Insert the extra pause after every this-many successes.
    pub long_pause_every: u64,
    /// Blocking cooldown once the failure streak hits the threshold.
    pub cooldown: Duration,
    /// Consecutive exhausted assets before the cooldown fires.
    pub max_failure_streak: u32,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            pause_window: (5, 7),
            long_pause_window: (30, 60),
            long_pause_every: 15,
            cooldown: Duration::from_secs(600),
            max_failure_streak: 3,
        }
    }
}

/// Pacing state for one engine run.
#[derive(Debug)]
pub struct Pacer {
    config: PacerConfig,
    successes: u64,
    failure_streak: u32,
}

impl Pacer {
    pub fn new(config: PacerConfig) -> Self {
        Self {
            config,
            successes: 0,
            failure_streak: 0,
        }
    }

    pub fn successes(&self) -> u64 {
        self.successes
    }

    pub fn failure_streak(&self) -> u32 {
        self.failure_streak
    }

    /// Record one successful download. Any success resets the streak.
    pub fn record_success(&mut self) {
        self.successes += 1;
        self.failure_streak = 0;
    }

    /// Record one asset whose retries were exhausted.
    pub fn record_failure(&mut self) {
        self.failure_streak += 1;
    }

    /// A single long cooldown once the streak reaches the threshold; the
    /// streak resets to zero immediately, so the cooldown fires at most once
    /// per streak.
    pub fn cooldown_due(&mut self) -> Option<Duration> {
        if self.failure_streak >= self.config.max_failure_streak {
            self.failure_streak = 0;
            Some(self.config.cooldown)
        } else {
            None
        }
    }

    /// Pause inserted after any outcome other than a skip. `succeeded` marks
    /// whether the preceding asset downloaded, so the every-Nth long pause
    /// only triggers right after the success that completed a batch.
    pub fn pause_after(&self, succeeded: bool) -> Duration {
        let base = sample_seconds(self.config.pause_window);
        if succeeded
            && self.successes > 0
            && self.successes % self.config.long_pause_every == 0
        {
            base + sample_seconds(self.config.long_pause_window)
        } else {
            base
        }
    }
}

fn sample_seconds((lo, hi): (u64, u64)) -> Duration {
    let secs = if hi > lo {
        rand::thread_rng().gen_range(lo..=hi)
    } else {
        lo
    };
    Duration::from_secs(secs)
}
