//! Retry core for the download loop.
//!
//! Pure decisions only: classifying one attempt's result and computing the
//! backoff delay. The engine owns the actual sleeping, so everything here is
//! testable without I/O or wall-clock time.

use std::time::Duration;

use rand::Rng;

/// Retry configuration for one engine run.
///
/// All durations flow from here; tests zero them out and assert on attempt
/// counts and computed delays instead of elapsed time.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum fetch attempts per asset, rate-limit hits included.
    pub max_retries: u32,
    /// One backoff unit; the delay before retry `n` is
    /// `unit * (2^n + jitter)`.
    pub backoff_unit: Duration,
    /// Inclusive jitter bounds, in backoff units.
    pub jitter: (u64, u64),
    /// Wait applied on HTTP 429 when the server sends no `Retry-After`.
    pub rate_limit_fallback: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_unit: Duration::from_secs(1),
            jitter: (1, 3),
            rate_limit_fallback: Duration::from_secs(600),
        }
    }
}

/// What one fetch attempt told us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    /// Server asked us to back off for this long before the next attempt.
    /// Does not advance the exponential backoff.
    RateLimited(Duration),
    /// Non-200 status, connection/timeout error, or a failure while
    /// streaming the body to disk.
    Transient(String),
}

/// Classify a response status under the given policy.
pub fn classify_status(status: u16, retry_after: Option<u64>, policy: &RetryPolicy) -> Verdict {
    match status {
        200 => Verdict::Success,
        429 => Verdict::RateLimited(
            retry_after
                .map(Duration::from_secs)
                .unwrap_or(policy.rate_limit_fallback),
        ),
        other => Verdict::Transient(format!("HTTP {other}")),
    }
}

/// Jittered exponential backoff: `2^failures` units plus a uniform sample
/// from the jitter window.
///
/// `failures` is 1-indexed: the delay after the first transient failure is
/// `2^1 + jitter` units.
pub fn backoff_delay(failures: u32, policy: &RetryPolicy) -> Duration {
    let (lo, hi) = policy.jitter;
    let jitter = if hi > lo {
        rand::thread_rng().gen_range(lo..=hi)
    } else {
        lo
    };
    let units = 2u64.saturating_pow(failures.min(20)).saturating_add(jitter);
    policy
        .backoff_unit
        .saturating_mul(units.min(u64::from(u32::MAX)) as u32)
}
