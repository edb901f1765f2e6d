use chrono::{DateTime, Duration, Utc};

/// Wall-clock stopwatch for the currently displayed chunk.
///
/// The timer is restarted whenever a chunk is first shown, completed, or
/// progress is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    started_at: DateTime<Utc>,
}

impl SessionTimer {
    #[must_use]
    pub fn start(now: DateTime<Utc>) -> Self {
        Self { started_at: now }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Time since `start`. A clock that went backwards yields zero.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }

    #[must_use]
    pub fn expired(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.elapsed(now) >= threshold
    }

    /// Whole seconds left before `threshold`, truncated toward zero.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>, threshold: Duration) -> u64 {
        let remaining = threshold - self.elapsed(now);
        u64::try_from(remaining.num_seconds()).unwrap_or(0)
    }
}
