// src/scoring/streak.rs

use chrono::{DateTime, Utc};

/// Maximum whole-day gap between two completions that keeps a run alive.
pub const MAX_STREAK_GAP_DAYS: i64 = 2;

/// Bonus per completion beyond the first in the longest run.
pub const STREAK_BONUS_PER_STEP: i64 = 5;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days between two timestamps, floored.
pub fn day_gap(prev: DateTime<Utc>, curr: DateTime<Utc>) -> i64 {
    (curr - prev).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Tracks runs of completions over a history fed in ascending order.
///
/// `longest()` is the maximum run seen anywhere in the history, not the
/// run that is still open at the end.
#[derive(Debug, Default)]
pub struct StreakTracker {
    last_seen: Option<DateTime<Utc>>,
    consecutive: i64,
    longest: i64,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, completed_at: DateTime<Utc>) {
        self.consecutive = match self.last_seen {
            Some(prev) if day_gap(prev, completed_at) <= MAX_STREAK_GAP_DAYS => {
                self.consecutive + 1
            }
            _ => 1,
        };
        self.longest = self.longest.max(self.consecutive);
        self.last_seen = Some(completed_at);
    }

    pub fn longest(&self) -> i64 {
        self.longest
    }

    /// Bonus added once to the user's total, `(longest - 1) * 5`.
    pub fn bonus(&self) -> i64 {
        (self.longest - 1).max(0) * STREAK_BONUS_PER_STEP
    }
}
