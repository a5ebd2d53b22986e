//! Session statistics: one warning per bad-posture episode and cumulative
//! unfocused time.
//!
//! Two states, FOCUSED and UNFOCUSED. Entering UNFOCUSED counts a warning;
//! leaving it adds the episode's duration to `unfocused_ms`.

use crate::domain::entities::ClassificationEvent;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a session's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub warning_count: u32,
    pub unfocused_ms: u64,
    pub currently_unfocused: bool,
    pub unfocused_since_ms: Option<i64>,
}

impl SessionStats {
    /// Unfocused time including the still-open episode, as of `now_ms`.
    pub fn unfocused_ms_at(&self, now_ms: i64) -> u64 {
        let open = self
            .unfocused_since_ms
            .filter(|_| self.currently_unfocused)
            .map_or(0, |since| elapsed_ms(since, now_ms));
        self.unfocused_ms.saturating_add(open)
    }
}

fn elapsed_ms(from_ms: i64, to_ms: i64) -> u64 {
    u64::try_from(to_ms.saturating_sub(from_ms)).unwrap_or(0)
}

#[derive(Debug, Clone, Default)]
pub struct SessionStatsAggregator {
    stats: SessionStats,
    first_timestamp_ms: Option<i64>,
    last_timestamp_ms: Option<i64>,
}

impl SessionStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionStats {
        self.stats
    }

    pub fn first_timestamp_ms(&self) -> Option<i64> {
        self.first_timestamp_ms
    }

    pub fn last_timestamp_ms(&self) -> Option<i64> {
        self.last_timestamp_ms
    }

    /// Wall span between the first and last recorded events.
    pub fn duration_ms(&self) -> u64 {
        match (self.first_timestamp_ms, self.last_timestamp_ms) {
            (Some(first), Some(last)) => elapsed_ms(first, last),
            _ => 0,
        }
    }

    /// Apply one event. Returns true when the event opened a new episode.
    pub fn record(&mut self, event: &ClassificationEvent) -> bool {
        let ts = event.timestamp_ms;
        self.first_timestamp_ms.get_or_insert(ts);
        self.last_timestamp_ms = Some(ts);

        match (self.stats.currently_unfocused, event.is_bad_posture) {
            (false, true) => {
                self.stats.warning_count += 1;
                self.stats.currently_unfocused = true;
                self.stats.unfocused_since_ms = Some(ts);
                true
            }
            (true, false) => {
                self.close_episode(ts);
                false
            }
            _ => false,
        }
    }

    /// Flush a still-open episode using the last known timestamp.
    pub fn finalize(&mut self) -> SessionStats {
        if self.stats.currently_unfocused {
            if let Some(last) = self.last_timestamp_ms {
                self.close_episode(last);
            }
        }
        self.stats
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn close_episode(&mut self, end_ms: i64) {
        if let Some(since) = self.stats.unfocused_since_ms.take() {
            self.stats.unfocused_ms = self
                .stats
                .unfocused_ms
                .saturating_add(elapsed_ms(since, end_ms));
        }
        self.stats.currently_unfocused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PostureReason;
    use std::collections::BTreeSet;

    fn good(ts: i64) -> ClassificationEvent {
        ClassificationEvent::good(ts)
    }

    fn bad(ts: i64) -> ClassificationEvent {
        ClassificationEvent::new(BTreeSet::from([PostureReason::ForwardHead]), ts)
    }

    #[test]
    fn test_initial_state() {
        let agg = SessionStatsAggregator::new();
        assert_eq!(agg.snapshot(), SessionStats::default());
        assert!(!agg.snapshot().currently_unfocused);
    }

    #[test]
    fn test_unfocused_accumulation() {
        let mut agg = SessionStatsAggregator::new();
        for event in [good(0), bad(1000), bad(2000), good(3500)] {
            agg.record(&event);
        }
        let stats = agg.snapshot();
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.unfocused_ms, 2500);
        assert!(!stats.currently_unfocused);
        assert_eq!(stats.unfocused_since_ms, None);
        assert_eq!(agg.duration_ms(), 3500);
    }

    #[test]
    fn test_one_warning_per_episode() {
        let mut agg = SessionStatsAggregator::new();
        assert!(agg.record(&bad(0)));
        for ts in 1..10 {
            assert!(!agg.record(&bad(ts * 33)));
        }
        agg.record(&good(400));
        assert_eq!(agg.snapshot().warning_count, 1);

        assert!(agg.record(&bad(500)));
        agg.record(&good(600));
        let stats = agg.snapshot();
        assert_eq!(stats.warning_count, 2);
        assert_eq!(stats.unfocused_ms, 500);
    }

    #[test]
    fn test_finalize_flushes_open_episode() {
        let mut agg = SessionStatsAggregator::new();
        agg.record(&good(0));
        agg.record(&bad(1000));
        agg.record(&bad(1800));
        assert_eq!(agg.snapshot().unfocused_ms_at(2000), 1000);

        let stats = agg.finalize();
        assert_eq!(stats.unfocused_ms, 800);
        assert!(!stats.currently_unfocused);
        // Idempotent.
        assert_eq!(agg.finalize().unfocused_ms, 800);
    }

    #[test]
    fn test_out_of_order_timestamp_adds_nothing() {
        let mut agg = SessionStatsAggregator::new();
        agg.record(&bad(1000));
        agg.record(&good(900));
        assert_eq!(agg.snapshot().unfocused_ms, 0);
        assert_eq!(agg.snapshot().warning_count, 1);
    }

    #[test]
    fn test_unfocused_time_saturates() {
        let mut agg = SessionStatsAggregator::new();
        for _ in 0..3 {
            agg.record(&bad(i64::MIN));
            agg.record(&good(i64::MAX));
        }
        let stats = agg.snapshot();
        assert_eq!(stats.warning_count, 3);
        assert_eq!(stats.unfocused_ms, u64::MAX);

        agg.record(&bad(i64::MIN));
        assert_eq!(agg.snapshot().unfocused_ms_at(i64::MAX), u64::MAX);
    }
}
