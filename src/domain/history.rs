//! Finished-session records and the aggregates shown on the history screen.

use crate::domain::stats::SessionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: f64 = 60_000.0;

/// One finished monitoring session, as handed to the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub warning_count: u32,
    pub unfocused_ms: u64,
}

impl SessionRecord {
    pub fn new(started_at: DateTime<Utc>, duration_ms: u64, stats: &SessionStats) -> Self {
        Self {
            started_at,
            duration_ms,
            warning_count: stats.warning_count,
            unfocused_ms: stats.unfocused_ms,
        }
    }

    pub fn focused_ms(&self) -> u64 {
        self.duration_ms.saturating_sub(self.unfocused_ms)
    }
}

/// Averages across all stored sessions, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HistorySummary {
    pub total_sessions: usize,
    pub avg_warnings: f64,
    pub avg_unfocused_minutes: f64,
}

impl HistorySummary {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let n = records.len() as f64;
        let warnings: u64 = records.iter().map(|r| u64::from(r.warning_count)).sum();
        let unfocused: u64 = records.iter().map(|r| r.unfocused_ms).sum();
        Self {
            total_sessions: records.len(),
            avg_warnings: round_tenths(warnings as f64 / n),
            avg_unfocused_minutes: round_tenths(unfocused as f64 / n / MS_PER_MINUTE),
        }
    }
}

/// One point of the per-session trend, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub warnings: u32,
    pub unfocused_minutes: u64,
}

pub fn trend(records: &[SessionRecord]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&SessionRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.started_at);
    sorted
        .into_iter()
        .map(|r| TrendPoint {
            date: r.started_at.format("%Y-%m-%d").to_string(),
            warnings: r.warning_count,
            unfocused_minutes: (r.unfocused_ms as f64 / MS_PER_MINUTE).round() as u64,
        })
        .collect()
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(day: u32, warnings: u32, unfocused_ms: u64) -> SessionRecord {
        SessionRecord {
            started_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            duration_ms: 3_600_000,
            warning_count: warnings,
            unfocused_ms,
        }
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(HistorySummary::from_records(&[]), HistorySummary::default());
    }

    #[test]
    fn test_summary_rounding() {
        let records = [record(1, 3, 120_000), record(2, 4, 90_000), record(3, 4, 0)];
        let summary = HistorySummary::from_records(&records);
        assert_eq!(summary.total_sessions, 3);
        // 11 / 3 = 3.666.. -> 3.7
        assert_eq!(summary.avg_warnings, 3.7);
        // 210 s / 3 / 60 = 1.1666.. min -> 1.2
        assert_eq!(summary.avg_unfocused_minutes, 1.2);
    }

    #[test]
    fn test_trend_sorted_oldest_first() {
        let records = [record(5, 1, 150_000), record(2, 2, 20_000)];
        let points = trend(&records);
        assert_eq!(points[0].date, "2026-03-02");
        assert_eq!(points[0].unfocused_minutes, 0);
        assert_eq!(points[1].warnings, 1);
        // 2.5 min rounds half away from zero
        assert_eq!(points[1].unfocused_minutes, 3);
    }

    #[test]
    fn test_record_from_stats() {
        let stats = SessionStats {
            warning_count: 2,
            unfocused_ms: 4_000,
            currently_unfocused: false,
            unfocused_since_ms: None,
        };
        let rec = SessionRecord::new(Utc::now(), 10_000, &stats);
        assert_eq!(rec.focused_ms(), 6_000);
        assert_eq!(rec.warning_count, 2);
    }
}
