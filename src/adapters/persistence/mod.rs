//! File-backed persistence: baseline profile, session history, CSV export.

pub mod baseline_json;
pub mod history_csv;
pub mod history_jsonl;

pub use baseline_json::BaselineJson;
pub use history_csv::trend_to_csv;
pub use history_jsonl::HistoryJsonl;
