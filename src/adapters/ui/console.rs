//! Implements PresentationPort on the terminal.
//!
//! Live status on a spinner line; a colored line on every FOCUSED/UNFOCUSED transition.

use crate::adapters::ui::progress::monitor_spinner;
use crate::domain::{DomainError, PostureReason, SessionRecord};
use crate::ports::{FrameReport, PresentationPort};
use crossterm::style::Stylize;
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// `m:ss` for a millisecond span.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn reason_label(reason: PostureReason) -> &'static str {
    match reason {
        PostureReason::ForwardHead => "head forward",
        PostureReason::TiltedHead => "head tilted",
        PostureReason::ShoulderLean => "leaning sideways",
    }
}

fn reasons_text(reasons: &BTreeSet<PostureReason>) -> String {
    reasons
        .iter()
        .map(|r| reason_label(*r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_line(report: &FrameReport) -> String {
    let state = if report.stats.currently_unfocused {
        "UNFOCUSED"
    } else {
        "FOCUSED"
    };
    format!(
        "{} | warnings {} | unfocused {}",
        state,
        report.stats.warning_count,
        format_duration(report.stats.unfocused_ms_at(report.timestamp_ms))
    )
}

/// Plain text for a state change, `None` when the state did not change.
fn transition_text(was_unfocused: bool, report: &FrameReport) -> Option<String> {
    match (was_unfocused, report.stats.currently_unfocused) {
        (false, true) => {
            let reasons = report
                .event
                .as_ref()
                .map(|e| reasons_text(&e.reasons))
                .unwrap_or_default();
            Some(format!(
                "warning #{}: {}",
                report.stats.warning_count, reasons
            ))
        }
        (true, false) => Some("posture recovered".to_string()),
        _ => None,
    }
}

pub struct ConsolePresenter {
    spinner: ProgressBar,
    unfocused: AtomicBool,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::with_spinner(monitor_spinner())
    }

    pub fn with_spinner(spinner: ProgressBar) -> Self {
        Self {
            spinner,
            unfocused: AtomicBool::new(false),
        }
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PresentationPort for ConsolePresenter {
    async fn publish(&self, report: &FrameReport) -> Result<(), DomainError> {
        let was_unfocused = self
            .unfocused
            .swap(report.stats.currently_unfocused, Ordering::Relaxed);
        if let Some(text) = transition_text(was_unfocused, report) {
            let line = if report.stats.currently_unfocused {
                format!("{} {}", "UNFOCUSED".red().bold(), text.red())
            } else {
                format!("{} {}", "FOCUSED".green().bold(), text.green())
            };
            self.spinner.println(line);
        }
        self.spinner.set_message(status_line(report));
        Ok(())
    }

    async fn session_finished(&self, record: &SessionRecord) -> Result<(), DomainError> {
        self.spinner.finish_and_clear();
        println!("{}", "Session finished".cyan().bold());
        println!("  duration:   {}", format_duration(record.duration_ms));
        println!("  warnings:   {}", record.warning_count);
        println!("  unfocused:  {}", format_duration(record.unfocused_ms));
        println!("  focused:    {}", format_duration(record.focused_ms()));
        Ok(())
    }
}
