//! indicatif bars for calibration and live monitoring.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(120);

/// Bar counting accepted calibration frames.
pub fn calibration_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} calibrating [{bar:30.cyan/blue}] {pos}/{len} frames {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message("hold a comfortable upright posture");
    pb.enable_steady_tick(TICK);
    pb
}

/// Spinner carrying the live session status line.
pub fn monitor_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message("waiting for landmarks...");
    pb.enable_steady_tick(TICK);
    pb
}
