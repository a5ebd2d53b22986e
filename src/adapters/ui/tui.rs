//! Implements InputPort. Inquire-based main menu.
//!
//! Each action opens a fresh landmark stream and builds its use case on the spot.

use crate::adapters::source::open_source;
use crate::adapters::ui::console::ConsolePresenter;
use crate::adapters::ui::progress::calibration_bar;
use crate::domain::{AnalysisSettings, DomainError};
use crate::ports::{BaselineStore, HistoryPort, InputPort, PresentationPort};
use crate::usecases::{CalibrationService, HistoryService, MonitorService};
use async_trait::async_trait;
use crossterm::style::Stylize;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::Select;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Trend rows shown under the history summary.
const TREND_ROWS: usize = 10;

/// Applies the teal theme to every subsequent inquire prompt.
pub fn apply_theme() {
    let mut config = RenderConfig::default();
    config.prompt_prefix = Styled::new("?").with_fg(Color::LightCyan);
    config.highlighted_option_prefix = Styled::new(">").with_fg(Color::LightMagenta);
    config.selected_option = Some(StyleSheet::new().with_fg(Color::LightCyan));
    config.answer = StyleSheet::new().with_fg(Color::LightMagenta);
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Calibrate,
    Monitor,
    HistorySummary,
    ExportHistory,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 5] = [
        MenuAction::Calibrate,
        MenuAction::Monitor,
        MenuAction::HistorySummary,
        MenuAction::ExportHistory,
        MenuAction::Quit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Calibrate => "Calibrate baseline",
            MenuAction::Monitor => "Start monitoring",
            MenuAction::HistorySummary => "History summary",
            MenuAction::ExportHistory => "Export history CSV",
            MenuAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Where frames come from and where exports go.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    /// Recorded stream; `None` selects the synthetic demo stream.
    pub landmarks_path: Option<PathBuf>,
    pub realtime: bool,
    pub calibration_frames: usize,
    pub export_dir: PathBuf,
}

pub struct TuiInputPort {
    baseline_store: Arc<dyn BaselineStore>,
    history: Arc<dyn HistoryPort>,
    history_service: Arc<HistoryService>,
    settings: AnalysisSettings,
    options: TuiOptions,
}

impl TuiInputPort {
    pub fn new(
        baseline_store: Arc<dyn BaselineStore>,
        history: Arc<dyn HistoryPort>,
        settings: AnalysisSettings,
        options: TuiOptions,
    ) -> Self {
        let history_service = Arc::new(HistoryService::new(Arc::clone(&history)));
        Self {
            baseline_store,
            history,
            history_service,
            settings,
            options,
        }
    }

    async fn calibrate(&self) -> Result<(), DomainError> {
        let source = open_source(self.options.landmarks_path.as_deref(), self.options.realtime)
            .await?;
        let service = CalibrationService::new(
            source,
            Arc::clone(&self.baseline_store),
            self.settings,
            self.options.calibration_frames,
        );
        let bar = calibration_bar(service.window() as u64);
        let progress_bar = bar.clone();
        let result = service
            .calibrate(move |accepted| progress_bar.set_position(accepted as u64))
            .await;
        bar.finish_and_clear();

        let profile = result?;
        println!(
            "{} from {} frames (head angle {:.1} deg, lean {:.1} deg)",
            "Baseline saved".green().bold(),
            profile.frame_count(),
            profile.nose_to_shoulder_angle(),
            profile.shoulder_lean_angle()
        );
        Ok(())
    }

    async fn monitor(&self) -> Result<(), DomainError> {
        let Some(baseline) = self.baseline_store.load().await? else {
            println!("{}", "No baseline yet. Run calibration first.".yellow());
            return Ok(());
        };
        let source = open_source(self.options.landmarks_path.as_deref(), self.options.realtime)
            .await?;
        let presenter: Arc<dyn PresentationPort> = Arc::new(ConsolePresenter::new());
        let service = MonitorService::new(
            source,
            presenter,
            Arc::clone(&self.history),
            self.settings,
        );

        println!("{}", "Monitoring. Press Ctrl-C to stop.".cyan());
        let (stop_tx, stop_rx) = watch::channel(false);
        let ctrl_c = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("stop requested");
                    let _ = stop_tx.send(true);
                }
                Err(e) => {
                    // Dropping the sender would end the session; keep it alive instead.
                    warn!(error = %e, "Ctrl-C handler unavailable");
                    std::future::pending::<()>().await;
                }
            }
        });
        let result = service.run(baseline, stop_rx).await;
        ctrl_c.abort();
        result.map(|_| ())
    }

    async fn show_summary(&self) -> Result<(), DomainError> {
        let summary = self.history_service.summary().await?;
        if summary.total_sessions == 0 {
            println!("No sessions recorded yet.");
            return Ok(());
        }
        println!("{}", "History".cyan().bold());
        println!("  sessions:               {}", summary.total_sessions);
        println!("  avg warnings:           {:.1}", summary.avg_warnings);
        println!("  avg unfocused minutes:  {:.1}", summary.avg_unfocused_minutes);

        let trend = self.history_service.trend().await?;
        let skip = trend.len().saturating_sub(TREND_ROWS);
        println!("  {:<12} {:>8} {:>10}", "date", "warnings", "unfocused");
        for point in &trend[skip..] {
            println!(
                "  {:<12} {:>8} {:>8}m",
                point.date, point.warnings, point.unfocused_minutes
            );
        }
        Ok(())
    }

    async fn export(&self) -> Result<(), DomainError> {
        let path = self.history_service.export_csv(&self.options.export_dir).await?;
        println!("{} {}", "Exported".green().bold(), path.display());
        Ok(())
    }

    async fn dispatch(&self, action: MenuAction) -> Result<(), DomainError> {
        match action {
            MenuAction::Calibrate => self.calibrate().await,
            MenuAction::Monitor => self.monitor().await,
            MenuAction::HistorySummary => self.show_summary().await,
            MenuAction::ExportHistory => self.export().await,
            MenuAction::Quit => Ok(()),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let action = match Select::new("What next?", MenuAction::ALL.to_vec()).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    MenuAction::Quit
                }
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            };
            if action == MenuAction::Quit {
                info!("bye");
                return Ok(());
            }
            // A failed action is reported; the menu stays up.
            if let Err(e) = self.dispatch(action).await {
                error!(error = %e, action = %action, "action failed");
                println!("{} {}", "Error:".red().bold(), e);
            }
        }
    }
}
