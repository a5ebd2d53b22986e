//! Wiring & DI. Entry point: load config, bootstrap adapters, run the menu.
//! No business logic here.

use dotenv::dotenv;
use posture_watch::adapters::persistence::{BaselineJson, HistoryJsonl};
use posture_watch::adapters::ui::{TuiInputPort, TuiOptions};
use posture_watch::ports::{BaselineStore, HistoryPort, InputPort};
use posture_watch::shared::config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    posture_watch::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config unreadable; using defaults");
        AppConfig::default()
    });
    let settings = cfg
        .analysis_settings()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let data_path = cfg.data_dir_or_default();
    tokio::fs::create_dir_all(&data_path)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    let data_dir_abs = data_path
        .canonicalize()
        .unwrap_or_else(|_| data_path.clone());
    info!(path = %data_dir_abs.display(), "data directory");

    let landmarks_path = cfg.landmarks_path();
    match &landmarks_path {
        Some(path) => info!(path = %path.display(), realtime = cfg.realtime_or_default(), "landmark recording configured"),
        None => warn!("POSTURE_LANDMARKS_PATH not set, using synthetic landmark stream"),
    }

    // --- Stores ---
    let baseline_store: Arc<dyn BaselineStore> = Arc::new(BaselineJson::new(cfg.baseline_path()));
    let history: Arc<dyn HistoryPort> = Arc::new(HistoryJsonl::new(cfg.history_path()));

    let options = TuiOptions {
        landmarks_path,
        realtime: cfg.realtime_or_default(),
        calibration_frames: cfg.calibration_frames_or_default(),
        export_dir: cfg.export_dir(),
    };
    info!(
        calibration_frames = options.calibration_frames,
        alpha = settings.smoothing.alpha,
        min_confidence = settings.smoothing.min_confidence,
        "analysis settings loaded"
    );

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        baseline_store,
        history,
        settings,
        options,
    ));

    // --- Run (main menu -> Calibrate / Monitor / History) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
