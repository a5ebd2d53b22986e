//! Application configuration. Paths, input stream, analysis tuning.
//!
//! Read from `POSTURE_*` environment variables (and `.env`), plus an optional file
//! named by `POSTURE_CONFIG`.

use crate::domain::{
    AnalysisSettings, ClassifierThresholds, DEFAULT_ARM_RAISE_MARGIN, DEFAULT_MIN_CONFIDENCE,
    DEFAULT_SMOOTHING_ALPHA, DomainError, SmoothingParams,
};
use crate::usecases::DEFAULT_CALIBRATION_FRAMES;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Baseline, history and exports live here. Read from POSTURE_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Recorded landmark stream (JSONL). Unset selects the synthetic demo stream.
    #[serde(default)]
    pub landmarks_path: Option<String>,

    /// Replay the recording at its captured pace. Read from POSTURE_REALTIME.
    #[serde(default)]
    pub realtime: Option<bool>,

    /// Accepted frames averaged into a baseline.
    #[serde(default)]
    pub calibration_frames: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Analysis tuning
    // ─────────────────────────────────────────────────────────────────────────
    /// EMA weight of the newest sample, in (0, 1].
    #[serde(default)]
    pub smoothing_alpha: Option<f64>,

    #[serde(default)]
    pub min_confidence: Option<f64>,

    /// How far above the shoulder (normalized y) a wrist or elbow must be to count as raised.
    #[serde(default)]
    pub arm_raise_margin: Option<f64>,

    #[serde(default)]
    pub forward_head_threshold_deg: Option<f64>,

    #[serde(default)]
    pub tilt_threshold_deg: Option<f64>,

    #[serde(default)]
    pub lean_threshold_deg: Option<f64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::load_from(std::env::var("POSTURE_CONFIG").ok().as_deref())
    }

    /// Environment plus an optional config file.
    pub fn load_from(file: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::build(file, None)
    }

    /// `vars` replaces the process environment when given.
    fn build(
        file: Option<&str>,
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(path));
        }
        // Variables override the file.
        c = c.add_source(
            config::Environment::with_prefix("POSTURE")
                .try_parsing(true)
                .ignore_empty(true)
                .source(vars),
        );
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn landmarks_path(&self) -> Option<PathBuf> {
        self.landmarks_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn realtime_or_default(&self) -> bool {
        self.realtime.unwrap_or(false)
    }

    pub fn calibration_frames_or_default(&self) -> usize {
        self.calibration_frames
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_CALIBRATION_FRAMES)
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.data_dir_or_default().join("baseline.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir_or_default().join("history.jsonl")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir_or_default().join("exports")
    }

    /// Validated analysis settings. Unset values fall back to the defaults.
    pub fn analysis_settings(&self) -> Result<AnalysisSettings, DomainError> {
        let defaults = ClassifierThresholds::default();
        AnalysisSettings::new(
            SmoothingParams {
                alpha: self.smoothing_alpha.unwrap_or(DEFAULT_SMOOTHING_ALPHA),
                min_confidence: self.min_confidence.unwrap_or(DEFAULT_MIN_CONFIDENCE),
            },
            self.arm_raise_margin.unwrap_or(DEFAULT_ARM_RAISE_MARGIN),
            ClassifierThresholds {
                forward_head_deg: self
                    .forward_head_threshold_deg
                    .unwrap_or(defaults.forward_head_deg),
                tilt_deg: self.tilt_threshold_deg.unwrap_or(defaults.tilt_deg),
                lean_deg: self.lean_threshold_deg.unwrap_or(defaults.lean_deg),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data_dir_or_default(), PathBuf::from("./data"));
        assert_eq!(cfg.history_path(), PathBuf::from("./data/history.jsonl"));
        assert_eq!(cfg.landmarks_path(), None);
        assert!(!cfg.realtime_or_default());
        assert_eq!(cfg.calibration_frames_or_default(), 15);
        assert_eq!(cfg.analysis_settings().unwrap(), AnalysisSettings::default());
    }

    #[test]
    fn test_invalid_alpha_is_config_error() {
        let cfg = AppConfig {
            smoothing_alpha: Some(0.0),
            ..AppConfig::default()
        };
        assert!(matches!(cfg.analysis_settings(), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_zero_calibration_frames_falls_back() {
        let cfg = AppConfig {
            calibration_frames: Some(0),
            landmarks_path: Some("  ".into()),
            ..AppConfig::default()
        };
        assert_eq!(cfg.calibration_frames_or_default(), 15);
        assert_eq!(cfg.landmarks_path(), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "data_dir = \"/tmp/posture\"\nrealtime = true\nlean_threshold_deg = 4.5\ncalibration_frames = 20"
        )
        .unwrap();

        let cfg = AppConfig::load_from(file.path().to_str()).unwrap();
        assert_eq!(cfg.data_dir_or_default(), PathBuf::from("/tmp/posture"));
        assert!(cfg.realtime_or_default());
        assert_eq!(cfg.calibration_frames_or_default(), 20);
        assert_eq!(cfg.analysis_settings().unwrap().thresholds.lean_deg, 4.5);
    }

    #[test]
    fn test_env_variables_override_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "lean_threshold_deg = 9.0\ncalibration_frames = 20").unwrap();

        let vars: config::Map<String, String> = [
            ("POSTURE_LEAN_THRESHOLD_DEG", "4.5"),
            ("POSTURE_REALTIME", "true"),
            ("POSTURE_LANDMARKS_PATH", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = AppConfig::build(file.path().to_str(), Some(vars)).unwrap();
        assert!(cfg.realtime_or_default());
        assert_eq!(cfg.landmarks_path(), None);
        assert_eq!(cfg.calibration_frames_or_default(), 20);
        assert_eq!(cfg.analysis_settings().unwrap().thresholds.lean_deg, 4.5);
    }

    #[test]
    fn test_load_from_reads_posture_variables() {
        // SAFETY: std serializes its own env access; no other test reads this variable.
        unsafe { std::env::set_var("POSTURE_TILT_THRESHOLD_DEG", "3.5") };
        let cfg = AppConfig::load_from(None).unwrap();
        unsafe { std::env::remove_var("POSTURE_TILT_THRESHOLD_DEG") };

        assert_eq!(cfg.tilt_threshold_deg, Some(3.5));
        assert_eq!(cfg.analysis_settings().unwrap().thresholds.tilt_deg, 3.5);
    }
}
