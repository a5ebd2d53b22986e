//! Application use cases. Orchestrate domain logic via ports.

pub mod calibration_service;
pub mod history_service;
pub mod monitor_service;

pub use calibration_service::{CalibrationService, DEFAULT_CALIBRATION_FRAMES};
pub use history_service::HistoryService;
pub use monitor_service::MonitorService;
