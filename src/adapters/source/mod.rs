//! Landmark sources: recorded replay, synthetic demo, in-memory script.

pub mod jsonl_source;
pub mod scripted;
pub mod synthetic;

pub use jsonl_source::JsonlLandmarkSource;
pub use scripted::ScriptedSource;
pub use synthetic::{DEFAULT_SYNTHETIC_FPS, SyntheticLandmarkSource};

use crate::domain::DomainError;
use crate::ports::LandmarkSource;
use std::path::Path;
use std::sync::Arc;

/// Recording when a path is configured, otherwise the synthetic demo stream.
/// Each call starts a fresh stream from the beginning.
pub async fn open_source(
    landmarks_path: Option<&Path>,
    realtime: bool,
) -> Result<Arc<dyn LandmarkSource>, DomainError> {
    match landmarks_path {
        Some(path) => Ok(Arc::new(JsonlLandmarkSource::open(path, realtime).await?)),
        None => Ok(Arc::new(SyntheticLandmarkSource::new(
            DEFAULT_SYNTHETIC_FPS,
            realtime,
        ))),
    }
}
