//! In-memory landmark source. Replays a prepared list of frames.
//!
//! Backs the synthetic demo stream and the use-case tests.

use crate::domain::{DomainError, PoseFrame};
use crate::ports::LandmarkSource;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct ScriptedSource {
    items: Mutex<VecDeque<Result<PoseFrame, DomainError>>>,
    /// Simulated capture interval between frames.
    frame_delay: Duration,
}

impl ScriptedSource {
    pub fn new(frames: Vec<PoseFrame>) -> Self {
        Self::from_results(frames.into_iter().map(Ok).collect())
    }

    /// Frames interleaved with per-frame failures.
    pub fn from_results(items: Vec<Result<PoseFrame, DomainError>>) -> Self {
        Self {
            items: Mutex::new(items.into()),
            frame_delay: Duration::ZERO,
        }
    }

    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    pub async fn remaining(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait::async_trait]
impl LandmarkSource for ScriptedSource {
    async fn next_frame(&self) -> Result<Option<PoseFrame>, DomainError> {
        if !self.frame_delay.is_zero() {
            tokio::time::sleep(self.frame_delay).await;
        }
        match self.items.lock().await.pop_front() {
            Some(item) => item.map(Some),
            None => Ok(None),
        }
    }
}
