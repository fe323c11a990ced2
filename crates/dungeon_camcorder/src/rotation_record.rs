// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed frame rate rotation keyframe recording.
//!
//! While active, the recorder samples a node's rotation once per frame at
//! `frames_per_second`. When stopped, the keys are written as a chunk file of
//! `(w, x, y, z)` quaternion components if a keys path is set.

use crate::error::{CamcorderError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Most keys written by a single update; longer stalls skip frames
pub const MAX_CATCH_UP_FRAMES: u64 = 1024;

/// Recorded rotation keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationChunk {
    /// Sampling rate of the keys
    pub frames_per_second: u32,
    /// Quaternion keys as (w, x, y, z)
    pub keys: Vec<[f32; 4]>,
}

impl RotationChunk {
    /// Load a chunk written by [`RotationKeyframeRecorder::stop`]
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }

    /// Write the chunk to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bincode::serialize(self)?)?;
        Ok(())
    }
}

/// Records a rotation at a fixed frame rate
#[derive(Debug)]
pub struct RotationKeyframeRecorder {
    /// Frames per second
    pub frames_per_second: u32,
    /// Chunk file written on stop, nothing is written when unset
    pub keys_path: Option<PathBuf>,
    recording: bool,
    data: Vec<[f32; 4]>,
    frame: f64,
    frame_index: Option<u64>,
}

impl RotationKeyframeRecorder {
    /// Create an inactive recorder
    pub fn new(frames_per_second: u32, keys_path: Option<PathBuf>) -> Self {
        Self {
            frames_per_second,
            keys_path,
            recording: false,
            data: Vec::new(),
            frame: 0.0,
            frame_index: None,
        }
    }

    /// Start recording, dropping previously recorded keys
    pub fn start(&mut self) {
        self.recording = true;
        self.data.clear();
        self.frame = 0.0;
        self.frame_index = None;
    }

    /// Whether the recorder is active
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Sample `rotation` (x, y, z, w) for every frame boundary crossed.
    ///
    /// At most [`MAX_CATCH_UP_FRAMES`] keys are written per update. Negative
    /// or non-finite steps are ignored.
    pub fn update(&mut self, rotation: [f32; 4], delta_time: f32) {
        if !self.recording {
            return;
        }
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::warn!("Ignoring rotation key time step {}", delta_time);
            return;
        }

        let target = self.frame as u64;
        let next = match self.frame_index {
            Some(index) => index.checked_add(1),
            None => Some(0),
        };
        if let Some(next) = next.filter(|next| *next <= target) {
            let behind = target - next + 1;
            let count = behind.min(MAX_CATCH_UP_FRAMES);
            if count < behind {
                tracing::warn!("Skipped {} rotation key frames", behind - count);
            }
            let [x, y, z, w] = rotation;
            self.data
                .extend(std::iter::repeat([w, x, y, z]).take(count as usize));
            self.frame_index = Some(target);
        }

        self.frame += f64::from(delta_time) * f64::from(self.frames_per_second);
    }

    /// Stop recording and write the chunk when a keys path is set.
    ///
    /// Returns the recorded chunk. Stopping an inactive recorder returns `None`.
    pub fn stop(&mut self) -> Result<Option<RotationChunk>> {
        if !self.recording {
            return Ok(None);
        }
        self.recording = false;

        let chunk = RotationChunk {
            frames_per_second: self.frames_per_second,
            keys: std::mem::take(&mut self.data),
        };

        if let Some(path) = &self.keys_path {
            if path.as_os_str().is_empty() {
                return Err(CamcorderError::InvalidName);
            }
            chunk.save(path)?;
            tracing::info!("Wrote {} rotation keys to {:?}", chunk.keys.len(), path);
        }

        Ok(Some(chunk))
    }

    /// Number of keys recorded so far
    pub fn key_count(&self) -> usize {
        self.data.len()
    }
}
