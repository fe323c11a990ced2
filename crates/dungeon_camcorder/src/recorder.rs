// SPDX-License-Identifier: MIT OR Apache-2.0
//! Samples camera poses into named keyframe tracks.

use crate::error::{CamcorderError, Result};
use crate::pose::Pose;
use crate::track::KeyframeTrack;
use indexmap::IndexMap;

/// The single in-progress recording
#[derive(Debug)]
struct RecordingSession {
    track: KeyframeTrack,
    elapsed: f32,
}

/// Records camera poses, one finished track per record name.
///
/// The recorder knows nothing about playback. Whoever owns both a recorder and
/// a [`crate::Player`] has to stop one before starting the other.
#[derive(Debug, Default)]
pub struct Recorder {
    session: Option<RecordingSession>,
    tracks: IndexMap<String, KeyframeTrack>,
}

impl Recorder {
    /// Create a recorder with an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording under `name`.
    ///
    /// Any finished track with the same name is discarded. A recording that is
    /// already running is finalized first.
    pub fn start_recording(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(CamcorderError::InvalidName);
        }

        self.stop_recording();
        self.tracks.shift_remove(name);
        self.session = Some(RecordingSession {
            track: KeyframeTrack::new(name),
            elapsed: 0.0,
        });
        tracing::info!("Started recording '{}'", name);
        Ok(())
    }

    /// Append the current pose and advance the record clock
    pub fn tick(&mut self, pose: Pose, delta_time: f32) {
        if let Some(session) = &mut self.session {
            session.track.push(session.elapsed, pose);
            session.elapsed += delta_time.max(0.0);
        }
    }

    /// Finish the running recording and return its name
    pub fn stop_recording(&mut self) -> Option<String> {
        let session = self.session.take()?;
        let name = session.track.name.clone();
        tracing::info!(
            "Stopped recording '{}' ({} keyframes, {:.2}s)",
            name,
            session.track.keyframe_count(),
            session.track.duration()
        );
        self.tracks.insert(name.clone(), session.track);
        Some(name)
    }

    /// Whether a recording is running
    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the running recording
    pub fn recording_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.track.name.as_str())
    }

    /// Seconds recorded so far
    pub fn elapsed(&self) -> f32 {
        self.session.as_ref().map(|s| s.elapsed).unwrap_or(0.0)
    }

    /// Get a finished track
    pub fn track(&self, name: &str) -> Option<&KeyframeTrack> {
        self.tracks.get(name)
    }

    /// Add a finished track to the library, replacing one with the same name
    pub fn insert_track(&mut self, track: KeyframeTrack) {
        self.tracks.insert(track.name.clone(), track);
    }

    /// Get all finished tracks in recording order
    pub fn tracks(&self) -> impl Iterator<Item = &KeyframeTrack> {
        self.tracks.values()
    }
}
