// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camcorder: records the active camera or feeds it a recorded track.
//!
//! Recording and playback are mutually exclusive. Starting one stops the
//! other at once. Finished recordings are written to the track storage, and
//! playback looks in the recorder's library before loading from storage.

use crate::error::Result;
use crate::host::CameraHandle;
use dungeon_camcorder::{CamcorderError, Player, PlayerEvent, Recorder, TrackStorage};

/// Events raised by the camcorder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CamcorderEvent {
    /// Playback of the named record reached its end
    PlaybackFinished(String),
}

/// Records or replays one camera at a time
pub struct Camcorder {
    recorder: Recorder,
    player: Player,
    storage: Box<dyn TrackStorage>,
    camera: Option<CameraHandle>,
    pending_events: Vec<CamcorderEvent>,
}

impl Camcorder {
    /// Create a camcorder persisting tracks to `storage`
    pub fn new(storage: Box<dyn TrackStorage>) -> Self {
        Self {
            recorder: Recorder::new(),
            player: Player::new(),
            storage,
            camera: None,
            pending_events: Vec::new(),
        }
    }

    /// Start recording `camera` under `name`; a running playback stops first
    pub fn start_record(&mut self, name: &str, camera: CameraHandle) -> Result<()> {
        if name.is_empty() {
            return Err(CamcorderError::InvalidName.into());
        }

        self.stop_playback();
        self.stop_record();
        self.recorder.start_recording(name)?;
        self.camera = Some(camera);
        Ok(())
    }

    /// Whether recording is active
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Stop recording and persist the track
    pub fn stop_record(&mut self) {
        let Some(name) = self.recorder.stop_recording() else {
            return;
        };
        self.camera = None;

        if let Some(track) = self.recorder.track(&name) {
            if let Err(e) = self.storage.save(&name, track) {
                tracing::warn!("Failed to save track '{}': {}", name, e);
            }
        }
    }

    /// Start feeding `camera` with the record `name`; a running recording stops first.
    ///
    /// The record is looked up and checked before anything stops, so a failed
    /// start leaves the running session untouched.
    pub fn start_playback(&mut self, name: &str, camera: CameraHandle) -> Result<()> {
        let track = match self.recorder.track(name) {
            Some(track) => track.clone(),
            None => self.storage.load(name)?,
        };
        if track.is_empty() {
            return Err(CamcorderError::EmptyTrack(name.to_string()).into());
        }

        self.stop_record();
        self.stop_playback();
        self.player.start_playback(track)?;

        camera.lock().set_interactive(false);
        self.camera = Some(camera);
        Ok(())
    }

    /// Whether playback is active
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// Stop playback without raising [`CamcorderEvent::PlaybackFinished`]
    pub fn stop_playback(&mut self) {
        if !self.player.is_playing() {
            return;
        }
        self.player.stop_playback();
        self.release_camera();
    }

    /// Name of the record being played
    pub fn playing_record(&self) -> Option<&str> {
        self.player.track_name()
    }

    /// Name of the record being recorded
    pub fn recording_record(&self) -> Option<&str> {
        self.recorder.recording_name()
    }

    /// Track storage
    pub fn storage(&self) -> &dyn TrackStorage {
        self.storage.as_ref()
    }

    /// Sample or drive the bound camera
    pub fn update(&mut self, delta_time: f32) {
        let Some(camera) = self.camera.clone() else {
            return;
        };

        if self.recorder.is_recording() {
            let pose = camera.lock().pose();
            self.recorder.tick(pose, delta_time);
        } else if let Some(pose) = self.player.tick(delta_time) {
            camera.lock().set_pose(pose);
        }

        for event in self.player.take_events() {
            match event {
                PlayerEvent::Finished(name) => {
                    self.release_camera();
                    self.pending_events.push(CamcorderEvent::PlaybackFinished(name));
                }
            }
        }
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<CamcorderEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn release_camera(&mut self) {
        if let Some(camera) = self.camera.take() {
            camera.lock().set_interactive(true);
        }
    }
}
