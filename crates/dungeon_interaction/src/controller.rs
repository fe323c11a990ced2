// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mode controller.
//!
//! Owns the current [`Mode`] and performs every transition: it stops running
//! sessions, resolves and activates the mode's camera, shows the mode banner
//! and starts the movie or the making-of. Each frame, [`ModeController::update`]
//! ticks the camcorder and the sequence player and chains the demo modes when
//! they finish.

use crate::camcorder::{Camcorder, CamcorderEvent};
use crate::config::DungeonConfig;
use crate::error::{InteractionError, Result};
use crate::host::{same_camera, CameraResolver, Host};
use crate::making_of::{ScriptedSequencePlayer, SequenceEvent};
use crate::mode::Mode;
use dungeon_camcorder::TrackStorage;

/// Events raised by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    /// The current mode changed
    ModeChanged {
        /// Previous mode
        from: Mode,
        /// New mode
        to: Mode,
    },
    /// A camcorder playback reached its end
    PlaybackFinished(String),
    /// The making-of crossed a stage boundary
    StageAdvanced {
        /// Stage that ended
        from: usize,
        /// Stage that began, `None` past the last stage
        to: Option<usize>,
    },
    /// The making-of ended
    SequenceFinished,
}

/// Drives cameras, camcorder and making-of according to the current mode
pub struct ModeController<H: Host> {
    host: H,
    resolver: Box<dyn CameraResolver>,
    config: DungeonConfig,
    mode: Mode,
    camcorder: Camcorder,
    making_of: ScriptedSequencePlayer,
    pending_events: Vec<InteractionEvent>,
}

impl<H: Host> ModeController<H> {
    /// Create a controller in [`Mode::Unknown`]
    pub fn new(
        host: H,
        resolver: Box<dyn CameraResolver>,
        storage: Box<dyn TrackStorage>,
        config: DungeonConfig,
    ) -> Self {
        let making_of = ScriptedSequencePlayer::new(
            config.making_of.stages.clone(),
            config.making_of_time_scale(),
        );

        Self {
            host,
            resolver,
            config,
            mode: Mode::Unknown,
            camcorder: Camcorder::new(storage),
            making_of,
            pending_events: Vec::new(),
        }
    }

    /// Enter the configured initial mode and greet the user
    pub fn start(&mut self) -> Result<()> {
        self.set_mode(self.config.initial_mode, false)?;

        if !self.config.expert_mode {
            let text = self.config.welcome_text.clone();
            self.host.show_text(&text, self.config.welcome_timeout);
        }
        Ok(())
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch to `mode`, showing its banner when `announce` is set
    pub fn set_mode(&mut self, mode: Mode, announce: bool) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }

        let previous = self.host.active_camera();
        let camera = match (self.resolver.resolve(mode), previous.as_ref()) {
            (Some(camera), _) => camera,
            (None, Some(previous)) => {
                tracing::warn!("No camera for {} mode, keeping the current camera", mode);
                previous.clone()
            }
            (None, None) => return Err(InteractionError::NoCamera(mode)),
        };

        self.stop_sessions();

        if mode.carries_over_pose() {
            if let Some(previous) = previous.as_ref().filter(|p| !same_camera(p, &camera)) {
                let pose = previous.lock().pose();
                camera.lock().set_pose(pose);
            }
        }

        if let Some(body) = camera.lock().physics_body() {
            body.reset_motion();
        }

        self.host.set_active_camera(camera.clone());

        let from = self.mode;
        self.mode = mode;
        tracing::info!("Mode changed: {} -> {}", from, mode);

        if announce && !self.config.expert_mode {
            self.host.show_text(mode.banner(), self.config.banner_timeout);
        }

        match mode {
            Mode::Movie => {
                let record = self.config.movie_record().to_string();
                if let Err(e) = self.camcorder.start_playback(&record, camera) {
                    tracing::warn!("Failed to play movie '{}': {}", record, e);
                }
            }
            Mode::MakingOf => self.making_of.start(&mut self.host),
            _ => {}
        }

        self.pending_events
            .push(InteractionEvent::ModeChanged { from, to: mode });
        Ok(())
    }

    /// Advance sessions by `delta_time` seconds and chain finished demo modes
    pub fn update(&mut self, delta_time: f32) {
        self.camcorder.update(delta_time);
        self.making_of.tick(delta_time, &mut self.host);

        for event in self.camcorder.take_events() {
            match event {
                CamcorderEvent::PlaybackFinished(name) => {
                    self.pending_events
                        .push(InteractionEvent::PlaybackFinished(name));
                    if self.mode == Mode::Movie {
                        self.chain(Mode::MakingOf);
                    }
                }
            }
        }

        for event in self.making_of.take_events() {
            match event {
                SequenceEvent::StageAdvanced { from, to } => {
                    self.pending_events
                        .push(InteractionEvent::StageAdvanced { from, to });
                }
                SequenceEvent::Finished => {
                    self.pending_events.push(InteractionEvent::SequenceFinished);
                    if self.mode == Mode::MakingOf {
                        let next = if self.config.repeat_mode {
                            Mode::Movie
                        } else {
                            Mode::Free
                        };
                        self.chain(next);
                    }
                }
            }
        }
    }

    /// Record the active camera under `name`
    pub fn start_record(&mut self, name: &str) -> Result<()> {
        let camera = self
            .host
            .active_camera()
            .ok_or(InteractionError::NoActiveCamera)?;
        self.camcorder.start_record(name, camera)?;
        tracing::debug!("Recording '{}'", name);
        Ok(())
    }

    /// Stop recording and persist the record
    pub fn stop_record(&mut self) {
        if let Some(name) = self.camcorder.recording_record() {
            tracing::debug!("Stopped recording '{}'", name);
        }
        self.camcorder.stop_record();
    }

    /// Play the record `name` on the active camera
    pub fn start_playback(&mut self, name: &str) -> Result<()> {
        let camera = self
            .host
            .active_camera()
            .ok_or(InteractionError::NoActiveCamera)?;
        self.camcorder.start_playback(name, camera)?;
        tracing::debug!("Playing '{}'", name);
        Ok(())
    }

    /// Stop the camcorder playback
    pub fn stop_playback(&mut self) {
        if let Some(name) = self.camcorder.playing_record() {
            tracing::debug!("Stopped playing '{}'", name);
        }
        self.camcorder.stop_playback();
    }

    /// Whether the camcorder records
    pub fn is_recording(&self) -> bool {
        self.camcorder.is_recording()
    }

    /// Whether the camcorder plays
    pub fn is_playing(&self) -> bool {
        self.camcorder.is_playing()
    }

    /// Whether the making-of runs
    pub fn is_sequence_playing(&self) -> bool {
        self.making_of.is_playing()
    }

    /// Current making-of stage
    pub fn sequence_stage(&self) -> Option<usize> {
        self.making_of.stage()
    }

    /// Configuration
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Host services
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host services
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn stop_sessions(&mut self) {
        self.camcorder.stop_record();
        self.camcorder.stop_playback();
        self.making_of.stop(&mut self.host);
    }

    fn chain(&mut self, mode: Mode) {
        if let Err(e) = self.set_mode(mode, true) {
            tracing::warn!("Failed to switch to {} mode: {}", mode, e);
        }
    }
}
