// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera interaction for the Dungeon demo.
//!
//! This crate provides:
//! - The interaction [`Mode`] state machine driven by [`ModeController`]
//! - A [`Camcorder`] recording or replaying the active camera
//! - The scripted making-of tour ([`ScriptedSequencePlayer`])
//! - Keyboard shortcuts, random scene animators and the demo configuration
//!
//! The host engine plugs in through the capability traits in [`host`].

pub mod animators;
pub mod camcorder;
pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod input;
pub mod making_of;
pub mod mode;
pub mod stages;

#[cfg(test)]
mod testing;

pub use animators::{LightFlicker, PositionWander};
pub use camcorder::{Camcorder, CamcorderEvent};
pub use config::{CameraPaths, ConfigError, DungeonConfig, CONFIG_FILE_NAME};
pub use controller::{InteractionEvent, ModeController};
pub use error::{InteractionError, Result};
pub use host::{
    camera_handle, same_camera, CameraEntity, CameraHandle, CameraResolver, Host,
    PathCameraResolver, PhysicsResettable, PoseSink, RenderPassSettings, SceneLookup,
};
pub use input::{Key, KeyboardInput};
pub use making_of::{ScriptedSequencePlayer, SequenceEvent};
pub use mode::{CameraSlot, Mode};
pub use stages::{PassSetting, SequenceStage, StageTable};
