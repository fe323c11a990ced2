// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction modes and their per-mode behavior.

use serde::{Deserialize, Serialize};

/// Interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// First person walk camera with physics
    Walk,
    /// Free flying camera
    Free,
    /// Free flying camera passing through walls
    Ghost,
    /// Pre-recorded camera flight
    Movie,
    /// Narrated making-of tour
    MakingOf,
    /// No mode selected yet
    #[default]
    Unknown,
}

/// Scene camera a mode looks through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraSlot {
    /// Walk camera
    Walk,
    /// Free camera
    Free,
    /// Ghost camera
    Ghost,
    /// Making-of camera
    MakingOf,
}

impl Mode {
    /// All selectable modes in key order
    pub fn all() -> &'static [Mode] {
        &[Mode::Walk, Mode::Free, Mode::Ghost, Mode::Movie, Mode::MakingOf]
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Walk => "Walk",
            Mode::Free => "Free",
            Mode::Ghost => "Ghost",
            Mode::Movie => "Movie",
            Mode::MakingOf => "Making of",
            Mode::Unknown => "Unknown",
        }
    }

    /// Text shown when switching into this mode
    pub fn banner(&self) -> &'static str {
        match self {
            Mode::Walk => "Walk mode",
            Mode::Free => "Free mode",
            Mode::Ghost => "Ghost mode",
            Mode::Movie => "Movie mode",
            Mode::MakingOf => "Making of mode",
            Mode::Unknown => "",
        }
    }

    /// Camera used by this mode; the movie is flown with the ghost camera
    pub fn camera_slot(&self) -> Option<CameraSlot> {
        match self {
            Mode::Walk => Some(CameraSlot::Walk),
            Mode::Free => Some(CameraSlot::Free),
            Mode::Ghost | Mode::Movie => Some(CameraSlot::Ghost),
            Mode::MakingOf => Some(CameraSlot::MakingOf),
            Mode::Unknown => None,
        }
    }

    /// Whether the new camera takes over the pose of the previous one
    pub fn carries_over_pose(&self) -> bool {
        !self.is_scripted()
    }

    /// Whether entering this mode starts a playback
    pub fn starts_playback(&self) -> bool {
        self.is_scripted()
    }

    /// Movie and making-of drive the camera themselves
    pub fn is_scripted(&self) -> bool {
        matches!(self, Mode::Movie | Mode::MakingOf)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
