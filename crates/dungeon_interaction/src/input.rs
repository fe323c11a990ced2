// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyboard shortcuts.
//!
//! | Key | Action |
//! |-----|--------|
//! | 1-5 | Walk, Free, Ghost, Movie, Making of |
//! | R   | Toggle recording of the test record (developer mode) |
//! | P   | Toggle playback of the test record (developer mode) |

use crate::controller::ModeController;
use crate::error::Result;
use crate::host::Host;
use crate::mode::Mode;

/// Keys the demo reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Walk mode
    Num1,
    /// Free mode
    Num2,
    /// Ghost mode
    Num3,
    /// Movie mode
    Num4,
    /// Making-of mode
    Num5,
    /// Record toggle
    R,
    /// Playback toggle
    P,
}

impl Key {
    /// Parse a typed character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '1' => Some(Key::Num1),
            '2' => Some(Key::Num2),
            '3' => Some(Key::Num3),
            '4' => Some(Key::Num4),
            '5' => Some(Key::Num5),
            'r' => Some(Key::R),
            'p' => Some(Key::P),
            _ => None,
        }
    }

    /// Mode selected by this key
    pub fn mode(&self) -> Option<Mode> {
        match self {
            Key::Num1 => Some(Mode::Walk),
            Key::Num2 => Some(Mode::Free),
            Key::Num3 => Some(Mode::Ghost),
            Key::Num4 => Some(Mode::Movie),
            Key::Num5 => Some(Mode::MakingOf),
            Key::R | Key::P => None,
        }
    }
}

/// Maps key presses onto controller actions
#[derive(Debug, Default)]
pub struct KeyboardInput {
    playback_backup: Option<Mode>,
}

impl KeyboardInput {
    /// Create a new input handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode restored when the test playback is toggled off
    pub fn playback_backup(&self) -> Option<Mode> {
        self.playback_backup
    }

    /// Handle a key press, returns whether it was consumed
    pub fn handle_key<H: Host>(&mut self, key: Key, controller: &mut ModeController<H>) -> Result<bool> {
        if let Some(mode) = key.mode() {
            self.playback_backup = None;
            controller.set_mode(mode, true)?;
            return Ok(true);
        }

        if !controller.config().developer_mode || controller.mode().is_scripted() {
            return Ok(false);
        }

        let record = controller.config().records.test.clone();
        match key {
            Key::R => {
                if controller.is_recording() {
                    controller.stop_record();
                } else {
                    controller.start_record(&record)?;
                }
            }
            Key::P => {
                if controller.is_playing() {
                    controller.stop_playback();
                    if let Some(mode) = self.playback_backup.take() {
                        controller.set_mode(mode, true)?;
                    }
                } else {
                    if self.playback_backup.is_none() {
                        self.playback_backup = Some(controller.mode());
                    }
                    controller.set_mode(Mode::Ghost, true)?;
                    if let Err(e) = controller.start_playback(&record) {
                        tracing::warn!("Failed to play '{}': {}", record, e);
                    }
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}
