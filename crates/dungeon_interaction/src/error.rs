// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interaction error type.

use crate::config::ConfigError;
use crate::mode::Mode;
use dungeon_camcorder::CamcorderError;
use thiserror::Error;

/// Interaction errors
#[derive(Debug, Error)]
pub enum InteractionError {
    /// Neither the mode's camera nor a previous camera exists
    #[error("No camera for {0} mode and no previous camera to fall back to")]
    NoCamera(Mode),

    /// Recording or playback needs an active camera
    #[error("No active camera")]
    NoActiveCamera,

    /// Camcorder error
    #[error("Camcorder error: {0}")]
    Camcorder(#[from] CamcorderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;
