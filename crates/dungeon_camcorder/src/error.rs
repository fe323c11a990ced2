// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camcorder error type.

use thiserror::Error;

/// Camcorder errors
#[derive(Debug, Error)]
pub enum CamcorderError {
    /// Record names must not be empty
    #[error("Record name must not be empty")]
    InvalidName,

    /// Playback needs at least one keyframe
    #[error("Track '{0}' has no keyframes")]
    EmptyTrack(String),

    /// No track stored under this name
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// Stored track was written by a newer format
    #[error("Track format version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON write error
    #[error("RON error: {0}")]
    RonWrite(#[from] ron::Error),

    /// Binary encoding error
    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Result type for camcorder operations
pub type Result<T> = std::result::Result<T, CamcorderError>;
