// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dungeon configuration.
//!
//! This module manages the demo settings including:
//! - Presentation flags (expert, repeat and developer mode)
//! - Record names for the movie and developer tests
//! - Scene paths of the mode cameras
//! - Track storage location and format
//! - The making-of stage table

use crate::mode::{CameraSlot, Mode};
use crate::stages::StageTable;
use dungeon_camcorder::TrackFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "Dungeon.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// Record names used by the camcorder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordNames {
    /// Full movie
    pub movie: String,
    /// Short movie used in developer mode
    pub short_movie: String,
    /// Record toggled with the developer keys
    pub test: String,
}

impl Default for RecordNames {
    fn default() -> Self {
        Self {
            movie: "Movie".to_string(),
            short_movie: "ShortMovie".to_string(),
            test: "Test".to_string(),
        }
    }
}

/// Scene paths of the mode cameras
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPaths {
    /// Walk camera
    pub walk: String,
    /// Free camera
    pub free: String,
    /// Ghost camera, also flies the movie
    pub ghost: String,
    /// Making-of camera
    pub making_of: String,
}

impl CameraPaths {
    /// Path for a camera slot
    pub fn path(&self, slot: CameraSlot) -> &str {
        match slot {
            CameraSlot::Walk => &self.walk,
            CameraSlot::Free => &self.free,
            CameraSlot::Ghost => &self.ghost,
            CameraSlot::MakingOf => &self.making_of,
        }
    }
}

impl Default for CameraPaths {
    fn default() -> Self {
        Self {
            walk: "Container.kanal3.WalkCamera".to_string(),
            free: "Container.kanal3.FreeCamera".to_string(),
            ghost: "Container.kanal3.GhostCamera".to_string(),
            making_of: "Container.WineCellar.MakingOfCamera".to_string(),
        }
    }
}

/// Where recorded tracks live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Track directory
    pub directory: PathBuf,
    /// File format
    pub format: TrackFormat,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Data/Camcorder"),
            format: TrackFormat::Ron,
        }
    }
}

/// Making-of tour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakingOfSettings {
    /// Playback speed of the tour
    pub time_scale: f32,
    /// Playback speed in developer mode
    pub developer_time_scale: f32,
    /// Tour stages
    pub stages: StageTable,
}

impl Default for MakingOfSettings {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            developer_time_scale: 2.0,
            stages: StageTable::dungeon_tour(),
        }
    }
}

/// Dungeon demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Format version
    pub version: u32,
    /// No help banners
    pub expert_mode: bool,
    /// Restart the movie after the making-of instead of switching to free mode
    pub repeat_mode: bool,
    /// Short movie, camcorder keys and faster making-of
    pub developer_mode: bool,
    /// Mode entered on start
    pub initial_mode: Mode,
    /// Seconds a mode banner stays visible
    pub banner_timeout: f32,
    /// Banner shown once on start
    pub welcome_text: String,
    /// Seconds the welcome banner stays visible
    pub welcome_timeout: f32,
    /// Record names
    pub records: RecordNames,
    /// Camera scene paths
    pub cameras: CameraPaths,
    /// Track storage
    pub tracks: TrackSettings,
    /// Making-of tour
    pub making_of: MakingOfSettings,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            expert_mode: false,
            repeat_mode: false,
            developer_mode: false,
            initial_mode: Mode::Movie,
            banner_timeout: 5.0,
            welcome_text: "Press ESC to open menu".to_string(),
            welcome_timeout: 10.0,
            records: RecordNames::default(),
            cameras: CameraPaths::default(),
            tracks: TrackSettings::default(),
            making_of: MakingOfSettings::default(),
        }
    }
}

impl DungeonConfig {
    /// Load the configuration from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DungeonConfig = ron::from_str(&content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load the configuration, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save the configuration to a RON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Record played in movie mode
    pub fn movie_record(&self) -> &str {
        if self.developer_mode {
            &self.records.short_movie
        } else {
            &self.records.movie
        }
    }

    /// Speed of the making-of tour
    pub fn making_of_time_scale(&self) -> f32 {
        if self.developer_mode {
            self.making_of.developer_time_scale
        } else {
            self.making_of.time_scale
        }
    }
}
