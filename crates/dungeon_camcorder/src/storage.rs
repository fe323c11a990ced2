// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named persistence for keyframe tracks.
//!
//! Tracks are stored as an ordered list of `{time, position, rotation}`
//! records. Two backends are provided:
//! - [`MemoryTrackStore`] for hosts that keep tracks in memory and for tests
//! - [`DirectoryTrackStore`] writing one file per record name, either as RON
//!   text or as bincode binary

use crate::error::{CamcorderError, Result};
use crate::pose::PoseKeyframe;
use crate::track::KeyframeTrack;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current track file format version
pub const TRACK_FORMAT_VERSION: u32 = 1;

/// Save and load tracks by record name
pub trait TrackStorage: Send {
    /// Persist `track` under `name`, replacing any previous track
    fn save(&mut self, name: &str, track: &KeyframeTrack) -> Result<()>;

    /// Load the track stored under `name`
    fn load(&self, name: &str) -> Result<KeyframeTrack>;

    /// Whether a track is stored under `name`
    fn contains(&self, name: &str) -> bool;
}

/// On-disk representation of a track
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrackFile {
    version: u32,
    name: String,
    keyframes: Vec<PoseKeyframe>,
}

impl TrackFile {
    fn from_track(name: &str, track: &KeyframeTrack) -> Self {
        Self {
            version: TRACK_FORMAT_VERSION,
            name: name.to_string(),
            keyframes: track.keyframes().to_vec(),
        }
    }

    fn into_track(self) -> Result<KeyframeTrack> {
        if self.version > TRACK_FORMAT_VERSION {
            return Err(CamcorderError::UnsupportedVersion {
                found: self.version,
                supported: TRACK_FORMAT_VERSION,
            });
        }
        Ok(KeyframeTrack::from_keyframes(self.name, self.keyframes))
    }
}

/// In-memory track store
#[derive(Debug, Default, Clone)]
pub struct MemoryTrackStore {
    tracks: IndexMap<String, KeyframeTrack>,
}

impl MemoryTrackStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl TrackStorage for MemoryTrackStore {
    fn save(&mut self, name: &str, track: &KeyframeTrack) -> Result<()> {
        if name.is_empty() {
            return Err(CamcorderError::InvalidName);
        }
        let mut stored = track.clone();
        stored.name = name.to_string();
        self.tracks.insert(name.to_string(), stored);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<KeyframeTrack> {
        self.tracks
            .get(name)
            .cloned()
            .ok_or_else(|| CamcorderError::TrackNotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.tracks.contains_key(name)
    }
}

/// File format for [`DirectoryTrackStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackFormat {
    /// Human readable RON
    #[default]
    Ron,
    /// Compact bincode
    Binary,
}

impl TrackFormat {
    /// File extension used for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TrackFormat::Ron => "track.ron",
            TrackFormat::Binary => "track.bin",
        }
    }
}

/// Stores each track as `<directory>/<name>.<extension>`
#[derive(Debug, Clone)]
pub struct DirectoryTrackStore {
    directory: PathBuf,
    format: TrackFormat,
}

impl DirectoryTrackStore {
    /// Create a store rooted at `directory`; the directory is created on first save
    pub fn new(directory: impl Into<PathBuf>, format: TrackFormat) -> Self {
        Self {
            directory: directory.into(),
            format,
        }
    }

    /// Root directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file for a record name
    pub fn track_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", name, self.format.extension()))
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(CamcorderError::InvalidName);
        }
        Ok(())
    }
}

impl TrackStorage for DirectoryTrackStore {
    fn save(&mut self, name: &str, track: &KeyframeTrack) -> Result<()> {
        Self::validate_name(name)?;
        std::fs::create_dir_all(&self.directory)?;

        let file = TrackFile::from_track(name, track);
        let path = self.track_path(name);
        match self.format {
            TrackFormat::Ron => {
                let config = ron::ser::PrettyConfig::default()
                    .struct_names(true)
                    .enumerate_arrays(false);
                let content = ron::ser::to_string_pretty(&file, config)?;
                std::fs::write(&path, content)?;
            }
            TrackFormat::Binary => {
                let content = bincode::serialize(&file)?;
                std::fs::write(&path, content)?;
            }
        }

        tracing::info!("Saved track '{}' to {:?}", name, path);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<KeyframeTrack> {
        Self::validate_name(name)?;
        let path = self.track_path(name);
        if !path.exists() {
            return Err(CamcorderError::TrackNotFound(name.to_string()));
        }

        let file: TrackFile = match self.format {
            TrackFormat::Ron => ron::from_str(&std::fs::read_to_string(&path)?)?,
            TrackFormat::Binary => bincode::deserialize(&std::fs::read(&path)?)?,
        };

        tracing::debug!("Loaded track '{}' from {:?}", name, path);
        file.into_track()
    }

    fn contains(&self, name: &str) -> bool {
        Self::validate_name(name).is_ok() && self.track_path(name).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Interpolation, Pose};

    fn sample_track() -> KeyframeTrack {
        let mut track = KeyframeTrack::new("Movie");
        track.push(0.0, Pose::new([0.1, 0.2, 0.3], Interpolation::normalize([0.1, 0.7, 0.3, 0.2])));
        track.push(1.0 / 3.0, Pose::new([1e-7, -3.25, 1234.5678], [0.0, 0.0, 0.0, 1.0]));
        track.push(0.7, Pose::new([2.0 / 3.0, -0.1, 98765.43], [0.5, 0.5, 0.5, 0.5]));
        track
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryTrackStore::new();
        assert!(!store.contains("Movie"));
        store.save("Movie", &sample_track()).unwrap();
        assert!(store.contains("Movie"));
        assert_eq!(store.load("Movie").unwrap().keyframes(), sample_track().keyframes());
        assert!(matches!(store.load("Other"), Err(CamcorderError::TrackNotFound(_))));
    }

    #[test]
    fn test_ron_directory_store_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryTrackStore::new(dir.path().join("tracks"), TrackFormat::Ron);
        store.save("Movie", &sample_track()).unwrap();

        assert!(store.contains("Movie"));
        let loaded = store.load("Movie").unwrap();
        assert_eq!(loaded.name, "Movie");
        assert_eq!(loaded.keyframes(), sample_track().keyframes());
    }

    #[test]
    fn test_binary_directory_store_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryTrackStore::new(dir.path(), TrackFormat::Binary);
        store.save("Movie", &sample_track()).unwrap();
        assert_eq!(store.load("Movie").unwrap().keyframes(), sample_track().keyframes());
    }

    #[test]
    fn test_missing_track() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryTrackStore::new(dir.path(), TrackFormat::Ron);
        assert!(matches!(store.load("Nope"), Err(CamcorderError::TrackNotFound(_))));
    }

    #[test]
    fn test_path_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryTrackStore::new(dir.path(), TrackFormat::Ron);
        assert!(matches!(store.save("../escape", &sample_track()), Err(CamcorderError::InvalidName)));
        assert!(matches!(store.save("", &sample_track()), Err(CamcorderError::InvalidName)));
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryTrackStore::new(dir.path(), TrackFormat::Ron);
        let file = TrackFile {
            version: TRACK_FORMAT_VERSION + 1,
            name: "Future".to_string(),
            keyframes: Vec::new(),
        };
        let content = ron::ser::to_string(&file).unwrap();
        std::fs::write(store.track_path("Future"), content).unwrap();

        assert!(matches!(
            store.load("Future"),
            Err(CamcorderError::UnsupportedVersion { found, .. }) if found == TRACK_FORMAT_VERSION + 1
        ));
    }
}
