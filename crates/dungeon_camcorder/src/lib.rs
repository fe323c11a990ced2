// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera keyframe recording and playback for the Dungeon demo.
//!
//! This crate provides:
//! - Camera poses with linear/spherical interpolation
//! - Keyframe tracks with strictly increasing timestamps
//! - A recorder sampling one pose per frame into named tracks
//! - A player replaying a track against elapsed time
//! - Named track storage (memory, RON or bincode files)
//! - Fixed frame rate rotation key recording
//!
//! ## Architecture
//!
//! Everything is driven by an explicit frame delta. Recorder and player are
//! independent of each other; the owner decides which of the two runs.

pub mod error;
pub mod player;
pub mod pose;
pub mod recorder;
pub mod rotation_record;
pub mod storage;
pub mod track;

pub use error::{CamcorderError, Result};
pub use player::{Player, PlayerEvent};
pub use pose::{Interpolation, Pose, PoseKeyframe, IDENTITY_ROTATION};
pub use recorder::Recorder;
pub use rotation_record::{RotationChunk, RotationKeyframeRecorder};
pub use storage::{DirectoryTrackStore, MemoryTrackStore, TrackFormat, TrackStorage, TRACK_FORMAT_VERSION};
pub use track::{KeyframeTrack, TrackId};
