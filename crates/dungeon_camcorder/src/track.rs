// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe tracks holding recorded camera poses.

use crate::pose::{Pose, PoseKeyframe};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Named, time ordered sequence of camera poses.
///
/// Timestamps are finite and strictly increasing. A track only grows through
/// [`KeyframeTrack::push`], which the recorder calls once per sampled frame.
/// Deserialized tracks go through [`KeyframeTrack::from_keyframes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UncheckedTrack")]
pub struct KeyframeTrack {
    /// Unique track ID
    pub id: TrackId,
    /// Record name
    pub name: String,
    keyframes: Vec<PoseKeyframe>,
}

impl KeyframeTrack {
    /// Create an empty track
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            keyframes: Vec::new(),
        }
    }

    /// Build a track from keyframes, sorting them and dropping duplicate or
    /// non-finite timestamps
    pub fn from_keyframes(name: impl Into<String>, mut keyframes: Vec<PoseKeyframe>) -> Self {
        let name = name.into();
        let count = keyframes.len();
        keyframes.retain(|k| k.time.is_finite());
        if keyframes.len() != count {
            tracing::warn!(
                "Dropped {} keyframes with non-finite time from '{}'",
                count - keyframes.len(),
                name
            );
        }
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        keyframes.dedup_by(|later, earlier| later.time <= earlier.time);
        Self {
            id: TrackId::new(),
            name,
            keyframes,
        }
    }

    /// Append a keyframe.
    ///
    /// A keyframe that does not move time forward replaces the pose of the
    /// last keyframe instead. Non-finite times are ignored.
    pub fn push(&mut self, time: f32, pose: Pose) {
        if !time.is_finite() {
            return;
        }
        match self.keyframes.last_mut() {
            Some(last) if time <= last.time => last.pose = pose,
            _ => self.keyframes.push(PoseKeyframe::new(time, pose)),
        }
    }

    /// Remove all keyframes
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[PoseKeyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Index of the first keyframe at or after `time`
    pub fn next_index(&self, time: f32) -> usize {
        self.keyframes.partition_point(|k| k.time < time)
    }

    /// Evaluate the pose at a given time.
    ///
    /// Times before the first keyframe clamp to the first pose, times after the
    /// last clamp to the last pose. A time landing exactly on a keyframe returns
    /// that keyframe's pose untouched.
    pub fn sample(&self, time: f32) -> Option<Pose> {
        self.sample_from(0, time).map(|(pose, _)| pose)
    }

    /// Evaluate the pose at `time`, scanning forward from `hint`.
    ///
    /// Returns the pose and the index of the first keyframe at or after `time`,
    /// which callers with monotonic time can pass back as the next hint.
    pub fn sample_from(&self, hint: usize, time: f32) -> Option<(Pose, usize)> {
        if self.keyframes.is_empty() {
            return None;
        }

        let mut idx = hint.min(self.keyframes.len());
        if idx > 0 && self.keyframes[idx - 1].time >= time {
            // Hint is ahead of the requested time
            idx = self.next_index(time);
        }
        while idx < self.keyframes.len() && self.keyframes[idx].time < time {
            idx += 1;
        }

        let pose = match idx {
            0 => self.keyframes[0].pose,
            i if i == self.keyframes.len() => self.keyframes[i - 1].pose,
            i => {
                let b = &self.keyframes[i];
                if b.time == time {
                    b.pose
                } else {
                    let a = &self.keyframes[i - 1];
                    let t = (time - a.time) / (b.time - a.time);
                    a.pose.interpolate(&b.pose, t)
                }
            }
        };

        Some((pose, idx))
    }
}

/// Serialized form of a track before its keyframes are checked
#[derive(Deserialize)]
struct UncheckedTrack {
    id: TrackId,
    name: String,
    keyframes: Vec<PoseKeyframe>,
}

impl From<UncheckedTrack> for KeyframeTrack {
    fn from(raw: UncheckedTrack) -> Self {
        Self {
            id: raw.id,
            ..Self::from_keyframes(raw.name, raw.keyframes)
        }
    }
}
