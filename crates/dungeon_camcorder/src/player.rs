// SPDX-License-Identifier: MIT OR Apache-2.0
//! Replays keyframe tracks against elapsed time.

use crate::error::{CamcorderError, Result};
use crate::pose::Pose;
use crate::track::KeyframeTrack;

/// Events raised by the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback reached the end of the named track
    Finished(String),
}

/// The single running playback
#[derive(Debug)]
struct PlaybackSession {
    track: KeyframeTrack,
    elapsed: f32,
    cursor: usize,
}

/// Replays a [`KeyframeTrack`] one frame at a time
#[derive(Debug)]
pub struct Player {
    session: Option<PlaybackSession>,
    /// Playback speed multiplier
    pub speed: f32,
    pending_events: Vec<PlayerEvent>,
}

impl Player {
    /// Create an idle player
    pub fn new() -> Self {
        Self {
            session: None,
            speed: 1.0,
            pending_events: Vec::new(),
        }
    }

    /// Start replaying `track` from its beginning
    pub fn start_playback(&mut self, track: KeyframeTrack) -> Result<()> {
        if track.is_empty() {
            return Err(CamcorderError::EmptyTrack(track.name));
        }

        tracing::info!(
            "Started playback of '{}' ({} keyframes, {:.2}s)",
            track.name,
            track.keyframe_count(),
            track.duration()
        );
        self.session = Some(PlaybackSession {
            track,
            elapsed: 0.0,
            cursor: 0,
        });
        Ok(())
    }

    /// Advance playback and return the pose to apply.
    ///
    /// Returns `None` while idle. The tick that reaches the last keyframe
    /// returns the last pose, queues [`PlayerEvent::Finished`] and ends the
    /// session, so the event fires once per started playback.
    pub fn tick(&mut self, delta_time: f32) -> Option<Pose> {
        let session = self.session.as_mut()?;
        session.elapsed += (delta_time * self.speed).max(0.0);

        let (pose, cursor) = session.track.sample_from(session.cursor, session.elapsed)?;
        session.cursor = cursor;

        if session.elapsed >= session.track.duration() {
            if let Some(finished) = self.session.take() {
                tracing::info!("Playback of '{}' finished", finished.track.name);
                self.pending_events.push(PlayerEvent::Finished(finished.track.name));
            }
        }

        Some(pose)
    }

    /// Halt playback without raising [`PlayerEvent::Finished`]
    pub fn stop_playback(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(
                "Stopped playback of '{}' at {:.2}s",
                session.track.name,
                session.elapsed
            );
        }
    }

    /// Whether a playback is running
    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the running track
    pub fn track_name(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.track.name.as_str())
    }

    /// Seconds played so far
    pub fn elapsed(&self) -> f32 {
        self.session.as_ref().map(|s| s.elapsed).unwrap_or(0.0)
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line_track() -> KeyframeTrack {
        let mut track = KeyframeTrack::new("A");
        track.push(0.0, Pose::at([0.0, 0.0, 0.0]));
        track.push(2.0, Pose::at([10.0, 0.0, 0.0]));
        track
    }

    #[test]
    fn test_empty_track_rejected() {
        let mut player = Player::new();
        let result = player.start_playback(KeyframeTrack::new("empty"));
        assert!(matches!(result, Err(CamcorderError::EmptyTrack(name)) if name == "empty"));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_midpoint_sample() {
        let mut player = Player::new();
        player.start_playback(line_track()).unwrap();
        let pose = player.tick(1.0).unwrap();
        assert_eq!(pose.position, [5.0, 0.0, 0.0]);
        assert!(player.is_playing());
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_finished_fires_once() {
        let mut player = Player::new();
        player.start_playback(line_track()).unwrap();

        assert!(player.tick(1.5).is_some());
        assert!(player.take_events().is_empty());

        let last = player.tick(1.0).unwrap();
        assert_eq!(last.position, [10.0, 0.0, 0.0]);
        assert_eq!(player.take_events(), vec![PlayerEvent::Finished("A".to_string())]);
        assert!(!player.is_playing());

        assert!(player.tick(1.0).is_none());
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_stop_does_not_finish() {
        let mut player = Player::new();
        player.start_playback(line_track()).unwrap();
        player.tick(0.5);
        player.stop_playback();
        player.stop_playback();
        assert!(!player.is_playing());
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_restart_fires_again() {
        let mut player = Player::new();
        for _ in 0..2 {
            player.start_playback(line_track()).unwrap();
            player.tick(5.0);
        }
        assert_eq!(player.take_events().len(), 2);
    }

    #[test]
    fn test_single_keyframe_track() {
        let mut track = KeyframeTrack::new("still");
        track.push(0.0, Pose::at([1.0, 2.0, 3.0]));
        let mut player = Player::new();
        player.start_playback(track).unwrap();
        assert_eq!(player.tick(0.0).unwrap().position, [1.0, 2.0, 3.0]);
        assert_eq!(player.take_events().len(), 1);
    }

    fn arb_track() -> impl Strategy<Value = KeyframeTrack> {
        prop::collection::vec((0.01f32..1.0, -100.0f32..100.0, -1.0f32..1.0), 2..12).prop_map(|steps| {
            let mut track = KeyframeTrack::new("prop");
            let mut time = 0.0;
            for (dt, x, r) in steps {
                let rotation = crate::pose::Interpolation::normalize([r, 0.5, 0.0, 1.0]);
                track.push(time, Pose::new([x, -x, 0.5 * x], rotation));
                time += dt;
            }
            track
        })
    }

    proptest! {
        #[test]
        fn prop_exact_timestamps_return_keyframes(track in arb_track()) {
            let mut player = Player::new();
            for keyframe in track.keyframes() {
                player.start_playback(track.clone()).unwrap();
                prop_assert_eq!(player.tick(keyframe.time), Some(keyframe.pose));
            }
        }

        #[test]
        fn prop_finished_once_and_not_early(track in arb_track(), dt in 0.005f32..0.3) {
            let mut player = Player::new();
            player.start_playback(track.clone()).unwrap();
            let mut elapsed = 0.0;
            let mut finished = 0;
            for _ in 0..2000 {
                if player.tick(dt).is_none() {
                    break;
                }
                elapsed += dt;
                let events = player.take_events();
                if !events.is_empty() {
                    prop_assert!(elapsed >= track.duration() - 1e-3);
                }
                finished += events.len();
            }
            prop_assert_eq!(finished, 1);
        }
    }
}
