// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted making-of sequence.
//!
//! Walks through a [`StageTable`]. Every stage boundary restores the renderer
//! pass values captured at start, then applies the next stage's settings and
//! shows its narration. Stage timeouts count down with `dt * time_scale` and
//! leftover time carries into the next stage.

use crate::host::Host;
use crate::stages::{PassSetting, StageTable};

/// Extra seconds a narration banner stays up so consecutive stages with the
/// same text do not flicker
const BANNER_OVERLAP: f32 = 1.0;

/// Speed used when a non-positive or non-finite time scale is configured
const DEFAULT_TIME_SCALE: f32 = 1.0;

fn checked_time_scale(time_scale: f32) -> f32 {
    if time_scale.is_finite() && time_scale > 0.0 {
        time_scale
    } else {
        tracing::warn!(
            "Invalid making-of time scale {}, using {}",
            time_scale,
            DEFAULT_TIME_SCALE
        );
        DEFAULT_TIME_SCALE
    }
}

/// Events raised by the sequence player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    /// A stage boundary was crossed; `to` is `None` past the last stage
    StageAdvanced {
        /// Stage that ended
        from: usize,
        /// Stage that began
        to: Option<usize>,
    },
    /// The last stage ended
    Finished,
}

/// Plays a stage table against the host's renderer settings
pub struct ScriptedSequencePlayer {
    table: StageTable,
    time_scale: f32,
    stage: Option<usize>,
    stage_timeout: f32,
    baseline: Vec<PassSetting>,
    pending_events: Vec<SequenceEvent>,
}

impl ScriptedSequencePlayer {
    /// Create a player for `table` running at `time_scale`.
    ///
    /// A time scale that is not a positive number falls back to 1.
    pub fn new(table: StageTable, time_scale: f32) -> Self {
        Self {
            table,
            time_scale: checked_time_scale(time_scale),
            stage: None,
            stage_timeout: 0.0,
            baseline: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Stage table
    pub fn table(&self) -> &StageTable {
        &self.table
    }

    /// Playback speed
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Change the playback speed
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = checked_time_scale(time_scale);
    }

    /// Current stage, `None` when not playing
    pub fn stage(&self) -> Option<usize> {
        self.stage
    }

    /// Seconds left in the current stage, in table time
    pub fn stage_timeout(&self) -> f32 {
        self.stage_timeout
    }

    /// Whether a sequence runs
    pub fn is_playing(&self) -> bool {
        self.stage.is_some()
    }

    /// Capture the baseline and enter the first stage
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.stop(host);

        let settings = host.render_settings();
        self.baseline = self
            .table
            .touched_attributes()
            .into_iter()
            .filter_map(|(pass, attribute)| {
                let value = settings.attribute(&pass, &attribute);
                if value.is_none() {
                    tracing::warn!("Unknown renderer attribute {}.{}", pass, attribute);
                }
                value.map(|value| PassSetting {
                    pass,
                    attribute,
                    value,
                })
            })
            .collect();

        if self.table.is_empty() {
            tracing::warn!("Making-of stage table is empty");
            self.pending_events.push(SequenceEvent::Finished);
            return;
        }

        tracing::info!("Making-of started with {} stages", self.table.len());
        self.stage_timeout = 0.0;
        self.enter_stage(0, host);
    }

    /// Advance by `delta_time` seconds; negative or non-finite steps are ignored
    pub fn tick<H: Host + ?Sized>(&mut self, delta_time: f32, host: &mut H) {
        let Some(mut current) = self.stage else {
            return;
        };
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::warn!("Ignoring making-of time step {}", delta_time);
            return;
        }

        self.stage_timeout -= delta_time * self.time_scale;
        while self.stage_timeout <= 0.0 {
            self.restore_baseline(host);

            let next = current + 1;
            if next >= self.table.len() {
                self.pending_events.push(SequenceEvent::StageAdvanced {
                    from: current,
                    to: None,
                });
                self.stop(host);
                self.pending_events.push(SequenceEvent::Finished);
                tracing::info!("Making-of finished");
                return;
            }

            tracing::debug!("Making-of stage {} -> {}", current, next);
            self.pending_events.push(SequenceEvent::StageAdvanced {
                from: current,
                to: Some(next),
            });
            self.enter_stage(next, host);
            current = next;
        }
    }

    /// Restore the baseline and leave the sequence; no event is raised
    pub fn stop<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.stage.take().is_none() {
            return;
        }
        self.restore_baseline(host);
        self.baseline.clear();
        self.stage_timeout = 0.0;
    }

    /// Get pending events and clear them
    pub fn take_events(&mut self) -> Vec<SequenceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn enter_stage<H: Host + ?Sized>(&mut self, index: usize, host: &mut H) {
        let Some(stage) = self.table.stage(index) else {
            return;
        };
        self.stage = Some(index);
        if stage.timeout.is_finite() {
            self.stage_timeout += stage.timeout;
        }

        let settings = host.render_settings();
        for setting in &stage.settings {
            if !settings.set_attribute(&setting.pass, &setting.attribute, &setting.value) {
                tracing::warn!(
                    "Failed to set renderer attribute {}.{}",
                    setting.pass,
                    setting.attribute
                );
            }
        }

        if !stage.text.is_empty() {
            host.show_text(&stage.text, stage.timeout / self.time_scale + BANNER_OVERLAP);
        }
    }

    fn restore_baseline<H: Host + ?Sized>(&self, host: &mut H) {
        let settings = host.render_settings();
        for setting in &self.baseline {
            settings.set_attribute(&setting.pass, &setting.attribute, &setting.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::SequenceStage;
    use crate::testing::{journal, TestHost, TestSettings};

    fn host() -> TestHost {
        let mut host = TestHost::new(&journal());
        host.settings = TestSettings::default()
            .with("Debug", "Mode", "Off")
            .with("Glow", "Factor", "1.0");
        host
    }

    fn table() -> StageTable {
        StageTable::new(vec![
            SequenceStage::new(5.0, "Albedo").with_setting("Debug", "Mode", "ShowAlbedo"),
            SequenceStage::new(3.0, "Glow").with_setting("Glow", "Factor", "4.0"),
            SequenceStage::new(2.0, "Done"),
        ])
    }

    #[test]
    fn test_stage_index_before_start() {
        let player = ScriptedSequencePlayer::new(table(), 1.0);
        assert_eq!(player.stage(), None);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_start_applies_first_stage() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);

        assert_eq!(player.stage(), Some(0));
        assert_eq!(host.settings.get("Debug", "Mode"), "ShowAlbedo");
        assert_eq!(host.banners, vec![("Albedo".to_string(), 6.0)]);
    }

    #[test]
    fn test_three_stage_scenario() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);

        player.tick(5.0, &mut host);
        player.tick(3.0, &mut host);
        player.tick(2.0, &mut host);

        let events = player.take_events();
        let advances = events
            .iter()
            .filter(|e| matches!(e, SequenceEvent::StageAdvanced { .. }))
            .count();
        assert_eq!(advances, 3);
        assert_eq!(events.last(), Some(&SequenceEvent::Finished));
        assert_eq!(
            events.iter().filter(|e| **e == SequenceEvent::Finished).count(),
            1
        );
        assert!(!player.is_playing());

        player.tick(10.0, &mut host);
        assert!(player.take_events().is_empty());
    }

    #[test]
    fn test_reset_before_configure() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);

        player.tick(5.0, &mut host);
        assert_eq!(host.settings.get("Debug", "Mode"), "Off");
        assert_eq!(host.settings.get("Glow", "Factor"), "4.0");
        assert_eq!(host.banners.last(), Some(&("Glow".to_string(), 4.0)));
    }

    #[test]
    fn test_leftover_time_carries() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);

        player.tick(6.0, &mut host);
        assert_eq!(player.stage(), Some(1));
        assert_eq!(player.stage_timeout(), 2.0);

        player.tick(9.0, &mut host);
        assert!(!player.is_playing());
        let events = player.take_events();
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_time_scale() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 2.0);
        player.start(&mut host);
        assert_eq!(host.banners[0].1, 3.5);

        player.tick(2.5, &mut host);
        assert_eq!(player.stage(), Some(1));
    }

    #[test]
    fn test_invalid_time_scale_falls_back() {
        for scale in [0.0, -2.0, f32::NAN] {
            let mut host = host();
            let mut player = ScriptedSequencePlayer::new(table(), scale);
            assert_eq!(player.time_scale(), 1.0);
            player.start(&mut host);
            assert_eq!(host.banners[0].1, 6.0);

            player.tick(5.0, &mut host);
            assert_eq!(player.stage(), Some(1));
        }

        let mut player = ScriptedSequencePlayer::new(table(), 2.0);
        player.set_time_scale(0.0);
        assert_eq!(player.time_scale(), 1.0);
        player.set_time_scale(0.5);
        assert_eq!(player.time_scale(), 0.5);
    }

    #[test]
    fn test_bad_time_step_is_ignored() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);

        player.tick(f32::NAN, &mut host);
        player.tick(-3.0, &mut host);
        player.tick(f32::INFINITY, &mut host);
        assert_eq!(player.stage(), Some(0));
        assert_eq!(player.stage_timeout(), 5.0);

        player.tick(5.0, &mut host);
        player.tick(3.0, &mut host);
        player.tick(2.0, &mut host);
        assert!(!player.is_playing());
        assert_eq!(player.take_events().last(), Some(&SequenceEvent::Finished));
    }

    #[test]
    fn test_stop_restores_baseline() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(table(), 1.0);
        player.start(&mut host);
        player.tick(5.0, &mut host);

        player.stop(&mut host);
        player.stop(&mut host);
        assert_eq!(host.settings.get("Debug", "Mode"), "Off");
        assert_eq!(host.settings.get("Glow", "Factor"), "1.0");
        assert!(!player
            .take_events()
            .iter()
            .any(|e| *e == SequenceEvent::Finished));
    }

    #[test]
    fn test_empty_table_finishes() {
        let mut host = host();
        let mut player = ScriptedSequencePlayer::new(StageTable::new(Vec::new()), 1.0);
        player.start(&mut host);
        assert!(!player.is_playing());
        assert_eq!(player.take_events(), vec![SequenceEvent::Finished]);
    }
}
