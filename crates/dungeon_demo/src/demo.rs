// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame loop of the headless demo.

use crate::scene::{DemoHost, PassTable, SceneCameras};
use dungeon_camcorder::{
    CamcorderError, DirectoryTrackStore, KeyframeTrack, MemoryTrackStore, Pose,
    RotationKeyframeRecorder, TrackStorage,
};
use dungeon_interaction::{
    ConfigError, DungeonConfig, Host, InteractionError, InteractionEvent, Key, KeyboardInput,
    LightFlicker, ModeController, PathCameraResolver, PositionWander,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Frame rate of the rotation key recording
const ROTATION_KEYS_FPS: u32 = 25;

/// Demo errors
#[derive(Debug, Error)]
pub enum DemoError {
    /// Controller failure
    #[error(transparent)]
    Interaction(#[from] InteractionError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Track storage failure
    #[error(transparent)]
    Camcorder(#[from] CamcorderError),
}

/// How the demo runs
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Frames to simulate
    pub frames: u64,
    /// Seconds per frame
    pub delta_time: f32,
    /// Seed of the animator RNG
    pub seed: u64,
    /// Keep tracks in memory instead of the track directory
    pub in_memory: bool,
    /// Keys pressed at given frames
    pub key_presses: Vec<(u64, Key)>,
    /// Write the active camera's rotation keys here
    pub rotation_keys: Option<PathBuf>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            frames: 3600,
            delta_time: 1.0 / 60.0,
            seed: 0,
            in_memory: false,
            key_presses: Vec::new(),
            rotation_keys: None,
        }
    }
}

/// Flight through the dungeon: one lap around the hall, facing the center
pub fn dungeon_flight(name: &str, seconds: f32) -> KeyframeTrack {
    const STEPS: usize = 16;
    const RADIUS: f32 = 8.0;

    let mut track = KeyframeTrack::new(name);
    for step in 0..=STEPS {
        let t = step as f32 / STEPS as f32;
        let angle = t * std::f32::consts::TAU;
        let position = [RADIUS * angle.cos(), 2.5, RADIUS * angle.sin()];
        let yaw = -angle - std::f32::consts::FRAC_PI_2;
        let rotation = [0.0, (yaw * 0.5).sin(), 0.0, (yaw * 0.5).cos()];
        track.push(t * seconds, Pose::new(position, rotation));
    }
    track
}

fn open_storage(config: &DungeonConfig, in_memory: bool) -> Result<Box<dyn TrackStorage>, DemoError> {
    let mut storage: Box<dyn TrackStorage> = if in_memory {
        Box::new(MemoryTrackStore::new())
    } else {
        Box::new(DirectoryTrackStore::new(
            config.tracks.directory.clone(),
            config.tracks.format,
        ))
    };

    let movies = [(&config.records.movie, 60.0), (&config.records.short_movie, 10.0)];
    for (name, seconds) in movies {
        if !storage.contains(name) {
            tracing::info!("No '{}' record, generating a {:.0}s flight", name, seconds);
            storage.save(name, &dungeon_flight(name, seconds))?;
        }
    }
    Ok(storage)
}

/// Run the demo and return a JSON report
pub fn run(config: DungeonConfig, options: &DemoOptions) -> Result<serde_json::Value, DemoError> {
    let scene = SceneCameras::dungeon(&config.cameras);
    let storage = open_storage(&config, options.in_memory)?;
    let host = DemoHost::new(PassTable::for_stages(&config.making_of.stages));
    let resolver = PathCameraResolver::new(scene.clone(), config.cameras.clone());

    let mut controller = ModeController::new(host, Box::new(resolver), storage, config);
    let mut input = KeyboardInput::new();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut torches = [
        LightFlicker::default(),
        LightFlicker::default(),
        LightFlicker::default().with_channel_mask(false, false, true),
    ];
    let mut lantern = PositionWander::new([0.0, 2.0, 0.0]).with_radius(0.5);
    let mut rotation_keys = options
        .rotation_keys
        .clone()
        .map(|path| RotationKeyframeRecorder::new(ROTATION_KEYS_FPS, Some(path)));
    if let Some(recorder) = rotation_keys.as_mut() {
        recorder.start();
    }

    controller.start()?;

    let mut transitions = Vec::new();
    let mut playbacks = Vec::new();
    let mut stage_advances = 0;
    let mut light_color = [0.0; 3];
    let mut lantern_position = [0.0; 3];

    for frame in 0..options.frames {
        for (_, key) in options.key_presses.iter().filter(|(at, _)| *at == frame) {
            if let Err(e) = input.handle_key(*key, &mut controller) {
                tracing::warn!("Key {:?} failed: {}", key, e);
            }
        }

        controller.update(options.delta_time);

        for torch in &mut torches {
            light_color = torch.update(options.delta_time, &mut rng);
        }
        lantern_position = lantern.update(options.delta_time, &mut rng);

        if let (Some(recorder), Some(camera)) =
            (rotation_keys.as_mut(), controller.host().active_camera())
        {
            let rotation = camera.lock().pose().rotation;
            recorder.update(rotation, options.delta_time);
        }

        for event in controller.take_events() {
            match event {
                InteractionEvent::ModeChanged { from, to } => {
                    transitions.push(json!({ "frame": frame, "from": from, "to": to }));
                }
                InteractionEvent::PlaybackFinished(name) => playbacks.push(name),
                InteractionEvent::StageAdvanced { .. } => stage_advances += 1,
                InteractionEvent::SequenceFinished => {
                    tracing::info!("Making-of finished at frame {}", frame);
                }
            }
        }
    }

    let rotation_key_count = match rotation_keys.as_mut() {
        Some(recorder) => recorder.stop()?.map_or(0, |chunk| chunk.keys.len()),
        None => 0,
    };

    let host = controller.host();
    let cameras: serde_json::Map<String, serde_json::Value> = scene
        .iter()
        .map(|(path, camera)| {
            let camera = camera.lock();
            (path.to_string(), json!(camera.pose().position))
        })
        .collect();
    let passes: serde_json::Map<String, serde_json::Value> = host
        .passes()
        .entries()
        .map(|(key, value)| (key, json!(value)))
        .collect();

    Ok(json!({
        "frames": options.frames,
        "seconds": options.frames as f32 * options.delta_time,
        "mode": controller.mode(),
        "active_camera": host.active_camera_name(),
        "transitions": transitions,
        "finished_playbacks": playbacks,
        "stage_advances": stage_advances,
        "banners": host
            .banners()
            .iter()
            .map(|b| json!({ "text": b.text, "timeout": b.timeout }))
            .collect::<Vec<_>>(),
        "cameras": cameras,
        "passes": passes,
        "torch_color": light_color,
        "lantern_position": lantern_position,
        "rotation_keys": rotation_key_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_camcorder::RotationChunk;
    use dungeon_interaction::{Mode, SequenceStage, StageTable};

    fn quick_config() -> DungeonConfig {
        let mut config = DungeonConfig::default();
        config.making_of.stages = StageTable::new(vec![
            SequenceStage::new(1.0, "One").with_setting("DeferredGlow", "GlowFactor", "4.0"),
            SequenceStage::new(1.0, "Two"),
        ]);
        config
    }

    fn options(frames: u64) -> DemoOptions {
        DemoOptions {
            frames,
            delta_time: 0.5,
            in_memory: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_flight_is_closed_loop() {
        let track = dungeon_flight("Movie", 16.0);
        assert_eq!(track.duration(), 16.0);
        let first = track.keyframes()[0].pose.position;
        let last = track.keyframes()[track.keyframe_count() - 1].pose.position;
        assert!((first[0] - last[0]).abs() < 1e-4);
        assert!((first[2] - last[2]).abs() < 1e-4);
    }

    #[test]
    fn test_movie_chains_into_free_mode() {
        // 60 s movie, 2 s making-of
        let report = run(quick_config(), &options(130)).unwrap();
        assert_eq!(report["mode"], json!(Mode::Free));
        assert_eq!(report["finished_playbacks"], json!(["Movie"]));
        assert_eq!(report["stage_advances"], json!(2));
        assert_eq!(report["passes"]["DeferredGlow.GlowFactor"], json!("2.0"));
    }

    #[test]
    fn test_key_presses() {
        let opts = DemoOptions {
            key_presses: vec![(2, Key::Num1), (4, Key::Num3)],
            ..options(6)
        };
        let report = run(quick_config(), &opts).unwrap();
        assert_eq!(report["mode"], json!(Mode::Ghost));
        assert_eq!(report["transitions"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_expert_mode_report_has_no_banners() {
        let config = DungeonConfig {
            expert_mode: true,
            ..quick_config()
        };
        let report = run(config, &options(10)).unwrap();
        assert_eq!(report["banners"], json!([]));
    }

    #[test]
    fn test_scene_animators_in_report() {
        let report = run(quick_config(), &options(40)).unwrap();
        let lantern: Vec<f64> = report["lantern_position"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(lantern.len(), 3);
        assert!((lantern[1] - 2.0).abs() <= 0.5 + 1e-4);

        let torch = report["torch_color"].as_array().unwrap();
        assert_eq!(torch[2].as_f64(), Some(0.5));
    }

    #[test]
    fn test_rotation_keys_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("camera.keys");
        let opts = DemoOptions {
            rotation_keys: Some(path.clone()),
            ..options(4)
        };
        let report = run(quick_config(), &opts).unwrap();
        let chunk = RotationChunk::load(&path).unwrap();
        assert_eq!(chunk.frames_per_second, ROTATION_KEYS_FPS);
        assert_eq!(report["rotation_keys"], json!(chunk.keys.len()));
        assert!(!chunk.keys.is_empty());
    }

    #[test]
    fn test_directory_storage_generates_movies() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = quick_config();
        config.tracks.directory = dir.path().to_path_buf();
        let storage = open_storage(&config, false).unwrap();
        assert!(storage.contains("Movie"));
        assert!(storage.contains("ShortMovie"));
    }
}
