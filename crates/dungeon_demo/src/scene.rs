// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory dungeon scene.
//!
//! Stands in for the engine: a handful of cameras keyed by scene path, the
//! renderer pass attributes the making-of touches, and a banner log.

use dungeon_camcorder::Pose;
use dungeon_interaction::{
    camera_handle, CameraEntity, CameraHandle, CameraPaths, Host, PhysicsResettable, PoseSink,
    RenderPassSettings, SceneLookup, StageTable,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Velocities and accumulated forces of a rigid body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidBody {
    /// Linear velocity
    pub linear_velocity: [f32; 3],
    /// Angular velocity
    pub angular_velocity: [f32; 3],
    /// Accumulated force
    pub force: [f32; 3],
    /// Accumulated torque
    pub torque: [f32; 3],
}

impl PhysicsResettable for RigidBody {
    fn reset_motion(&mut self) {
        if *self != Self::default() {
            tracing::debug!("Cleared rigid body motion");
        }
        *self = Self::default();
    }
}

/// Camera node of the scene
#[derive(Debug)]
pub struct SceneCamera {
    name: String,
    pose: Pose,
    body: Option<RigidBody>,
    interactive: bool,
}

impl SceneCamera {
    /// Camera without physics
    pub fn new(name: &str, position: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            pose: Pose::at(position),
            body: None,
            interactive: true,
        }
    }

    /// Attach a rigid body
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.body = Some(body);
        self
    }
}

impl PoseSink for SceneCamera {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}

impl CameraEntity for SceneCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn physics_body(&mut self) -> Option<&mut dyn PhysicsResettable> {
        self.body.as_mut().map(|b| b as &mut dyn PhysicsResettable)
    }

    fn set_interactive(&mut self, interactive: bool) {
        if self.interactive != interactive {
            let state = if interactive { "enabled" } else { "disabled" };
            tracing::debug!("{} controls {}", self.name, state);
        }
        self.interactive = interactive;
    }
}

/// Cameras by scene path, shared between the host and the resolver
#[derive(Clone, Default)]
pub struct SceneCameras {
    cameras: Arc<IndexMap<String, CameraHandle>>,
}

impl SceneCameras {
    /// The dungeon's four cameras at their configured paths
    pub fn dungeon(paths: &CameraPaths) -> Self {
        let mut cameras = IndexMap::new();
        let walk = SceneCamera::new("WalkCamera", [0.0, 1.8, 0.0]).with_body(RigidBody {
            linear_velocity: [0.0, -9.81, 0.0],
            ..Default::default()
        });
        cameras.insert(paths.walk.clone(), camera_handle(walk));
        cameras.insert(
            paths.free.clone(),
            camera_handle(SceneCamera::new("FreeCamera", [0.0, 3.0, 0.0])),
        );
        cameras.insert(
            paths.ghost.clone(),
            camera_handle(SceneCamera::new("GhostCamera", [0.0, 3.0, -5.0])),
        );
        cameras.insert(
            paths.making_of.clone(),
            camera_handle(SceneCamera::new("MakingOfCamera", [12.0, 2.0, 4.0])),
        );
        Self {
            cameras: Arc::new(cameras),
        }
    }

    /// All cameras with their scene paths
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CameraHandle)> {
        self.cameras.iter().map(|(path, camera)| (path.as_str(), camera))
    }
}

impl SceneLookup for SceneCameras {
    fn find_camera(&self, path: &str) -> Option<CameraHandle> {
        self.cameras.get(path).cloned()
    }
}

/// Renderer pass attributes
#[derive(Debug, Default)]
pub struct PassTable {
    values: IndexMap<(String, String), String>,
}

impl PassTable {
    /// Attributes touched by `table`, with the renderer defaults
    pub fn for_stages(table: &StageTable) -> Self {
        let mut values = IndexMap::new();
        for (pass, attribute) in table.touched_attributes() {
            let value = Self::default_value(&pass, &attribute).to_string();
            values.insert((pass, attribute), value);
        }
        Self { values }
    }

    fn default_value(pass: &str, attribute: &str) -> &'static str {
        match (pass, attribute) {
            ("DeferredGBufferDebug", "Flags") => "Inactive",
            ("DeferredGBufferDebug", "Mode") => "ShowAlbedo",
            ("DeferredAmbient", "AmbientColor") => "0.2 0.2 0.2",
            ("DeferredHDAO", "Contrast") => "4.0",
            ("DeferredGodRays", "NumberOfSamples") => "20",
            ("DeferredGodRays", "Density") => "0.3",
            ("DeferredGlow", "GlowFactor") => "2.0",
            ("DeferredDepthOfField", "FarBlurDepth") => "15.0",
            ("DeferredDepthOfField", "Flags") => "Inactive",
            _ => "",
        }
    }

    /// All attributes as `pass.attribute = value`
    pub fn entries(&self) -> impl Iterator<Item = (String, &str)> {
        self.values
            .iter()
            .map(|((pass, attribute), value)| (format!("{pass}.{attribute}"), value.as_str()))
    }
}

impl RenderPassSettings for PassTable {
    fn attribute(&self, pass: &str, attribute: &str) -> Option<String> {
        self.values
            .get(&(pass.to_string(), attribute.to_string()))
            .cloned()
    }

    fn set_attribute(&mut self, pass: &str, attribute: &str, value: &str) -> bool {
        match self.values.get_mut(&(pass.to_string(), attribute.to_string())) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }
}

/// Banner shown by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    /// Text
    pub text: String,
    /// Seconds visible
    pub timeout: f32,
}

/// Headless host
pub struct DemoHost {
    active: Option<CameraHandle>,
    passes: PassTable,
    banners: Vec<Banner>,
}

impl DemoHost {
    /// Host rendering `passes`
    pub fn new(passes: PassTable) -> Self {
        Self {
            active: None,
            passes,
            banners: Vec::new(),
        }
    }

    /// Banners shown so far
    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Renderer pass attributes
    pub fn passes(&self) -> &PassTable {
        &self.passes
    }

    /// Name of the active camera
    pub fn active_camera_name(&self) -> Option<String> {
        self.active.as_ref().map(|c| c.lock().name().to_string())
    }
}

impl Host for DemoHost {
    fn active_camera(&self) -> Option<CameraHandle> {
        self.active.clone()
    }

    fn set_active_camera(&mut self, camera: CameraHandle) {
        tracing::debug!("Active camera: {}", camera.lock().name());
        self.active = Some(camera);
    }

    fn show_text(&mut self, text: &str, timeout: f32) {
        tracing::info!("Banner ({:.1}s): {}", timeout, text);
        self.banners.push(Banner {
            text: text.to_string(),
            timeout,
        });
    }

    fn render_settings(&mut self) -> &mut dyn RenderPassSettings {
        &mut self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_lookup() {
        let paths = CameraPaths::default();
        let scene = SceneCameras::dungeon(&paths);
        assert_eq!(scene.iter().count(), 4);
        let walk = scene.find_camera(&paths.walk).unwrap();
        assert_eq!(walk.lock().name(), "WalkCamera");
        assert!(scene.find_camera("Container.Missing").is_none());
    }

    #[test]
    fn test_body_reset() {
        let mut camera = SceneCamera::new("WalkCamera", [0.0; 3]).with_body(RigidBody {
            linear_velocity: [1.0, 2.0, 3.0],
            torque: [0.5, 0.0, 0.0],
            ..Default::default()
        });
        camera.physics_body().unwrap().reset_motion();
        assert_eq!(camera.body, Some(RigidBody::default()));
    }

    #[test]
    fn test_pass_table_rejects_unknown() {
        let mut passes = PassTable::for_stages(&StageTable::dungeon_tour());
        assert_eq!(
            passes.attribute("DeferredGlow", "GlowFactor").as_deref(),
            Some("2.0")
        );
        assert!(passes.set_attribute("DeferredGlow", "GlowFactor", "4.0"));
        assert!(!passes.set_attribute("DeferredGlow", "Missing", "1"));
        assert_eq!(
            passes.attribute("DeferredGlow", "GlowFactor").as_deref(),
            Some("4.0")
        );
    }
}
