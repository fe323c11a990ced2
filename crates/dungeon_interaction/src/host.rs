// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capabilities the host engine provides to the interaction controller.
//!
//! The controller never looks at the scene graph directly. It talks to:
//! - cameras through [`CameraEntity`], with optional physics via
//!   [`PhysicsResettable`]
//! - camera lookup through [`CameraResolver`]
//! - banners, the active camera and renderer passes through [`Host`]

use crate::config::CameraPaths;
use crate::mode::Mode;
use dungeon_camcorder::Pose;
use parking_lot::Mutex;
use std::sync::Arc;

/// Read and write a pose
pub trait PoseSink {
    /// Current pose
    fn pose(&self) -> Pose;

    /// Move to `pose`
    fn set_pose(&mut self, pose: Pose);
}

/// A physics body whose motion can be cleared
pub trait PhysicsResettable {
    /// Zero force, torque, linear and angular velocity
    fn reset_motion(&mut self);
}

/// A scene camera
pub trait CameraEntity: PoseSink + Send {
    /// Scene name, used for logging
    fn name(&self) -> &str;

    /// Attached physics body, if any
    fn physics_body(&mut self) -> Option<&mut dyn PhysicsResettable> {
        None
    }

    /// Enable or disable the camera's input controllers
    fn set_interactive(&mut self, _interactive: bool) {}
}

/// Shared handle to a scene camera
pub type CameraHandle = Arc<Mutex<dyn CameraEntity>>;

/// Wrap a camera into a [`CameraHandle`]
pub fn camera_handle<C: CameraEntity + 'static>(camera: C) -> CameraHandle {
    Arc::new(Mutex::new(camera))
}

/// Whether two handles point at the same camera
pub fn same_camera(a: &CameraHandle, b: &CameraHandle) -> bool {
    Arc::ptr_eq(a, b)
}

/// Finds the camera a mode looks through
pub trait CameraResolver: Send {
    /// Camera for `mode`, `None` when the scene has no such camera
    fn resolve(&self, mode: Mode) -> Option<CameraHandle>;
}

/// Scene node lookup by path
pub trait SceneLookup: Send {
    /// Camera stored at `path`
    fn find_camera(&self, path: &str) -> Option<CameraHandle>;
}

/// Resolves cameras through configured scene paths
pub struct PathCameraResolver<S: SceneLookup> {
    scene: S,
    paths: CameraPaths,
}

impl<S: SceneLookup> PathCameraResolver<S> {
    /// Create a resolver over `scene`
    pub fn new(scene: S, paths: CameraPaths) -> Self {
        Self { scene, paths }
    }

    /// Configured paths
    pub fn paths(&self) -> &CameraPaths {
        &self.paths
    }
}

impl<S: SceneLookup> CameraResolver for PathCameraResolver<S> {
    fn resolve(&self, mode: Mode) -> Option<CameraHandle> {
        let slot = mode.camera_slot()?;
        let path = self.paths.path(slot);
        let camera = self.scene.find_camera(path);
        if camera.is_none() {
            tracing::debug!("No camera at '{}' for {} mode", path, mode);
        }
        camera
    }
}

/// Named renderer pass attributes
pub trait RenderPassSettings {
    /// Current value of `attribute` on `pass`
    fn attribute(&self, pass: &str, attribute: &str) -> Option<String>;

    /// Set `attribute` on `pass`, returns false when pass or attribute is unknown
    fn set_attribute(&mut self, pass: &str, attribute: &str, value: &str) -> bool;
}

/// Services of the host application
pub trait Host {
    /// Camera the scene is currently rendered through
    fn active_camera(&self) -> Option<CameraHandle>;

    /// Render through `camera` from now on
    fn set_active_camera(&mut self, camera: CameraHandle);

    /// Show a banner text for `timeout` seconds
    fn show_text(&mut self, text: &str, timeout: f32);

    /// Renderer pass attributes
    fn render_settings(&mut self) -> &mut dyn RenderPassSettings;
}
