// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory host used by the unit tests.

use crate::host::{
    camera_handle, CameraEntity, CameraHandle, CameraResolver, Host, PhysicsResettable, PoseSink,
    RenderPassSettings,
};
use crate::mode::Mode;
use dungeon_camcorder::Pose;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Ordered log of host side effects
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub struct TestBody {
    journal: Journal,
    owner: String,
}

impl PhysicsResettable for TestBody {
    fn reset_motion(&mut self) {
        self.journal.lock().push(format!("reset {}", self.owner));
    }
}

pub struct TestCamera {
    name: String,
    pose: Pose,
    body: Option<TestBody>,
    journal: Journal,
}

impl PoseSink for TestCamera {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
}

impl CameraEntity for TestCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn physics_body(&mut self) -> Option<&mut dyn PhysicsResettable> {
        self.body.as_mut().map(|b| b as &mut dyn PhysicsResettable)
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.journal
            .lock()
            .push(format!("interactive {} {}", self.name, interactive));
    }
}

pub fn test_camera(name: &str, position: [f32; 3], physics: bool, journal: &Journal) -> CameraHandle {
    camera_handle(TestCamera {
        name: name.to_string(),
        pose: Pose::at(position),
        body: physics.then(|| TestBody {
            journal: journal.clone(),
            owner: name.to_string(),
        }),
        journal: journal.clone(),
    })
}

#[derive(Default)]
pub struct TestSettings {
    pub values: IndexMap<(String, String), String>,
}

impl TestSettings {
    pub fn with(mut self, pass: &str, attribute: &str, value: &str) -> Self {
        self.values
            .insert((pass.to_string(), attribute.to_string()), value.to_string());
        self
    }

    pub fn get(&self, pass: &str, attribute: &str) -> &str {
        self.values
            .get(&(pass.to_string(), attribute.to_string()))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl RenderPassSettings for TestSettings {
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

pub struct TestHost {
    pub journal: Journal,
    pub active: Option<CameraHandle>,
    pub banners: Vec<(String, f32)>,
    pub settings: TestSettings,
}

impl TestHost {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            active: None,
            banners: Vec::new(),
            settings: TestSettings::default(),
        }
    }

    pub fn banner_texts(&self) -> Vec<&str> {
        self.banners.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl Host for TestHost {
    fn active_camera(&self) -> Option<CameraHandle> {
        self.active.clone()
    }

    fn set_active_camera(&mut self, camera: CameraHandle) {
        let name = camera.lock().name().to_string();
        self.journal.lock().push(format!("activate {}", name));
        self.active = Some(camera);
    }

    fn show_text(&mut self, text: &str, timeout: f32) {
        self.banners.push((text.to_string(), timeout));
    }

    fn render_settings(&mut self) -> &mut dyn RenderPassSettings {
        &mut self.settings
    }
}

/// Resolver over a fixed mode to camera map
#[derive(Default)]
pub struct TestResolver {
    pub cameras: IndexMap<Mode, CameraHandle>,
}

impl CameraResolver for TestResolver {
    fn resolve(&self, mode: Mode) -> Option<CameraHandle> {
        self.cameras.get(&mode).cloned()
    }
}
