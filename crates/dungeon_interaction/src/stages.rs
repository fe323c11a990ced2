// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stage table for the making-of tour.
//!
//! Each stage shows a narration banner and switches renderer pass attributes
//! to demonstrate one part of the rendering pipeline. Tables are plain data
//! and can be loaded from RON.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// One renderer pass attribute assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSetting {
    /// Renderer pass name
    pub pass: String,
    /// Attribute name
    pub attribute: String,
    /// Value as string
    pub value: String,
}

impl PassSetting {
    /// Create a new setting
    pub fn new(pass: impl Into<String>, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pass: pass.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A timed stage of the tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStage {
    /// Seconds until the next stage
    pub timeout: f32,
    /// Narration banner, empty for none
    #[serde(default)]
    pub text: String,
    /// Attributes applied while this stage is current
    #[serde(default)]
    pub settings: Vec<PassSetting>,
}

impl SequenceStage {
    /// Create a stage without settings
    pub fn new(timeout: f32, text: impl Into<String>) -> Self {
        Self {
            timeout,
            text: text.into(),
            settings: Vec::new(),
        }
    }

    /// Add a pass setting
    pub fn with_setting(mut self, pass: &str, attribute: &str, value: &str) -> Self {
        self.settings.push(PassSetting::new(pass, attribute, value));
        self
    }
}

/// Ordered list of stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTable {
    stages: Vec<SequenceStage>,
}

impl StageTable {
    /// Create a table from stages
    pub fn new(stages: Vec<SequenceStage>) -> Self {
        Self { stages }
    }

    /// Get a stage
    pub fn stage(&self, index: usize) -> Option<&SequenceStage> {
        self.stages.get(index)
    }

    /// Get all stages
    pub fn stages(&self) -> &[SequenceStage] {
        &self.stages
    }

    /// Get stage count
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the table has no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Total tour length in seconds
    pub fn duration(&self) -> f32 {
        self.stages.iter().map(|s| s.timeout).sum()
    }

    /// Every (pass, attribute) pair any stage touches, in first use order
    pub fn touched_attributes(&self) -> IndexSet<(String, String)> {
        self.stages
            .iter()
            .flat_map(|s| s.settings.iter())
            .map(|s| (s.pass.clone(), s.attribute.clone()))
            .collect()
    }

    /// The built-in dungeon tour
    pub fn dungeon_tour() -> Self {
        const GBUFFER: &str = "DeferredGBuffer";
        const DEBUG: &str = "DeferredGBufferDebug";
        const AMBIENT: &str = "DeferredAmbient";
        const LIGHTING: &str = "DeferredLighting";
        const HDAO: &str = "DeferredHDAO";
        const GOD_RAYS: &str = "DeferredGodRays";
        const GLOW: &str = "DeferredGlow";
        const DOF: &str = "DeferredDepthOfField";

        Self::new(vec![
            SequenceStage::new(6.0, "Welcome to the making of the dungeon"),
            SequenceStage::new(5.0, "The scene is first rendered into a geometry buffer")
                .with_setting(DEBUG, "Flags", "")
                .with_setting(DEBUG, "Mode", "ShowAlbedo"),
            SequenceStage::new(5.0, "Normal vectors are stored per pixel")
                .with_setting(DEBUG, "Flags", "")
                .with_setting(DEBUG, "Mode", "ShowNormals"),
            SequenceStage::new(5.0, "Depth is stored as well")
                .with_setting(DEBUG, "Flags", "")
                .with_setting(DEBUG, "Mode", "ShowDepth"),
            SequenceStage::new(5.0, "Without lighting, only the ambient term remains")
                .with_setting(LIGHTING, "Flags", "Inactive")
                .with_setting(AMBIENT, "AmbientColor", "0.2 0.2 0.2"),
            SequenceStage::new(5.0, "Dynamic lights add the flickering torch light")
                .with_setting(AMBIENT, "AmbientColor", "0.0 0.0 0.0"),
            SequenceStage::new(5.0, "Ambient occlusion darkens corners and crevices")
                .with_setting(HDAO, "Contrast", "8.0")
                .with_setting(LIGHTING, "Flags", "Inactive"),
            SequenceStage::new(6.0, "Light shafts shine through the door")
                .with_setting(GOD_RAYS, "NumberOfSamples", "40")
                .with_setting(GOD_RAYS, "Density", "0.6"),
            SequenceStage::new(5.0, "Bright surfaces glow")
                .with_setting(GLOW, "GlowFactor", "4.0"),
            SequenceStage::new(5.0, "Depth of field blurs the distance")
                .with_setting(DOF, "FarBlurDepth", "8.0")
                .with_setting(DOF, "Flags", ""),
            SequenceStage::new(4.0, "All effects combined")
                .with_setting(GBUFFER, "Flags", ""),
        ])
    }

    /// Parse a table from RON
    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    /// Serialize the table to pretty RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

impl Default for StageTable {
    fn default() -> Self {
        Self::dungeon_tour()
    }
}
