// SPDX-License-Identifier: MIT OR Apache-2.0
//! Random scene animators.
//!
//! Both animators walk a value towards a random destination in
//! `[-radius, radius]` at `speed` units per second. When the destination is
//! reached a new one is drawn from the injected RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Move `current` towards `destination`; draws a new destination on arrival
fn step_towards<R: Rng + ?Sized>(
    current: &mut f32,
    destination: &mut f32,
    step: f32,
    radius: f32,
    rng: &mut R,
) {
    if *current <= *destination {
        *current += step;
        if *current >= *destination {
            *current = *destination;
            *destination = random_offset(radius, rng);
        }
    } else {
        *current -= step;
        if *current <= *destination {
            *current = *destination;
            *destination = random_offset(radius, rng);
        }
    }
}

fn random_offset<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> f32 {
    rng.gen_range(-1.0f32..=1.0) * radius
}

/// Flickering light color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightFlicker {
    /// Intensity change per second
    pub speed: f32,
    /// Largest intensity offset
    pub radius: f32,
    /// Color the animated color is combined with
    pub fix_color: [f32; 3],
    /// Color scaled by the intensity
    pub color: [f32; 3],
    /// Multiply with the fixed color instead of adding to it
    pub multiply: bool,
    /// Keep the red channel at the fixed color
    pub keep_red: bool,
    /// Keep the green channel at the fixed color
    pub keep_green: bool,
    /// Keep the blue channel at the fixed color
    pub keep_blue: bool,
    #[serde(skip)]
    current: f32,
    #[serde(skip)]
    destination: f32,
}

impl Default for LightFlicker {
    fn default() -> Self {
        Self {
            speed: 2.0,
            radius: 0.5,
            fix_color: [0.5, 0.5, 0.5],
            color: [1.0, 1.0, 1.0],
            multiply: false,
            keep_red: false,
            keep_green: false,
            keep_blue: false,
            current: 1.0,
            destination: 1.0,
        }
    }
}

impl LightFlicker {
    /// Keep the masked channels at the fixed color
    pub fn with_channel_mask(mut self, keep_red: bool, keep_green: bool, keep_blue: bool) -> Self {
        self.keep_red = keep_red;
        self.keep_green = keep_green;
        self.keep_blue = keep_blue;
        self
    }

    /// Multiply with the fixed color instead of adding to it
    pub fn with_multiply(mut self, multiply: bool) -> Self {
        self.multiply = multiply;
        self
    }

    /// Current intensity
    pub fn intensity(&self) -> f32 {
        self.current
    }

    /// Advance by `delta_time` seconds and return the light color
    pub fn update<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) -> [f32; 3] {
        step_towards(
            &mut self.current,
            &mut self.destination,
            delta_time * self.speed,
            self.radius,
            rng,
        );
        self.color_at(self.current)
    }

    /// Light color for `intensity`, saturated to `[0, 1]`
    pub fn color_at(&self, intensity: f32) -> [f32; 3] {
        let keep = [self.keep_red, self.keep_green, self.keep_blue];
        let mut out = [0.0; 3];
        for i in 0..3 {
            let fixed = self.fix_color[i];
            let changed = self.color[i] * intensity;
            out[i] = if keep[i] {
                fixed
            } else if self.multiply {
                fixed * changed
            } else {
                fixed + changed
            };
            out[i] = out[i].clamp(0.0, 1.0);
        }
        out
    }
}

/// Random wandering around a fixed position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionWander {
    /// Units per second on each axis
    pub speed: f32,
    /// Largest offset on each axis
    pub radius: f32,
    /// Center of the wander
    pub fix_position: [f32; 3],
    #[serde(skip)]
    current: [f32; 3],
    #[serde(skip)]
    destination: [f32; 3],
}

impl Default for PositionWander {
    fn default() -> Self {
        Self::new([0.0; 3])
    }
}

impl PositionWander {
    /// Wander around `fix_position`
    pub fn new(fix_position: [f32; 3]) -> Self {
        Self {
            speed: 1.0,
            radius: 10.0,
            fix_position,
            current: [0.0; 3],
            destination: [0.0; 3],
        }
    }

    /// Change the largest offset on each axis
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Change the speed on each axis
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Offset from the fixed position
    pub fn offset(&self) -> [f32; 3] {
        self.current
    }

    /// Advance by `delta_time` seconds and return the new position
    pub fn update<R: Rng + ?Sized>(&mut self, delta_time: f32, rng: &mut R) -> [f32; 3] {
        let step = delta_time * self.speed;
        for i in 0..3 {
            step_towards(
                &mut self.current[i],
                &mut self.destination[i],
                step,
                self.radius,
                rng,
            );
        }
        [
            self.fix_position[0] + self.current[0],
            self.fix_position[1] + self.current[1],
            self.fix_position[2] + self.current[2],
        ]
    }
}
