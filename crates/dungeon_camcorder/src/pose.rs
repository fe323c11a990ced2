// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera poses and the interpolation used to blend between them.

use serde::{Deserialize, Serialize};

/// Identity rotation quaternion (x, y, z, w)
pub const IDENTITY_ROTATION: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Position and rotation of a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
}

impl Pose {
    /// Create a new pose
    pub fn new(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self { position, rotation }
    }

    /// Pose at the given position with identity rotation
    pub fn at(position: [f32; 3]) -> Self {
        Self::new(position, IDENTITY_ROTATION)
    }

    /// Blend towards `other` by `t` in `[0, 1]`
    pub fn interpolate(&self, other: &Pose, t: f32) -> Pose {
        Pose {
            position: Interpolation::lerp_vec3(self.position, other.position, t),
            rotation: Interpolation::slerp(self.rotation, other.rotation, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at([0.0, 0.0, 0.0])
    }
}

/// A pose captured at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseKeyframe {
    /// Seconds since the start of the record
    pub time: f32,
    /// Captured pose
    pub pose: Pose,
}

impl PoseKeyframe {
    /// Create a new keyframe
    pub fn new(time: f32, pose: Pose) -> Self {
        Self { time, pose }
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Interpolate Vec3
    pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
        ]
    }

    /// Interpolate Vec4
    pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        [
            Self::lerp(a[0], b[0], t),
            Self::lerp(a[1], b[1], t),
            Self::lerp(a[2], b[2], t),
            Self::lerp(a[3], b[3], t),
        ]
    }

    /// Normalize a quaternion, falling back to identity for a zero quaternion
    pub fn normalize(q: [f32; 4]) -> [f32; 4] {
        let len = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
        if len <= f32::EPSILON {
            return IDENTITY_ROTATION;
        }
        [q[0] / len, q[1] / len, q[2] / len, q[3] / len]
    }

    /// Spherical linear interpolation for quaternions
    pub fn slerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
        let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

        // Take the short way around
        let mut b = b;
        if dot < 0.0 {
            b = [-b[0], -b[1], -b[2], -b[3]];
            dot = -dot;
        }

        // Nearly parallel, sin(theta_0) would blow up
        if dot > 0.9995 {
            return Self::normalize(Self::lerp_vec4(a, b, t));
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();

        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;

        [
            a[0] * s0 + b[0] * s1,
            a[1] * s0 + b[1] * s1,
            a[2] * s0 + b[2] * s1,
            a[3] * s0 + b[3] * s1,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
    }

    #[test]
    fn test_lerp_midpoint() {
        assert_eq!(Interpolation::lerp_vec3([0.0; 3], [10.0, 0.0, -4.0], 0.5), [5.0, 0.0, -2.0]);
    }

    #[test]
    fn test_slerp_quarter_turn() {
        // 0 and 90 degrees around Y, halfway is 45 degrees
        let half = std::f32::consts::FRAC_PI_4;
        let b = [0.0, half.sin(), 0.0, half.cos()];
        let mid = Interpolation::slerp(IDENTITY_ROTATION, b, 0.5);
        let quarter = std::f32::consts::FRAC_PI_8;
        assert!(approx(mid, [0.0, quarter.sin(), 0.0, quarter.cos()]));
    }

    #[test]
    fn test_slerp_takes_short_path() {
        let a = IDENTITY_ROTATION;
        let b = [0.0, 0.0, 0.0, -1.0];
        let mid = Interpolation::slerp(a, b, 0.5);
        assert!(approx(mid, IDENTITY_ROTATION));
    }

    #[test]
    fn test_slerp_endpoints() {
        let half = 0.6_f32;
        let b = [half.sin(), 0.0, 0.0, half.cos()];
        assert!(approx(Interpolation::slerp(IDENTITY_ROTATION, b, 0.0), IDENTITY_ROTATION));
        assert!(approx(Interpolation::slerp(IDENTITY_ROTATION, b, 1.0), b));
    }

    #[test]
    fn test_normalize_zero_quaternion() {
        assert_eq!(Interpolation::normalize([0.0; 4]), IDENTITY_ROTATION);
    }
}
