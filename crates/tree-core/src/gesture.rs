//! Hand pose types and the mapping from one detected pose to the two
//! control signals (openness and lateral rotation).
//!
//! Landmark coordinates are normalized to the camera frame with the origin at
//! the top-left. The frame is shown mirrored to the user, so a hand that
//! appears on the left of the display has a raw `x` greater than 0.5.

use crate::constants::*;
use crate::error::{Result, TreeError};
use crate::signals::TargetSignals;
use glam::Vec2;

pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices fixed by the hand detector's model.
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;

    pub const FINGERTIPS: [usize; 5] = [
        THUMB_TIP,
        INDEX_FINGER_TIP,
        MIDDLE_FINGER_TIP,
        RING_FINGER_TIP,
        PINKY_TIP,
    ];
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Relative depth, when the detector reports it.
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// One frame's worth of hand keypoints. Built per detection, never retained.
#[derive(Clone, Debug, PartialEq)]
pub struct HandPose {
    keypoints: [Landmark; LANDMARK_COUNT],
}

impl HandPose {
    pub fn new(keypoints: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { keypoints }
    }

    /// Decode a flat `[x, y, (z), x, y, (z), ...]` buffer as delivered by the
    /// browser bridge. `stride` is 2 for planar payloads and 3 with depth.
    pub fn from_flat(values: &[f32], stride: usize) -> Result<Self> {
        if !(2..=3).contains(&stride) || values.len() != LANDMARK_COUNT * stride {
            return Err(TreeError::LandmarkCount {
                expected: LANDMARK_COUNT,
                got: values.len() / stride.max(1),
            });
        }
        let mut keypoints = [Landmark::default(); LANDMARK_COUNT];
        for (index, (kp, chunk)) in keypoints
            .iter_mut()
            .zip(values.chunks_exact(stride))
            .enumerate()
        {
            if chunk.iter().any(|v| !v.is_finite()) {
                return Err(TreeError::NonFiniteLandmark { index });
            }
            *kp = Landmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk.get(2).copied(),
            };
        }
        Ok(Self { keypoints })
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.keypoints.get(index)
    }

    #[inline]
    pub fn keypoints(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.keypoints
    }

    /// Mean planar distance from the wrist to each of the five fingertips.
    pub fn average_spread(&self) -> f32 {
        let wrist = self.keypoints[landmarks::WRIST].xy();
        let total: f32 = landmarks::FINGERTIPS
            .iter()
            .map(|&i| self.keypoints[i].xy().distance(wrist))
            .sum();
        total / landmarks::FINGERTIPS.len() as f32
    }
}

/// The only calibration surface of the system.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureCalibration {
    pub openness_bias: f32,
    pub openness_gain: f32,
    pub lateral_sensitivity: f32,
    /// Landmark whose x drives rotation. Near the palm center, not the wrist.
    pub palm_landmark: usize,
    pub fallback_openness: f32,
}

impl Default for GestureCalibration {
    fn default() -> Self {
        Self {
            openness_bias: OPENNESS_BIAS,
            openness_gain: OPENNESS_GAIN,
            lateral_sensitivity: LATERAL_SENSITIVITY,
            palm_landmark: landmarks::MIDDLE_FINGER_MCP,
            fallback_openness: FALLBACK_OPENNESS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct GestureExtractor {
    pub calibration: GestureCalibration,
}

impl GestureExtractor {
    pub fn new(calibration: GestureCalibration) -> Self {
        Self { calibration }
    }

    /// A NaN spread maps to the fallback openness.
    #[inline]
    pub fn openness_from_spread(&self, avg_spread: f32) -> f32 {
        let c = &self.calibration;
        let openness = (avg_spread - c.openness_bias) * c.openness_gain;
        if openness.is_nan() {
            return c.fallback_openness;
        }
        openness.clamp(0.0, 1.0)
    }

    #[inline]
    pub fn rotation_from_x(&self, palm_x: f32) -> f32 {
        (0.5 - palm_x) * self.calibration.lateral_sensitivity
    }

    /// Map this frame's detection onto new target signals.
    ///
    /// Without a hand, openness falls back to the assembled tree and the
    /// rotation target keeps whatever the last hand left behind.
    pub fn extract(&self, pose: Option<&HandPose>, previous: TargetSignals) -> TargetSignals {
        match pose {
            None => TargetSignals {
                openness: self.calibration.fallback_openness,
                rotation: previous.rotation,
            },
            Some(pose) => {
                let openness = self.openness_from_spread(pose.average_spread());
                let rotation = pose
                    .landmark(self.calibration.palm_landmark)
                    .map(|lm| self.rotation_from_x(lm.x))
                    .filter(|r| r.is_finite())
                    .unwrap_or(previous.rotation);
                TargetSignals { openness, rotation }
            }
        }
    }
}

/// Build a plausible hand whose palm center sits at `palm` and whose five
/// fingertips are exactly `spread` away from the wrist.
///
/// Used by the pointer-driven simulator and by tests that need a pose with a
/// known average spread.
pub fn synthetic_hand(palm: Vec2, spread: f32) -> HandPose {
    let spread = spread.max(0.0);
    let wrist = palm + Vec2::new(0.0, 0.6 * spread.max(0.05));
    let mut keypoints = [Landmark::new(palm.x, palm.y); LANDMARK_COUNT];
    keypoints[landmarks::WRIST] = Landmark::new(wrist.x, wrist.y);

    // Fan the five fingers around "up" (negative y in image space).
    let fan = [-1.1_f32, -0.45, 0.0, 0.4, 0.8];
    for (finger, angle) in fan.iter().enumerate() {
        let dir = Vec2::new(angle.sin(), -angle.cos());
        // joints 1..=4 of each finger, tip last
        let base = 1 + finger * 4;
        for joint in 0..4 {
            let t = (joint + 1) as f32 / 4.0;
            let p = wrist + dir * spread * t;
            keypoints[base + joint] = Landmark::new(p.x, p.y);
        }
    }
    keypoints[landmarks::MIDDLE_FINGER_MCP] = Landmark::new(palm.x, palm.y);
    HandPose::new(keypoints)
}
