use crate::constants::*;
use crate::state::CameraPose;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitParams {
    /// Ambient spin, rad/s
    pub base_rate: f32,
    /// Radians of orbit per unit of smoothed rotation signal
    pub gesture_scale: f32,
    pub radius: f32,
    pub height: f32,
    pub look_at: Vec3,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            base_rate: AUTO_ORBIT_RATE,
            gesture_scale: GESTURE_ANGLE_SCALE,
            radius: ORBIT_RADIUS,
            height: CAMERA_HEIGHT,
            look_at: look_at_vec3(),
        }
    }
}

/// Orbits the camera around the tree at a fixed radius and look-at point.
///
/// The angle combines a slow ambient spin with the smoothed gesture rotation.
/// Particles and decorations share one world frame, so orbiting the camera
/// turns the whole scene together.
#[derive(Clone, Debug, Default)]
pub struct OrbitController {
    pub params: OrbitParams,
}

impl OrbitController {
    pub fn new(params: OrbitParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn auto_angle(&self, elapsed_sec: f32) -> f32 {
        elapsed_sec * self.params.base_rate
    }

    #[inline]
    pub fn angle(&self, elapsed_sec: f32, rotation: f32) -> f32 {
        self.auto_angle(elapsed_sec) + rotation * self.params.gesture_scale
    }

    pub fn camera_pose(&self, elapsed_sec: f32, rotation: f32) -> CameraPose {
        let a = self.angle(elapsed_sec, rotation);
        CameraPose {
            eye: Vec3::new(
                a.sin() * self.params.radius,
                self.params.height,
                a.cos() * self.params.radius,
            ),
            target: self.params.look_at,
        }
    }
}
