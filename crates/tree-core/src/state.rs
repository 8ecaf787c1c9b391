//! Visual-side state types shared with the frontends.
//!
//! These types avoid referencing platform-specific APIs and are suitable for
//! use on both native and web targets. The renderer consumes them to build
//! camera matrices for the point cloud.

use crate::constants::{CAMERA_FOVY_DEG, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec3};

/// Where the camera sits and what it looks at. Produced once per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Perspective camera for `pose` using the shared lens settings.
    pub fn from_pose(pose: CameraPose, aspect: f32) -> Self {
        Self {
            eye: pose.eye,
            target: pose.target,
            up: Vec3::Y,
            aspect: if aspect.is_finite() && aspect > 0.0 {
                aspect
            } else {
                1.0
            },
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space right and up vectors of the view, for camera-facing quads.
    pub fn billboard_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        (right, up)
    }
}
