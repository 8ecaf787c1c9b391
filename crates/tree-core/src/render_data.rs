//! GPU-facing layouts shared by every renderer, and the packing of one frame
//! into camera-facing quad instances.

use crate::constants::*;
use crate::driver::FrameOutput;
use crate::scene::DecorationKind;
use crate::state::Camera;
use glam::Vec3;

// Shape codes understood by `scene.wgsl`
pub const SHAPE_GLOW: u32 = 0;
pub const SHAPE_BOX: u32 = 1;
pub const SHAPE_ORB: u32 = 2;
pub const SHAPE_BELL: u32 = 3;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub cam_right: [f32; 4],
    pub cam_up: [f32; 4],
}

impl SceneUniforms {
    pub fn from_camera(camera: &Camera) -> Self {
        let (right, up) = camera.billboard_axes();
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub pos: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    /// In-plane rotation of the quad (radians)
    pub spin: f32,
    pub shape: u32,
    pub _pad: [u32; 2],
}

impl InstanceData {
    fn new(pos: Vec3, size: f32, rgb: [f32; 3], alpha: f32, spin: f32, shape: u32) -> Self {
        Self {
            pos: pos.to_array(),
            size,
            color: [rgb[0], rgb[1], rgb[2], alpha],
            spin,
            shape,
            _pad: [0; 2],
        }
    }
}

/// Leading instances of [`pack_frame`]'s output that use additive blending.
/// Everything after them is a solid decoration.
#[inline]
pub fn glow_instance_count(frame: &FrameOutput<'_>) -> usize {
    frame.particle_positions.len()
}

/// Number of instances [`pack_frame`] will emit for this frame.
pub fn instance_count(frame: &FrameOutput<'_>) -> usize {
    frame.particle_positions.len()
        + frame
            .decorations
            .iter()
            .map(|d| match d.kind {
                DecorationKind::Topper => 2,
                _ => 1,
            })
            .sum::<usize>()
}

/// Pack particles first, then decorations. The topper expands into a bell
/// body and the ball hanging beneath it.
pub fn pack_frame(frame: &FrameOutput<'_>, out: &mut Vec<InstanceData>) {
    out.clear();
    out.reserve(instance_count(frame));
    for (p, pos) in frame.particles.iter().zip(frame.particle_positions) {
        out.push(InstanceData::new(*pos, PARTICLE_SIZE, p.color, 0.8, 0.0, SHAPE_GLOW));
    }
    for (d, pose) in frame.decorations.iter().zip(frame.decoration_poses) {
        match d.kind {
            DecorationKind::GiftBox => out.push(InstanceData::new(
                pose.position,
                GIFT_SIZE,
                d.color,
                1.0,
                pose.rotation.x,
                SHAPE_BOX,
            )),
            DecorationKind::Ornament => out.push(InstanceData::new(
                pose.position,
                ORNAMENT_SIZE,
                d.color,
                1.0,
                0.0,
                SHAPE_ORB,
            )),
            DecorationKind::Topper => {
                out.push(InstanceData::new(
                    pose.position,
                    TOPPER_BELL_SIZE,
                    d.color,
                    1.0,
                    pose.rotation.z,
                    SHAPE_BELL,
                ));
                out.push(InstanceData::new(
                    pose.position - Vec3::Y * TOPPER_BALL_DROP,
                    TOPPER_BALL_SIZE,
                    d.color,
                    1.0,
                    0.0,
                    SHAPE_ORB,
                ));
            }
        }
    }
}
