use glam::Vec3;

// Shared tuning constants used by both web and native frontends.
// Everything here is a default; `TreeConfig` carries the live values.

// Gesture calibration
pub const OPENNESS_BIAS: f32 = 0.2; // avg wrist-to-fingertip spread of a relaxed fist
pub const OPENNESS_GAIN: f32 = 2.5; // maps (spread - bias) onto 0..1
pub const LATERAL_SENSITIVITY: f32 = 4.0; // rotation per unit offset from frame center
pub const FALLBACK_OPENNESS: f32 = 1.0; // no hand in frame -> assembled tree

// Smoothing (fraction of the remaining gap closed per render tick)
pub const OPENNESS_ALPHA: f32 = 0.1;
pub const ROTATION_ALPHA: f32 = 0.05;

// Tree geometry
pub const TREE_HEIGHT: f32 = 30.0;
pub const RADIUS_PER_HEIGHT: f32 = 0.4; // base radius = TREE_HEIGHT * RADIUS_PER_HEIGHT
pub const HELIX_WINDING_RATE: f32 = 2.0; // radians per unit height
pub const PARTICLE_COUNT: usize = 4000;
pub const PARTICLE_SCATTER_EXTENT: f32 = 100.0; // side of the scatter cube
pub const DECORATION_SCATTER_EXTENT: f32 = 80.0;

// Particle twinkle while scattered
pub const JITTER_AMPLITUDE: f32 = 0.2;
pub const JITTER_TIME_RATE: f32 = 2.0;

// Particle palette
pub const GOLD: [f32; 3] = [1.0, 0.843, 0.0];
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
pub const SPARKLE_PROBABILITY: f32 = 0.1; // share of white particles

// Decorations
pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
pub const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
pub const SILVER: [f32; 3] = [0.753, 0.753, 0.753];
pub const MAX_DECORATION_SPIN: f32 = 3.0; // rad/s
pub const GIFT_BAND: [f32; 2] = [0.0, 10.0];
pub const ORNAMENT_BAND: [f32; 2] = [5.0, 25.0];
pub const TOPPER_ASSEMBLED: [f32; 3] = [0.0, 31.0, 0.0];
pub const TOPPER_SCATTERED: [f32; 3] = [0.0, 50.0, 0.0];
pub const TOPPER_TILT: f32 = 0.2; // rad about Z

// Visual sizing (world units)
pub const PARTICLE_SIZE: f32 = 0.4;
pub const GIFT_SIZE: f32 = 1.5;
pub const ORNAMENT_SIZE: f32 = 1.6;
pub const TOPPER_BELL_SIZE: f32 = 3.5;
pub const TOPPER_BALL_SIZE: f32 = 1.6;
pub const TOPPER_BALL_DROP: f32 = 1.2; // ball hangs below the bell center

// Camera orbit
pub const AUTO_ORBIT_RATE: f32 = 0.2; // rad/s ambient spin
pub const GESTURE_ANGLE_SCALE: f32 = 2.0;
pub const ORBIT_RADIUS: f32 = 40.0;
pub const CAMERA_HEIGHT: f32 = 15.0;
pub const LOOK_AT: [f32; 3] = [0.0, 15.0, 0.0];
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Detector stream
pub const STALE_AFTER_SECS: f32 = 3.0;
pub const DEFAULT_SEED: u64 = 42;

#[inline]
pub fn look_at_vec3() -> Vec3 {
    Vec3::from(LOOK_AT)
}
