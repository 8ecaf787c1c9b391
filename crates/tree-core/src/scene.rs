//! Spatial configuration of every controlled object.
//!
//! Each particle and decoration gets two fixed endpoints at build time: a
//! scattered point and an assembled point on the tree. Per tick, the live
//! position is a blend of the two weighted by the smoothed openness.

use crate::constants::*;
use crate::error::{Result, TreeError};
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationKind {
    GiftBox,
    Ornament,
    /// Composite bell + ball pinned above the apex.
    Topper,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationGroup {
    pub kind: DecorationKind,
    pub color: [f32; 3],
    /// `[min_height, max_height]` the group is placed within.
    pub band: [f32; 2],
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TopperConfig {
    pub color: [f32; 3],
    pub assembled: Vec3,
    pub scattered: Vec3,
    pub tilt: f32,
}

impl Default for TopperConfig {
    fn default() -> Self {
        Self {
            color: GOLD,
            assembled: Vec3::from(TOPPER_ASSEMBLED),
            scattered: Vec3::from(TOPPER_SCATTERED),
            tilt: TOPPER_TILT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub particle_count: usize,
    pub tree_height: f32,
    pub radius_per_height: f32,
    pub winding_rate: f32,
    pub particle_scatter_extent: f32,
    pub decoration_scatter_extent: f32,
    pub sparkle_probability: f32,
    pub decorations: Vec<DecorationGroup>,
    pub topper: Option<TopperConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            tree_height: TREE_HEIGHT,
            radius_per_height: RADIUS_PER_HEIGHT,
            winding_rate: HELIX_WINDING_RATE,
            particle_scatter_extent: PARTICLE_SCATTER_EXTENT,
            decoration_scatter_extent: DECORATION_SCATTER_EXTENT,
            sparkle_probability: SPARKLE_PROBABILITY,
            decorations: vec![
                DecorationGroup {
                    kind: DecorationKind::GiftBox,
                    color: RED,
                    band: GIFT_BAND,
                    count: 15,
                },
                DecorationGroup {
                    kind: DecorationKind::GiftBox,
                    color: GREEN,
                    band: GIFT_BAND,
                    count: 15,
                },
                DecorationGroup {
                    kind: DecorationKind::Ornament,
                    color: RED,
                    band: ORNAMENT_BAND,
                    count: 20,
                },
                DecorationGroup {
                    kind: DecorationKind::Ornament,
                    color: SILVER,
                    band: ORNAMENT_BAND,
                    count: 20,
                },
            ],
            topper: Some(TopperConfig::default()),
        }
    }
}

impl SceneConfig {
    /// Change the tree height, keeping decoration bands and the topper at the
    /// same heights relative to the tree.
    pub fn set_tree_height(&mut self, height: f32) {
        let k = height / self.tree_height;
        if k.is_finite() && k > 0.0 {
            for g in &mut self.decorations {
                g.band = [g.band[0] * k, g.band[1] * k];
            }
            if let Some(topper) = &mut self.topper {
                topper.assembled.y *= k;
                topper.scattered.y *= k;
            }
        }
        // a non-positive height is left for `validate` to reject
        self.tree_height = height;
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.tree_height,
            self.radius_per_height,
            self.winding_rate,
            self.particle_scatter_extent,
            self.decoration_scatter_extent,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(TreeError::InvalidConfig(
                "scene parameters must be finite".into(),
            ));
        }
        if self.tree_height <= 0.0 {
            return Err(TreeError::InvalidConfig(format!(
                "tree height must be positive, got {}",
                self.tree_height
            )));
        }
        if self.radius_per_height < 0.0
            || self.particle_scatter_extent < 0.0
            || self.decoration_scatter_extent < 0.0
        {
            return Err(TreeError::InvalidConfig(
                "radius factor and scatter extents must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sparkle_probability) {
            return Err(TreeError::InvalidConfig(format!(
                "sparkle probability must be within [0, 1], got {}",
                self.sparkle_probability
            )));
        }
        for g in &self.decorations {
            let [lo, hi] = g.band;
            if !(lo.is_finite() && hi.is_finite()) || lo > hi || lo < 0.0 || hi > self.tree_height
            {
                return Err(TreeError::InvalidConfig(format!(
                    "decoration band [{lo}, {hi}] must lie within [0, {}]",
                    self.tree_height
                )));
            }
            if g.kind == DecorationKind::Topper {
                return Err(TreeError::InvalidConfig(
                    "the topper is configured separately, not as a group".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub scattered: Vec3,
    pub assembled: Vec3,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub color: [f32; 3],
    pub scattered: Vec3,
    pub assembled: Vec3,
    /// Euler angles at creation (radians).
    pub initial_rotation: Vec3,
    /// Spin about X and Y in rad/s, independent of the blend.
    pub rotation_speed: f32,
}

/// Live state of a decoration for the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DecorationPose {
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Radius of the tree silhouette at `height`, shrinking linearly to the apex.
#[inline]
pub fn tree_radius_at(height: f32, tree_height: f32, radius_per_height: f32) -> f32 {
    (tree_height - height).max(0.0) * radius_per_height
}

/// Convex blend between the two endpoints. Exact at `openness` 0 and 1.
#[inline]
pub fn blend(scattered: Vec3, assembled: Vec3, openness: f32) -> Vec3 {
    scattered * (1.0 - openness) + assembled * openness
}

/// Twinkle offset for particle `index`; zero once the tree is assembled.
#[inline]
pub fn particle_jitter(time: f32, index: usize, openness: f32) -> f32 {
    (time * JITTER_TIME_RATE + index as f32).sin() * JITTER_AMPLITUDE * (1.0 - openness)
}

fn random_in_cube(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
        (rng.gen::<f32>() - 0.5) * extent,
    )
}

fn on_ring(angle: f32, radius: f32, height: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
}

/// Immutable endpoints of every controlled object, indexed by object id.
#[derive(Clone, Debug)]
pub struct SceneLayout {
    pub particles: Vec<Particle>,
    pub decorations: Vec<Decoration>,
}

impl SceneLayout {
    pub fn build(config: &SceneConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let particles = (0..config.particle_count)
            .map(|_| Self::make_particle(config, &mut rng))
            .collect::<Vec<_>>();

        let mut decorations = Vec::new();
        for group in &config.decorations {
            for _ in 0..group.count {
                decorations.push(Self::make_decoration(config, group, &mut rng));
            }
        }
        if let Some(topper) = &config.topper {
            decorations.push(Decoration {
                kind: DecorationKind::Topper,
                color: topper.color,
                scattered: topper.scattered,
                assembled: topper.assembled,
                initial_rotation: Vec3::new(0.0, 0.0, topper.tilt),
                rotation_speed: 0.0,
            });
        }
        log::info!(
            "[scene] built {} particles, {} decorations (seed {})",
            particles.len(),
            decorations.len(),
            seed
        );
        Ok(Self {
            particles,
            decorations,
        })
    }

    fn make_particle(config: &SceneConfig, rng: &mut StdRng) -> Particle {
        let height = rng.gen::<f32>() * config.tree_height;
        let radius = tree_radius_at(height, config.tree_height, config.radius_per_height)
            * rng.gen::<f32>();
        let angle = height * config.winding_rate + rng.gen::<f32>() * TAU;
        let assembled = on_ring(angle, radius, height);
        let scattered = random_in_cube(rng, config.particle_scatter_extent);
        let color = if rng.gen::<f32>() < config.sparkle_probability {
            WHITE
        } else {
            GOLD
        };
        Particle {
            scattered,
            assembled,
            color,
        }
    }

    fn make_decoration(
        config: &SceneConfig,
        group: &DecorationGroup,
        rng: &mut StdRng,
    ) -> Decoration {
        let [lo, hi] = group.band;
        let height = lo + rng.gen::<f32>() * (hi - lo);
        let radius = tree_radius_at(height, config.tree_height, config.radius_per_height);
        let angle = rng.gen::<f32>() * TAU;
        Decoration {
            kind: group.kind,
            color: group.color,
            scattered: random_in_cube(rng, config.decoration_scatter_extent),
            assembled: on_ring(angle, radius, height),
            initial_rotation: Vec3::new(rng.gen(), rng.gen(), rng.gen()),
            rotation_speed: rng.gen::<f32>() * MAX_DECORATION_SPIN,
        }
    }
}

/// Layout plus the per-tick derived positions and rotations.
#[derive(Clone, Debug)]
pub struct LiveScene {
    layout: SceneLayout,
    particle_positions: Vec<Vec3>,
    decoration_poses: Vec<DecorationPose>,
}

impl LiveScene {
    pub fn new(layout: SceneLayout) -> Self {
        let particle_positions = layout.particles.iter().map(|p| p.scattered).collect();
        let decoration_poses = layout
            .decorations
            .iter()
            .map(|d| DecorationPose {
                position: d.scattered,
                rotation: d.initial_rotation,
            })
            .collect();
        Self {
            layout,
            particle_positions,
            decoration_poses,
        }
    }

    /// Recompute every live position for this tick. Decorations also spin by
    /// `rotation_speed * dt_sec` about X and Y.
    pub fn update(&mut self, openness: f32, time: f32, dt_sec: f32) {
        for (i, (p, out)) in self
            .layout
            .particles
            .iter()
            .zip(self.particle_positions.iter_mut())
            .enumerate()
        {
            let noise = particle_jitter(time, i, openness);
            *out = blend(p.scattered, p.assembled, openness) + Vec3::splat(noise);
        }
        for (d, pose) in self
            .layout
            .decorations
            .iter()
            .zip(self.decoration_poses.iter_mut())
        {
            pose.position = blend(d.scattered, d.assembled, openness);
            let spin = d.rotation_speed * dt_sec;
            pose.rotation.x += spin;
            pose.rotation.y += spin;
        }
    }

    #[inline]
    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    #[inline]
    pub fn particle_positions(&self) -> &[Vec3] {
        &self.particle_positions
    }

    #[inline]
    pub fn decoration_poses(&self) -> &[DecorationPose] {
        &self.decoration_poses
    }
}
