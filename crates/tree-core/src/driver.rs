//! Per-tick frame driver.
//!
//! Pulls the latest targets from the signal slot, advances smoothing,
//! recomputes every controlled object, and hands a borrowed frame to the
//! renderer. It never waits on the detector: whatever was last published is
//! what the tick uses.

use crate::config::TreeConfig;
use crate::error::{InitError, Result};
use crate::gesture::GestureExtractor;
use crate::orbit::OrbitController;
use crate::scene::{Decoration, DecorationPose, LiveScene, Particle, SceneLayout};
use crate::signals::{Published, SignalSlot, SignalSmoother, SmoothedSignals, TargetSignals};
use crate::state::CameraPose;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Scene or detector not ready yet, or start-up failed.
    Initializing,
    Tracking,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameOutput<'a> {
    pub particles: &'a [Particle],
    pub particle_positions: &'a [glam::Vec3],
    pub decorations: &'a [Decoration],
    pub decoration_poses: &'a [DecorationPose],
    pub camera: CameraPose,
    pub signals: SmoothedSignals,
    pub elapsed_sec: f64,
}

/// Renderer seam: push new state, request a redraw.
pub trait SceneRenderer {
    type Error;
    fn submit(&mut self, frame: &FrameOutput<'_>) -> std::result::Result<(), Self::Error>;
}

/// Substitutes the fallback openness once the detector has gone quiet.
#[derive(Clone, Debug)]
struct StalenessGuard {
    limit_sec: Option<f64>,
    fallback_openness: f32,
    last_generation: u64,
    last_change_at: f64,
    stale: bool,
}

impl StalenessGuard {
    fn resolve(&mut self, published: Published, now: f64) -> TargetSignals {
        if published.generation != self.last_generation {
            self.last_generation = published.generation;
            self.last_change_at = now;
            if self.stale {
                log::info!("[driver] detector signals resumed");
                self.stale = false;
            }
        }
        let Some(limit) = self.limit_sec else {
            return published.targets;
        };
        if published.generation == 0 || now - self.last_change_at <= limit {
            return published.targets;
        }
        if !self.stale {
            log::warn!(
                "[driver] no detector update for {:.1}s; falling back to the assembled tree",
                now - self.last_change_at
            );
            self.stale = true;
        }
        TargetSignals {
            openness: self.fallback_openness,
            rotation: published.targets.rotation,
        }
    }
}

pub struct FrameDriver {
    phase: Phase,
    detector_ready: bool,
    failure: Option<InitError>,
    scene: LiveScene,
    smoother: SignalSmoother,
    orbit: OrbitController,
    slot: SignalSlot,
    staleness: StalenessGuard,
    elapsed: f64,
}

impl FrameDriver {
    /// Validate `config` and build the scene. The driver starts in
    /// [`Phase::Initializing`] until the detector reports ready.
    pub fn new(config: &TreeConfig, slot: SignalSlot) -> Result<Self> {
        config.validate()?;
        let layout = SceneLayout::build(&config.scene, config.seed)?;
        let initial = SmoothedSignals {
            openness: config.initial_openness,
            rotation: slot.targets().rotation,
        };
        Ok(Self {
            phase: Phase::Initializing,
            detector_ready: false,
            failure: None,
            scene: LiveScene::new(layout),
            smoother: SignalSmoother::new(config.smoothing.clone(), initial),
            orbit: OrbitController::new(config.orbit.clone()),
            staleness: StalenessGuard {
                limit_sec: config.stale_after_secs.map(f64::from),
                fallback_openness: config.gesture.fallback_openness,
                last_generation: slot.latest().generation,
                last_change_at: 0.0,
                stale: false,
            },
            slot,
            elapsed: 0.0,
        })
    }

    /// A slot pre-loaded with the configured initial targets.
    pub fn initial_slot(config: &TreeConfig) -> SignalSlot {
        SignalSlot::new(TargetSignals {
            openness: config.initial_openness,
            rotation: 0.0,
        })
    }

    /// An extractor matching the driver's calibration.
    pub fn extractor(config: &TreeConfig) -> GestureExtractor {
        GestureExtractor::new(config.gesture.clone())
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn failure(&self) -> Option<&InitError> {
        self.failure.as_ref()
    }

    pub fn mark_detector_ready(&mut self) {
        self.detector_ready = true;
        if self.failure.is_some() {
            log::warn!("[driver] detector ready after a start-up failure; staying initializing");
            return;
        }
        if self.phase == Phase::Initializing {
            log::info!("[driver] initializing -> tracking");
            self.phase = Phase::Tracking;
        }
    }

    /// Pin the driver in `Initializing` and return the message for the host.
    /// Only the first failure is kept.
    pub fn report_init_failure(&mut self, err: InitError) -> String {
        if self.phase == Phase::Tracking {
            log::warn!("[driver] late start-up failure ignored while tracking: {err}");
            return err.to_string();
        }
        match &self.failure {
            Some(first) => first.to_string(),
            None => {
                let msg = err.to_string();
                log::error!("[driver] {msg}");
                self.failure = Some(err);
                msg
            }
        }
    }

    #[inline]
    pub fn signals(&self) -> SmoothedSignals {
        self.smoother.current()
    }

    #[inline]
    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn scene(&self) -> &LiveScene {
        &self.scene
    }

    #[inline]
    pub fn slot(&self) -> &SignalSlot {
        &self.slot
    }

    /// Advance one render tick. Returns `None` while initializing.
    pub fn tick(&mut self, dt: Duration) -> Option<FrameOutput<'_>> {
        if self.phase != Phase::Tracking {
            return None;
        }
        self.elapsed += dt.as_secs_f64();
        let targets = self.staleness.resolve(self.slot.latest(), self.elapsed);
        let signals = self.smoother.step(targets);
        let time = self.elapsed as f32;
        self.scene
            .update(signals.openness, time, dt.as_secs_f32());
        let camera = self.orbit.camera_pose(time, signals.rotation);
        let layout = self.scene.layout();
        Some(FrameOutput {
            particles: &layout.particles,
            particle_positions: self.scene.particle_positions(),
            decorations: &layout.decorations,
            decoration_poses: self.scene.decoration_poses(),
            camera,
            signals,
            elapsed_sec: self.elapsed,
        })
    }

    /// Tick and submit in one step. Renderer errors are returned to the host.
    pub fn render_to<R: SceneRenderer>(
        &mut self,
        dt: Duration,
        renderer: &mut R,
    ) -> Option<std::result::Result<(), R::Error>> {
        self.tick(dt).map(|frame| renderer.submit(&frame))
    }
}
