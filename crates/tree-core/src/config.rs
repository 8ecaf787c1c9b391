//! Runtime configuration.
//!
//! Hosts start from `TreeConfig::default()` and layer `key=value` overrides on
//! top: the web page takes them from its URL query, the native binary from
//! its command-line arguments.

use crate::constants::{DEFAULT_SEED, STALE_AFTER_SECS};
use crate::error::{Result, TreeError};
use crate::gesture::{GestureCalibration, LANDMARK_COUNT};
use crate::orbit::OrbitParams;
use crate::scene::SceneConfig;
use crate::signals::SmoothingParams;
use std::str::FromStr;

/// Every key accepted by [`TreeConfig::apply_override`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "bias",
    "gain",
    "sensitivity",
    "palm",
    "fallback",
    "alpha_open",
    "alpha_rot",
    "particles",
    "height",
    "winding",
    "orbit_rate",
    "gesture_scale",
    "radius",
    "stale_after",
    "initial_openness",
    "seed",
];

#[derive(Clone, Debug, PartialEq)]
pub struct TreeConfig {
    pub gesture: GestureCalibration,
    pub smoothing: SmoothingParams,
    pub scene: SceneConfig,
    pub orbit: OrbitParams,
    /// Openness the tree starts at, before any detection.
    pub initial_openness: f32,
    /// Seconds without a detector publish before falling back. `None` keeps
    /// the last signals forever.
    pub stale_after_secs: Option<f32>,
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            gesture: GestureCalibration::default(),
            smoothing: SmoothingParams::default(),
            scene: SceneConfig::default(),
            orbit: OrbitParams::default(),
            initial_openness: 1.0,
            stale_after_secs: Some(STALE_AFTER_SECS),
            seed: DEFAULT_SEED,
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| TreeError::BadOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn check_unit(name: &str, v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(TreeError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {v}"
        )))
    }
}

impl TreeConfig {
    pub fn validate(&self) -> Result<()> {
        let g = &self.gesture;
        if !g.openness_bias.is_finite() || !g.lateral_sensitivity.is_finite() {
            return Err(TreeError::InvalidConfig(
                "gesture calibration must be finite".into(),
            ));
        }
        if !(g.openness_gain.is_finite() && g.openness_gain > 0.0) {
            return Err(TreeError::InvalidConfig(format!(
                "openness gain must be positive, got {}",
                g.openness_gain
            )));
        }
        if g.palm_landmark >= LANDMARK_COUNT {
            return Err(TreeError::InvalidConfig(format!(
                "palm landmark must be below {LANDMARK_COUNT}, got {}",
                g.palm_landmark
            )));
        }
        check_unit("fallback openness", g.fallback_openness)?;
        check_unit("initial openness", self.initial_openness)?;

        for (name, alpha) in [
            ("openness alpha", self.smoothing.openness_alpha),
            ("rotation alpha", self.smoothing.rotation_alpha),
        ] {
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(TreeError::InvalidConfig(format!(
                    "{name} must be within (0, 1], got {alpha}"
                )));
            }
        }

        let o = &self.orbit;
        if !(o.base_rate.is_finite() && o.gesture_scale.is_finite() && o.height.is_finite()) {
            return Err(TreeError::InvalidConfig("orbit parameters must be finite".into()));
        }
        if !(o.radius.is_finite() && o.radius > 0.0) {
            return Err(TreeError::InvalidConfig(format!(
                "orbit radius must be positive, got {}",
                o.radius
            )));
        }
        if let Some(secs) = self.stale_after_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(TreeError::InvalidConfig(format!(
                    "staleness timeout must be positive, got {secs}"
                )));
            }
        }
        self.scene.validate()
    }

    /// Apply one `key=value` setting. The config is left untouched on error.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "bias" => self.gesture.openness_bias = parse(key, value)?,
            "gain" => self.gesture.openness_gain = parse(key, value)?,
            "sensitivity" => self.gesture.lateral_sensitivity = parse(key, value)?,
            "palm" => self.gesture.palm_landmark = parse(key, value)?,
            "fallback" => self.gesture.fallback_openness = parse(key, value)?,
            "alpha_open" => self.smoothing.openness_alpha = parse(key, value)?,
            "alpha_rot" => self.smoothing.rotation_alpha = parse(key, value)?,
            "particles" => self.scene.particle_count = parse(key, value)?,
            "height" => self.scene.set_tree_height(parse(key, value)?),
            "winding" => self.scene.winding_rate = parse(key, value)?,
            "orbit_rate" => self.orbit.base_rate = parse(key, value)?,
            "gesture_scale" => self.orbit.gesture_scale = parse(key, value)?,
            "radius" => self.orbit.radius = parse(key, value)?,
            "stale_after" => {
                self.stale_after_secs = match value.trim() {
                    "off" | "none" => None,
                    v => {
                        let secs: f32 = parse(key, v)?;
                        (secs > 0.0).then_some(secs)
                    }
                }
            }
            "initial_openness" => self.initial_openness = parse(key, value)?,
            "seed" => self.seed = parse(key, value)?,
            _ => return Err(TreeError::UnknownOverride(key.to_string())),
        }
        log::info!("[config] {key} = {value}");
        Ok(())
    }

    /// Apply a sequence of `key=value` pairs and validate the result.
    pub fn with_overrides<'a, I>(mut self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (k, v) in pairs {
            self.apply_override(k, v)?;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Split `key=value` arguments, ignoring anything without an `=`.
pub fn split_override(arg: &str) -> Option<(&str, &str)> {
    let (k, v) = arg.split_once('=')?;
    let k = k.trim().trim_start_matches("--");
    (!k.is_empty()).then_some((k, v))
}
