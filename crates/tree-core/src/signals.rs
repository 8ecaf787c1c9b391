//! Control signals shared between the detection activity and the render loop.
//!
//! The detector side only ever writes targets into a [`SignalSlot`]; the render
//! side reads the latest targets and owns the smoothed values. Both activities
//! run on one thread, so the slot is a plain `Rc<Cell<_>>` handle.

use crate::constants::{OPENNESS_ALPHA, ROTATION_ALPHA};
use std::cell::Cell;
use std::rc::Rc;

/// Raw per-frame targets written by the gesture extractor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetSignals {
    /// 0 = fist / scattered, 1 = open palm / assembled
    pub openness: f32,
    /// Unbounded lateral control, positive when the hand is left of center
    pub rotation: f32,
}

/// Damped values actually used for rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothedSignals {
    pub openness: f32,
    pub rotation: f32,
}

/// What the slot holds: the latest targets and how many times they were published.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Published {
    pub targets: TargetSignals,
    pub generation: u64,
}

/// Latest-value-wins slot. Cloning hands out another handle to the same slot.
#[derive(Clone, Debug, Default)]
pub struct SignalSlot {
    inner: Rc<Cell<Published>>,
}

impl SignalSlot {
    pub fn new(initial: TargetSignals) -> Self {
        Self {
            inner: Rc::new(Cell::new(Published {
                targets: initial,
                generation: 0,
            })),
        }
    }

    pub fn publish(&self, targets: TargetSignals) {
        let prev = self.inner.get();
        self.inner.set(Published {
            targets,
            generation: prev.generation.wrapping_add(1),
        });
    }

    #[inline]
    pub fn latest(&self) -> Published {
        self.inner.get()
    }

    #[inline]
    pub fn targets(&self) -> TargetSignals {
        self.inner.get().targets
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingParams {
    pub openness_alpha: f32,
    pub rotation_alpha: f32,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            openness_alpha: OPENNESS_ALPHA,
            rotation_alpha: ROTATION_ALPHA,
        }
    }
}

/// Exponential approach toward the targets, one step per render tick.
#[derive(Clone, Debug)]
pub struct SignalSmoother {
    params: SmoothingParams,
    current: SmoothedSignals,
}

impl SignalSmoother {
    pub fn new(params: SmoothingParams, initial: SmoothedSignals) -> Self {
        Self {
            params,
            current: initial,
        }
    }

    #[inline]
    pub fn current(&self) -> SmoothedSignals {
        self.current
    }

    pub fn step(&mut self, target: TargetSignals) -> SmoothedSignals {
        self.current.openness = approach(
            self.current.openness,
            target.openness,
            self.params.openness_alpha,
        );
        self.current.rotation = approach(
            self.current.rotation,
            target.rotation,
            self.params.rotation_alpha,
        );
        self.current
    }
}

/// `current += (target - current) * alpha`, never stepping past `target`.
#[inline]
pub fn approach(current: f32, target: f32, alpha: f32) -> f32 {
    let next = current + (target - current) * alpha;
    if (target - current) * (target - next) < 0.0 {
        target
    } else {
        next
    }
}
