//! Hand detector seam and the detection activity that feeds the signal slot.
//!
//! Consumers don't need to know whether poses come from the browser's hand
//! tracker, a pointer-driven simulation, or a replayed script.

use crate::gesture::{synthetic_hand, GestureExtractor, HandPose};
use crate::signals::SignalSlot;
use glam::Vec2;
use std::collections::VecDeque;

/// Outcome of one detection attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum DetectorPoll {
    /// No new camera frame, or the detector failed on this call.
    Pending,
    /// A frame was processed and contained no hand.
    NoHand,
    Hand(HandPose),
}

/// Anything that can turn the latest camera frame into at most one hand.
pub trait HandDetector {
    fn detect(&mut self, timestamp_ms: f64) -> DetectorPoll;
}

/// One detection pass per call: detect, extract, publish.
pub struct DetectionLoop<D: HandDetector> {
    detector: D,
    extractor: GestureExtractor,
    slot: SignalSlot,
    hand_visible: Option<bool>,
}

impl<D: HandDetector> DetectionLoop<D> {
    pub fn new(detector: D, extractor: GestureExtractor, slot: SignalSlot) -> Self {
        Self {
            detector,
            extractor,
            slot,
            hand_visible: None,
        }
    }

    /// Returns `true` when new targets were published.
    pub fn poll(&mut self, timestamp_ms: f64) -> bool {
        let pose = match self.detector.detect(timestamp_ms) {
            DetectorPoll::Pending => return false,
            DetectorPoll::NoHand => None,
            DetectorPoll::Hand(pose) => Some(pose),
        };
        let visible = pose.is_some();
        if self.hand_visible != Some(visible) {
            if visible {
                log::info!("[detect] hand acquired");
            } else {
                log::info!("[detect] no hand in frame; tree re-forms");
            }
            self.hand_visible = Some(visible);
        }
        let targets = self.extractor.extract(pose.as_ref(), self.slot.targets());
        self.slot.publish(targets);
        true
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}

/// Replays a fixed sequence of detections, then reports `Pending` forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDetector {
    script: VecDeque<DetectorPoll>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = DetectorPoll>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    pub fn push(&mut self, poll: DetectorPoll) {
        self.script.push_back(poll);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl HandDetector for ScriptedDetector {
    fn detect(&mut self, _timestamp_ms: f64) -> DetectorPoll {
        self.script.pop_front().unwrap_or(DetectorPoll::Pending)
    }
}

pub const SIM_FIST_SPREAD: f32 = 0.12;
pub const SIM_OPEN_SPREAD: f32 = 0.45;
pub const SIM_SPREAD_RANGE: [f32; 2] = [0.05, 0.6];

/// A hand driven by pointer input, for hosts without a webcam.
///
/// Pointer coordinates are given in display space (0..1, top-left origin);
/// they are mirrored into camera space the way a selfie preview is.
#[derive(Clone, Debug)]
pub struct SimulatedHand {
    display_pos: Vec2,
    spread: f32,
    clenched: bool,
    /// Pointer is over the window.
    in_view: bool,
    /// Hidden on request; survives pointer motion.
    hidden: bool,
    frame_due: bool,
}

impl Default for SimulatedHand {
    fn default() -> Self {
        Self {
            display_pos: Vec2::new(0.5, 0.5),
            spread: SIM_OPEN_SPREAD,
            clenched: false,
            in_view: false,
            hidden: false,
            frame_due: true,
        }
    }
}

impl SimulatedHand {
    pub fn set_pointer(&mut self, u: f32, v: f32) {
        self.display_pos = Vec2::new(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
        self.in_view = true;
    }

    pub fn set_clenched(&mut self, clenched: bool) {
        self.clenched = clenched;
    }

    pub fn adjust_spread(&mut self, delta: f32) {
        self.spread = (self.spread + delta).clamp(SIM_SPREAD_RANGE[0], SIM_SPREAD_RANGE[1]);
    }

    pub fn set_in_view(&mut self, in_view: bool) {
        self.in_view = in_view;
    }

    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether a camera would see the hand right now.
    pub fn is_present(&self) -> bool {
        self.in_view && !self.hidden
    }

    /// Mark that a new "camera frame" is available for the next detect call.
    pub fn frame_ready(&mut self) {
        self.frame_due = true;
    }

    pub fn effective_spread(&self) -> f32 {
        if self.clenched {
            SIM_FIST_SPREAD
        } else {
            self.spread
        }
    }

    /// The pose a camera would see right now, if any.
    pub fn pose(&self) -> Option<HandPose> {
        self.is_present().then(|| {
            let camera = Vec2::new(1.0 - self.display_pos.x, self.display_pos.y);
            synthetic_hand(camera, self.effective_spread())
        })
    }
}

impl HandDetector for SimulatedHand {
    fn detect(&mut self, _timestamp_ms: f64) -> DetectorPoll {
        if !self.frame_due {
            return DetectorPoll::Pending;
        }
        self.frame_due = false;
        match self.pose() {
            Some(pose) => DetectorPoll::Hand(pose),
            None => DetectorPoll::NoHand,
        }
    }
}
