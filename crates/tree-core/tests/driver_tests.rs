// Tests for the frame driver: phases, detection flow, staleness, and the
// fist -> open hand interaction end to end.

use std::time::Duration;
use tree_core::*;

const TICK: Duration = Duration::from_micros(16_667);

fn light_config() -> TreeConfig {
    TreeConfig::default()
        .with_overrides([("particles", "200")])
        .unwrap()
}

fn ready_driver(cfg: &TreeConfig) -> (FrameDriver, SignalSlot) {
    let slot = FrameDriver::initial_slot(cfg);
    let mut driver = FrameDriver::new(cfg, slot.clone()).unwrap();
    driver.mark_detector_ready();
    (driver, slot)
}

#[test]
fn nothing_renders_until_the_detector_is_ready() {
    let cfg = light_config();
    let slot = FrameDriver::initial_slot(&cfg);
    let mut driver = FrameDriver::new(&cfg, slot).unwrap();
    assert_eq!(driver.phase(), Phase::Initializing);
    assert!(driver.tick(TICK).is_none());
    assert_eq!(driver.elapsed_sec(), 0.0);

    driver.mark_detector_ready();
    assert_eq!(driver.phase(), Phase::Tracking);
    let frame = driver.tick(TICK).unwrap();
    assert_eq!(frame.particle_positions.len(), 200);
    assert_eq!(frame.decorations.len(), frame.decoration_poses.len());
}

#[test]
fn start_up_failure_pins_initializing() {
    let cfg = light_config();
    let slot = FrameDriver::initial_slot(&cfg);
    let mut driver = FrameDriver::new(&cfg, slot).unwrap();

    let first = driver.report_init_failure(InitError::Camera("denied".into()));
    assert_eq!(first, "camera unavailable: denied");
    let second = driver.report_init_failure(InitError::Detector("404".into()));
    assert_eq!(second, first, "only the first failure is kept");

    driver.mark_detector_ready();
    assert_eq!(driver.phase(), Phase::Initializing);
    assert!(driver.tick(TICK).is_none());
    assert!(matches!(driver.failure(), Some(InitError::Camera(_))));
}

#[test]
fn invalid_config_never_builds_a_driver() {
    let mut cfg = light_config();
    cfg.smoothing.openness_alpha = 0.0;
    let slot = FrameDriver::initial_slot(&cfg);
    assert!(FrameDriver::new(&cfg, slot).is_err());
}

#[test]
fn tree_starts_assembled() {
    let cfg = light_config();
    let (mut driver, _slot) = ready_driver(&cfg);
    let frame = driver.tick(TICK).unwrap();
    assert_eq!(frame.signals.openness, 1.0);
    for (p, pos) in frame.particles.iter().zip(frame.particle_positions) {
        assert_eq!(*pos, p.assembled);
    }
}

#[test]
fn pending_detections_publish_nothing() {
    let cfg = light_config();
    let slot = FrameDriver::initial_slot(&cfg);
    let mut detection = DetectionLoop::new(
        ScriptedDetector::new([DetectorPoll::Pending]),
        FrameDriver::extractor(&cfg),
        slot.clone(),
    );
    assert!(!detection.poll(0.0));
    assert!(!detection.poll(33.0), "exhausted script stays pending");
    assert_eq!(slot.latest().generation, 0);
}

#[test]
fn losing_the_hand_reforms_the_tree_but_keeps_rotation() {
    let cfg = light_config();
    let (mut driver, slot) = ready_driver(&cfg);
    let fist_left = synthetic_hand(glam::Vec2::new(0.3, 0.5), SIM_FIST_SPREAD);
    let mut detection = DetectionLoop::new(
        ScriptedDetector::new([DetectorPoll::Hand(fist_left), DetectorPoll::NoHand]),
        FrameDriver::extractor(&cfg),
        slot.clone(),
    );

    assert!(detection.poll(0.0));
    let t = slot.targets();
    assert_eq!(t.openness, 0.0);
    assert!((t.rotation - 0.8).abs() < 1e-5);
    for _ in 0..60 {
        driver.tick(TICK);
    }
    assert!(driver.signals().openness < 0.01);

    assert!(detection.poll(33.0));
    let t = slot.targets();
    assert_eq!(t.openness, 1.0);
    assert!((t.rotation - 0.8).abs() < 1e-5);
    for _ in 0..90 {
        driver.tick(TICK);
    }
    assert!(driver.signals().openness > 0.99);
    assert!(driver.signals().rotation > 0.7);
}

#[test]
fn quiet_detector_falls_back_after_timeout() {
    let cfg = light_config()
        .with_overrides([("stale_after", "1")])
        .unwrap();
    let (mut driver, slot) = ready_driver(&cfg);
    slot.publish(TargetSignals {
        openness: 0.0,
        rotation: 0.5,
    });
    let step = Duration::from_millis(100);
    for _ in 0..10 {
        driver.tick(step);
    }
    let before = driver.signals();
    assert!(before.openness < 0.4, "still following the fist: {}", before.openness);

    for _ in 0..20 {
        driver.tick(step);
    }
    let after = driver.signals();
    assert!(after.openness > 0.8, "fallback should re-form the tree: {}", after.openness);
    assert!(after.rotation > before.rotation, "rotation target is held");

    // A fresh publish resumes tracking
    slot.publish(TargetSignals {
        openness: 0.0,
        rotation: 0.5,
    });
    for _ in 0..5 {
        driver.tick(step);
    }
    assert!(driver.signals().openness < after.openness);
}

#[test]
fn disabled_staleness_holds_the_last_targets() {
    let cfg = light_config()
        .with_overrides([("stale_after", "off")])
        .unwrap();
    let (mut driver, slot) = ready_driver(&cfg);
    slot.publish(TargetSignals {
        openness: 0.0,
        rotation: 0.0,
    });
    for _ in 0..30 {
        driver.tick(Duration::from_millis(100));
    }
    assert!(driver.signals().openness < 0.1);
}

#[test]
fn fist_then_open_hand_end_to_end() {
    let cfg = light_config();
    let (mut driver, slot) = ready_driver(&cfg);
    let mut hand = SimulatedHand::default();
    hand.set_pointer(0.5, 0.5);
    hand.set_clenched(true);
    let mut detection = DetectionLoop::new(hand, FrameDriver::extractor(&cfg), slot);

    // 2 s of fist at 60 Hz, detection on every second tick
    let mut crossed_below = false;
    for i in 0..120 {
        if i % 2 == 0 {
            detection.detector_mut().frame_ready();
            detection.poll(i as f64 * 16.667);
        }
        let frame = driver.tick(TICK).unwrap();
        crossed_below |= frame.signals.openness < 0.5;
    }
    assert!(crossed_below);
    assert!(driver.signals().openness < 0.01);

    // Open palm: target (0.45 - 0.2) * 2.5 = 0.625
    detection.detector_mut().set_clenched(false);
    assert!((detection.detector().effective_spread() - SIM_OPEN_SPREAD).abs() < 1e-6);
    let mut crossed_above_at = None;
    for i in 0..60 {
        if i % 2 == 0 {
            detection.detector_mut().frame_ready();
            detection.poll(2000.0 + i as f64 * 16.667);
        }
        let frame = driver.tick(TICK).unwrap();
        assert!(frame.signals.openness <= 0.625 + 1e-5, "overshoot");
        if crossed_above_at.is_none() && frame.signals.openness > 0.5 {
            crossed_above_at = Some(i);
        }
    }
    let at = crossed_above_at.expect("openness never passed 0.5");
    assert!(at <= 25, "took {at} ticks to open");
}

#[test]
fn simulated_hand_mirrors_the_pointer() {
    let mut hand = SimulatedHand::default();
    assert!(!hand.is_present());
    assert_eq!(hand.detect(0.0), DetectorPoll::NoHand);
    assert_eq!(hand.detect(1.0), DetectorPoll::Pending, "one detection per frame");

    hand.set_pointer(0.2, 0.5);
    hand.frame_ready();
    let DetectorPoll::Hand(pose) = hand.detect(2.0) else {
        panic!("pointer should make the hand visible");
    };
    let palm = pose.landmark(landmarks::MIDDLE_FINGER_MCP).unwrap();
    assert!((palm.x - 0.8).abs() < 1e-6);

    hand.adjust_spread(10.0);
    assert_eq!(hand.effective_spread(), SIM_SPREAD_RANGE[1]);
    hand.toggle_hidden();
    assert!(hand.pose().is_none());
}

#[test]
fn hidden_hand_stays_hidden_while_the_pointer_moves() {
    let mut hand = SimulatedHand::default();
    hand.set_pointer(0.5, 0.5);
    hand.toggle_hidden();
    assert!(hand.is_hidden());
    hand.set_pointer(0.6, 0.4);
    assert!(!hand.is_present(), "moving the pointer must not undo a hide");
    assert!(hand.pose().is_none());

    hand.toggle_hidden();
    assert!(hand.is_present());
    hand.set_in_view(false);
    assert!(hand.pose().is_none(), "pointer left the window");
    assert!(!hand.is_hidden());
}

#[test]
fn renderer_seam_receives_each_frame() {
    struct Recorder {
        frames: Vec<(usize, f64)>,
    }
    impl SceneRenderer for Recorder {
        type Error = ();
        fn submit(&mut self, frame: &FrameOutput<'_>) -> std::result::Result<(), ()> {
            self.frames
                .push((frame.particle_positions.len(), frame.elapsed_sec));
            Ok(())
        }
    }

    let cfg = light_config();
    let slot = FrameDriver::initial_slot(&cfg);
    let mut driver = FrameDriver::new(&cfg, slot).unwrap();
    let mut rec = Recorder { frames: Vec::new() };
    assert!(driver.render_to(TICK, &mut rec).is_none());
    driver.mark_detector_ready();
    for _ in 0..3 {
        assert_eq!(driver.render_to(TICK, &mut rec), Some(Ok(())));
    }
    assert_eq!(rec.frames.len(), 3);
    assert!(rec.frames.windows(2).all(|w| w[1].1 > w[0].1));
    assert!(rec.frames.iter().all(|f| f.0 == 200));
}

#[test]
fn camera_follows_smoothed_rotation() {
    let cfg = light_config();
    let (mut driver, slot) = ready_driver(&cfg);
    let still = driver.tick(TICK).unwrap().camera;
    slot.publish(TargetSignals {
        openness: 1.0,
        rotation: 1.0,
    });
    let mut last = still;
    for _ in 0..30 {
        last = driver.tick(TICK).unwrap().camera;
    }
    let orbit = OrbitController::default();
    let expected = orbit.camera_pose(driver.elapsed_sec() as f32, driver.signals().rotation);
    assert!((last.eye - expected.eye).length() < 1e-3);
    assert!(driver.signals().rotation > 0.0);
}
