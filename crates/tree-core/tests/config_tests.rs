// Tests for runtime configuration and `key=value` overrides.

use tree_core::*;

#[test]
fn defaults_validate() {
    let cfg = TreeConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.initial_openness, 1.0);
    assert_eq!(cfg.stale_after_secs, Some(STALE_AFTER_SECS));
    assert_eq!(cfg.seed, DEFAULT_SEED);
}

#[test]
fn overrides_reach_every_section() {
    let cfg = TreeConfig::default()
        .with_overrides([
            ("gain", "3"),
            ("bias", "0.18"),
            ("alpha_open", "0.2"),
            ("particles", "1000"),
            ("radius", "55"),
            ("seed", "7"),
        ])
        .unwrap();
    assert_eq!(cfg.gesture.openness_gain, 3.0);
    assert_eq!(cfg.gesture.openness_bias, 0.18);
    assert_eq!(cfg.smoothing.openness_alpha, 0.2);
    assert_eq!(cfg.scene.particle_count, 1000);
    assert_eq!(cfg.orbit.radius, 55.0);
    assert_eq!(cfg.seed, 7);
}

#[test]
fn staleness_can_be_disabled() {
    for value in ["off", "none", "0"] {
        let cfg = TreeConfig::default()
            .with_overrides([("stale_after", value)])
            .unwrap();
        assert_eq!(cfg.stale_after_secs, None, "value {value:?}");
    }
    let cfg = TreeConfig::default()
        .with_overrides([("stale_after", "1.5")])
        .unwrap();
    assert_eq!(cfg.stale_after_secs, Some(1.5));
}

#[test]
fn unknown_key_is_reported() {
    let err = TreeConfig::default()
        .with_overrides([("colour", "red")])
        .unwrap_err();
    assert_eq!(err, TreeError::UnknownOverride("colour".into()));
}

#[test]
fn bad_value_leaves_config_untouched() {
    let mut cfg = TreeConfig::default();
    let err = cfg.apply_override("gain", "lots").unwrap_err();
    assert_eq!(
        err,
        TreeError::BadOverride {
            key: "gain".into(),
            value: "lots".into()
        }
    );
    assert_eq!(cfg, TreeConfig::default());
}

#[test]
fn out_of_range_values_fail_validation() {
    for (k, v) in [
        ("gain", "0"),
        ("alpha_open", "0"),
        ("alpha_rot", "1.5"),
        ("fallback", "2"),
        ("initial_openness", "-0.1"),
        ("palm", "21"),
        ("radius", "-4"),
        ("height", "0"),
    ] {
        let res = TreeConfig::default().with_overrides([(k, v)]);
        assert!(
            matches!(res, Err(TreeError::InvalidConfig(_))),
            "{k}={v} should be rejected, got {res:?}"
        );
    }
}

#[test]
fn every_listed_key_is_accepted() {
    for key in OVERRIDE_KEYS {
        let mut cfg = TreeConfig::default();
        let value = match *key {
            "stale_after" => "off",
            "palm" | "particles" | "seed" => "9",
            _ => "0.5",
        };
        assert!(
            cfg.apply_override(key, value).is_ok(),
            "listed key {key} was not accepted"
        );
    }
}

#[test]
fn split_override_parses_cli_style_arguments() {
    assert_eq!(split_override("gain=3"), Some(("gain", "3")));
    assert_eq!(split_override("--bias=0.18"), Some(("bias", "0.18")));
    assert_eq!(split_override("verbose"), None);
    assert_eq!(split_override("=3"), None);
}

#[test]
fn init_errors_read_well() {
    let e = InitError::Camera("permission denied".into());
    assert_eq!(e.to_string(), "camera unavailable: permission denied");
    let from_core: InitError = TreeError::InvalidConfig("x".into()).into();
    assert!(matches!(from_core, InitError::Scene(_)));
}

#[test]
fn height_override_scales_bands_and_topper() {
    let short = TreeConfig::default()
        .with_overrides([("height", "20")])
        .expect("a shorter tree should validate");
    assert_eq!(short.scene.tree_height, 20.0);
    for g in &short.scene.decorations {
        assert!(g.band[1] <= 20.0, "band {:?} pokes above the apex", g.band);
    }
    let topper = short.scene.topper.as_ref().unwrap();
    assert!(topper.assembled.y > 20.0);

    let tall = TreeConfig::default()
        .with_overrides([("height", "60")])
        .unwrap();
    let topper = tall.scene.topper.as_ref().unwrap();
    assert!((topper.assembled.y - 62.0).abs() < 1e-4, "got {}", topper.assembled.y);
    assert!((topper.scattered.y - TOPPER_SCATTERED[1] * 2.0).abs() < 1e-4);
    let orbs = &tall.scene.decorations[2];
    assert!((orbs.band[1] - ORNAMENT_BAND[1] * 2.0).abs() < 1e-4);
}
