use face_shooter::config::*;
use face_shooter::Error;

#[test]
fn defaults_are_valid() {
    let cfg = GameConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.face_loss_policy, FaceLossPolicy::Restart);
    assert_eq!(cfg.detector.max_faces, 1);
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let cfg = GameConfig::from_json_str(r#"{ "boss_score_step": 500, "starting_lives": 5 }"#).unwrap();
    assert_eq!(cfg.boss_score_step, 500);
    assert_eq!(cfg.starting_lives, 5);
    assert_eq!(cfg.base_spawn_interval, 60);
    assert_eq!(cfg.max_lives, 5);
}

#[test]
fn pause_policy_parses() {
    let cfg = GameConfig::from_json_str(r#"{ "face_loss_policy": "pause" }"#).unwrap();
    assert_eq!(cfg.face_loss_policy, FaceLossPolicy::Pause);
}

#[test]
fn invalid_sensitivity_is_rejected() {
    let err = GameConfig::from_json_str(r#"{ "default_sensitivity": 9.0 }"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn too_many_starting_lives_is_rejected() {
    let err = GameConfig::from_json_str(r#"{ "starting_lives": 6 }"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = GameConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GameConfig::load("/nonexistent/face_shooter.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn sensitivity_clamp_uses_bounds() {
    let cfg = GameConfig::default();
    assert_eq!(cfg.clamp_sensitivity(0.0), 0.5);
    assert_eq!(cfg.clamp_sensitivity(3.0), 3.0);
    assert_eq!(cfg.clamp_sensitivity(8.0), 5.0);
}

#[test]
fn mobile_breakpoint_switches_sizes() {
    assert!(!Viewport::new(600.0, 800.0).is_mobile());
    assert!(Viewport::new(599.0, 800.0).is_mobile());
    assert_eq!(Viewport::new(599.0, 800.0).sizes(), SizeProfile::MOBILE);
    assert_eq!(Viewport::new(1024.0, 768.0).sizes().boss, 150.0);
}
