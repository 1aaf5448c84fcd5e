use approx::assert_relative_eq;

use face_shooter::config::{GameConfig, Viewport};
use face_shooter::control::*;
use face_shooter::entities::Lean;
use face_shooter::Error;

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

fn mapper() -> ControlMapper {
    ControlMapper::new(&GameConfig::default())
}

fn tracked(signal: ControlSignal) -> face_shooter::entities::ControlState {
    match signal {
        ControlSignal::Tracking(c) => c,
        ControlSignal::FaceMissing => panic!("expected a tracked face"),
    }
}

// ── mouth_ratio ───────────────────────────────────────────────────────────────

#[test]
fn mouth_ratio_open_and_closed() {
    let open = mouth_ratio(&FaceLandmarks::synthetic((0.5, 0.5), true)).unwrap();
    let closed = mouth_ratio(&FaceLandmarks::synthetic((0.5, 0.5), false)).unwrap();
    assert_relative_eq!(open, 0.1, epsilon = 1e-4);
    assert_relative_eq!(closed, 0.0125, epsilon = 1e-4);
}

#[test]
fn mouth_ratio_is_scale_invariant() {
    // Same face at half the size (further from the camera).
    let mut points = vec![Point2::new(0.5, 0.5); FACE_MESH_POINTS];
    points[HEAD_TOP] = Point2::new(0.5, 0.4);
    points[CHIN] = Point2::new(0.5, 0.6);
    points[UPPER_LIP] = Point2::new(0.5, 0.54);
    points[LOWER_LIP] = Point2::new(0.5, 0.56);
    let ratio = mouth_ratio(&FaceLandmarks::new(points)).unwrap();
    assert_relative_eq!(ratio, 0.1, epsilon = 1e-4);
}

#[test]
fn mouth_ratio_rejects_short_landmark_set() {
    let face = FaceLandmarks::new(vec![Point2::new(0.5, 0.5); 20]);
    match mouth_ratio(&face) {
        Err(Error::LandmarkMissing { len, .. }) => assert_eq!(len, 20),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn mouth_ratio_rejects_degenerate_face() {
    let face = FaceLandmarks::new(vec![Point2::new(0.5, 0.5); FACE_MESH_POINTS]);
    assert!(matches!(mouth_ratio(&face), Err(Error::DegenerateFace)));
}

// ── map_aim ───────────────────────────────────────────────────────────────────

#[test]
fn centre_maps_to_centre() {
    let aim = map_aim(0.5, 0.5, 3.0, &viewport());
    assert_relative_eq!(aim.x, 400.0);
    assert_relative_eq!(aim.y, 300.0);
}

#[test]
fn gain_is_applied_around_centre_and_x_is_mirrored() {
    let aim = map_aim(0.6, 0.6, 2.0, &viewport());
    assert_relative_eq!(aim.nx, 0.7, epsilon = 1e-5);
    assert_relative_eq!(aim.ny, 0.7, epsilon = 1e-5);
    assert_relative_eq!(aim.x, 0.3 * 800.0, epsilon = 1e-3);
    assert_relative_eq!(aim.y, 0.7 * 600.0, epsilon = 1e-3);
}

#[test]
fn aim_is_clamped_to_frame() {
    let aim = map_aim(0.95, 0.02, 5.0, &viewport());
    assert_eq!(aim.nx, 1.0);
    assert_eq!(aim.ny, 0.0);
    assert_eq!(aim.x, 0.0);
    assert_eq!(aim.y, 0.0);
}

// ── lean ──────────────────────────────────────────────────────────────────────

#[test]
fn lean_uses_dead_zone() {
    assert_eq!(lean_from_delta(100.0, 101.5, 2.0), Lean::Center);
    assert_eq!(lean_from_delta(100.0, 98.5, 2.0), Lean::Center);
    assert_eq!(lean_from_delta(100.0, 103.0, 2.0), Lean::Right);
    assert_eq!(lean_from_delta(100.0, 97.0, 2.0), Lean::Left);
}

#[test]
fn mapper_lean_follows_motion_not_position() {
    let mut m = mapper();
    let vp = viewport();
    tracked(m.update(Some(&FaceLandmarks::synthetic((0.3, 0.5), false)), &vp).unwrap());
    // Nose moves toward smaller x → mirrored aim moves right.
    let c = tracked(m.update(Some(&FaceLandmarks::synthetic((0.25, 0.5), false)), &vp).unwrap());
    assert_eq!(c.lean, Lean::Right);
    // Holding still far to one side is centred.
    let c = tracked(m.update(Some(&FaceLandmarks::synthetic((0.25, 0.5), false)), &vp).unwrap());
    assert_eq!(c.lean, Lean::Center);
}

// ── Edge trigger ──────────────────────────────────────────────────────────────

#[test]
fn held_mouth_fires_once() {
    let mut m = mapper();
    let vp = viewport();
    let closed = FaceLandmarks::synthetic((0.5, 0.5), false);
    let open = FaceLandmarks::synthetic((0.5, 0.5), true);

    assert!(!tracked(m.update(Some(&closed), &vp).unwrap()).shoot_triggered());
    let mut shots = 0;
    for _ in 0..11 {
        if tracked(m.update(Some(&open), &vp).unwrap()).shoot_triggered() {
            shots += 1;
        }
    }
    assert_eq!(shots, 1);

    // Close and reopen fires again.
    m.update(Some(&closed), &vp).unwrap();
    assert!(tracked(m.update(Some(&open), &vp).unwrap()).shoot_triggered());
}

#[test]
fn face_loss_closes_the_mouth() {
    let mut m = mapper();
    let vp = viewport();
    let open = FaceLandmarks::synthetic((0.5, 0.5), true);
    m.update(Some(&open), &vp).unwrap();
    assert_eq!(m.update(None, &vp).unwrap(), ControlSignal::FaceMissing);
    assert!(!m.state().face_present);
    assert!(!m.state().mouth_open);
    // Coming back with the mouth already open counts as a new edge.
    assert!(tracked(m.update(Some(&open), &vp).unwrap()).shoot_triggered());
}

#[test]
fn malformed_frame_leaves_state_untouched() {
    let mut m = mapper();
    let vp = viewport();
    m.update(Some(&FaceLandmarks::synthetic((0.4, 0.5), false)), &vp).unwrap();
    let before = *m.state();
    let short = FaceLandmarks::new(vec![Point2::new(0.5, 0.5); 5]);
    assert!(m.update(Some(&short), &vp).is_err());
    assert_eq!(*m.state(), before);
}

// ── Sensitivity ───────────────────────────────────────────────────────────────

#[test]
fn sensitivity_is_clamped() {
    let mut m = mapper();
    assert_relative_eq!(m.sensitivity(), 1.5);
    assert_relative_eq!(m.set_sensitivity(10.0), 5.0);
    assert_relative_eq!(m.set_sensitivity(0.1), 0.5);
    assert_relative_eq!(m.set_sensitivity(2.25), 2.25);
}
