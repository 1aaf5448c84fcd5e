/// Control mapping: raw face landmarks → aim position, mouth trigger, lean.
///
/// The detector reports normalized [0, 1] points.  Head position drives the
/// aim (with a sensitivity gain around the frame centre), the lip gap relative
/// to face height decides whether the mouth is open, and shots fire only on
/// the closed → open edge.

use crate::config::{GameConfig, Viewport};
use crate::entities::{Aim, ControlState, Lean};
use crate::error::{Error, Result};

// ── Landmark indices (468-point face mesh) ────────────────────────────────────

pub const NOSE_TIP: usize = 1;
pub const HEAD_TOP: usize = 10;
pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;
pub const CHIN: usize = 152;
pub const FACE_MESH_POINTS: usize = 468;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point2) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detected face: an indexable set of normalized points.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<Point2>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Result<Point2> {
        self.points.get(index).copied().ok_or(Error::LandmarkMissing {
            index,
            len: self.points.len(),
        })
    }

    /// A minimal face centred on `nose` with the mouth open or closed.
    /// Used by the headless/terminal drivers and by tests in place of a
    /// real detector.
    pub fn synthetic(nose: (f32, f32), mouth_open: bool) -> Self {
        let (nx, ny) = nose;
        let mut points = vec![Point2::new(nx, ny); FACE_MESH_POINTS];
        let lip_y = ny + 0.08;
        let gap = if mouth_open { 0.04 } else { 0.005 };
        points[HEAD_TOP] = Point2::new(nx, ny - 0.2);
        points[CHIN] = Point2::new(nx, ny + 0.2);
        points[UPPER_LIP] = Point2::new(nx, lip_y);
        points[LOWER_LIP] = Point2::new(nx, lip_y + gap);
        Self { points }
    }
}

// ── Pure mapping functions ────────────────────────────────────────────────────

/// Lip gap divided by face height.  Independent of distance from the camera.
pub fn mouth_ratio(face: &FaceLandmarks) -> Result<f32> {
    let lip_gap = face.point(UPPER_LIP)?.distance(face.point(LOWER_LIP)?);
    let face_height = face.point(HEAD_TOP)?.distance(face.point(CHIN)?);
    if face_height <= f32::EPSILON {
        return Err(Error::DegenerateFace);
    }
    Ok(lip_gap / face_height)
}

/// Apply gain around the frame centre, clamp, then mirror X into viewport pixels.
pub fn map_aim(nx: f32, ny: f32, sensitivity: f32, viewport: &Viewport) -> Aim {
    let cx = (0.5 + (nx - 0.5) * sensitivity).clamp(0.0, 1.0);
    let cy = (0.5 + (ny - 0.5) * sensitivity).clamp(0.0, 1.0);
    Aim {
        nx: cx,
        ny: cy,
        x: (1.0 - cx) * viewport.width,
        y: cy * viewport.height,
    }
}

/// Lean follows the direction of motion, not the absolute position, with a
/// dead zone so a resting head doesn't flap between sides.
pub fn lean_from_delta(prev_x: f32, x: f32, threshold: f32) -> Lean {
    let dx = x - prev_x;
    if dx > threshold {
        Lean::Right
    } else if dx < -threshold {
        Lean::Left
    } else {
        Lean::Center
    }
}

// ── Stateful mapper ───────────────────────────────────────────────────────────

/// Result of feeding one detector frame through the mapper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlSignal {
    FaceMissing,
    Tracking(ControlState),
}

#[derive(Clone, Debug)]
pub struct ControlMapper {
    sensitivity: f32,
    min_sensitivity: f32,
    max_sensitivity: f32,
    mouth_threshold: f32,
    lean_threshold: f32,
    state: ControlState,
    /// False until an aim has been mapped since the face (re)appeared.
    tracking: bool,
}

impl ControlMapper {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            sensitivity: config.clamp_sensitivity(config.default_sensitivity),
            min_sensitivity: config.min_sensitivity,
            max_sensitivity: config.max_sensitivity,
            mouth_threshold: config.mouth_open_threshold,
            lean_threshold: config.lean_threshold,
            state: ControlState::default(),
            tracking: false,
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Clamp into the allowed range and return the value actually applied.
    pub fn set_sensitivity(&mut self, value: f32) -> f32 {
        self.sensitivity = value.clamp(self.min_sensitivity, self.max_sensitivity);
        self.sensitivity
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Feed one detector result.  Malformed landmark sets are reported as
    /// errors and leave the control state untouched.
    pub fn update(
        &mut self,
        face: Option<&FaceLandmarks>,
        viewport: &Viewport,
    ) -> Result<ControlSignal> {
        let Some(face) = face else {
            self.state.prev_mouth_open = self.state.mouth_open;
            self.state.mouth_open = false;
            self.state.face_present = false;
            self.state.lean = Lean::Center;
            self.tracking = false;
            return Ok(ControlSignal::FaceMissing);
        };

        let nose = face.point(NOSE_TIP)?;
        let ratio = mouth_ratio(face)?;
        let aim = map_aim(nose.x, nose.y, self.sensitivity, viewport);

        let lean = if self.tracking {
            lean_from_delta(self.state.aim.x, aim.x, self.lean_threshold)
        } else {
            Lean::Center
        };

        self.state = ControlState {
            aim,
            mouth_open: ratio > self.mouth_threshold,
            prev_mouth_open: self.state.mouth_open,
            lean,
            face_present: true,
        };
        self.tracking = true;
        Ok(ControlSignal::Tracking(self.state))
    }
}
