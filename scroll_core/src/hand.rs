//! Hand samples as delivered by a tracker.
//!
//! Coordinates are normalised to the camera frame: `x` runs 0.0 (left edge)
//! to 1.0 (right edge). A side with no detected hand is `None`, which is
//! distinct from a stale value: the resolver treats it as "no update".

/// Which scroll handle a sample drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// One normalised hand position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandSample {
    pub x: f32,
    pub y: f32,
}

impl HandSample {
    pub fn new(x: f32, y: f32) -> Self {
        HandSample { x, y }
    }

    /// Clamp into the unit square. Non-finite samples are dropped entirely.
    pub fn sanitized(self) -> Option<Self> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return None;
        }
        Some(HandSample {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        })
    }
}

/// Both handles' samples for one tracker update.
///
/// `left`/`right` are logical scene handles; mapping physical hands onto
/// them is the tracker's job.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandFrame {
    pub left:  Option<HandSample>,
    pub right: Option<HandSample>,
}

impl HandFrame {
    pub fn empty() -> Self {
        HandFrame::default()
    }

    pub fn both(left: HandSample, right: HandSample) -> Self {
        HandFrame { left: Some(left), right: Some(right) }
    }

    pub fn side(&self, side: Side) -> Option<HandSample> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
