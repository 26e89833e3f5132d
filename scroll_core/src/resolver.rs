//! Shaft targets from hand samples.

use crate::config::ScrollConfig;
use crate::hand::{HandFrame, HandSample};

/// Holds the latest target for each shaft.
///
/// Left targets never exceed `-shaft_radius` and right targets never fall
/// below `+shaft_radius`, so the shafts meet at the centreline at most.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    world_width: f32,
    radius:      f32,
    left:        f32,
    right:       f32,
}

impl TargetResolver {
    /// Targets start fully closed.
    pub fn new(config: &ScrollConfig) -> Self {
        TargetResolver {
            world_width: config.world_width,
            radius:      config.shaft_radius,
            left:        -config.shaft_radius,
            right:       config.shaft_radius,
        }
    }

    /// Update targets from `frame`. A side with no sample keeps its previous
    /// target. `hold_closed` pins both shafts shut regardless of input.
    pub fn resolve(&mut self, frame: &HandFrame, hold_closed: bool) {
        if hold_closed {
            self.left = -self.radius;
            self.right = self.radius;
            return;
        }
        if let Some(s) = frame.left.and_then(HandSample::sanitized) {
            self.left = (-self.radius).min(self.to_world(s.x));
        }
        if let Some(s) = frame.right.and_then(HandSample::sanitized) {
            self.right = self.radius.max(self.to_world(s.x));
        }
    }

    /// Map normalised x to world x, centred on the origin.
    pub fn to_world(&self, x: f32) -> f32 {
        x * self.world_width - self.world_width / 2.0
    }

    /// `(left, right)` targets.
    pub fn targets(&self) -> (f32, f32) {
        (self.left, self.right)
    }
}
