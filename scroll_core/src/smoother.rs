//! Per-frame shaft motion and rolling rotation.
//!
//! Each frame a shaft moves a fixed fraction of the way to its target
//! (first-order exponential decay). The distance it travelled that frame
//! turns the shaft by `Δx / radius`, so it looks like it rolls along the
//! paper. The two shafts turn in opposite senses.

use crate::config::ScrollConfig;

/// One shaft's kinematic state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaftState {
    pub position_x:          f32,
    pub previous_position_x: f32,
    pub target_x:            f32,
    /// Accumulated rotation about the shaft's long axis, radians.
    pub rotation:            f32,
}

impl ShaftState {
    fn at(x: f32) -> Self {
        ShaftState {
            position_x:          x,
            previous_position_x: x,
            target_x:            x,
            rotation:            0.0,
        }
    }

    /// Step toward `target_x` and return the distance moved this frame.
    fn advance(&mut self, target_x: f32, factor: f32) -> f32 {
        self.target_x = target_x;
        self.position_x += (self.target_x - self.position_x) * factor;
        let dx = self.position_x - self.previous_position_x;
        self.previous_position_x = self.position_x;
        dx
    }
}

/// Shaft positions published after a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaftPositions {
    pub left_x:  f32,
    pub right_x: f32,
}

impl ShaftPositions {
    pub fn separation(&self) -> f32 {
        self.right_x - self.left_x
    }
}

#[derive(Debug, Clone)]
pub struct KinematicSmoother {
    left:           ShaftState,
    right:          ShaftState,
    factor:         f32,
    rotation_scale: f32,
    radius:         f32,
}

impl KinematicSmoother {
    /// Both shafts start touching at the centreline.
    pub fn new(config: &ScrollConfig) -> Self {
        KinematicSmoother {
            left:           ShaftState::at(-config.shaft_radius),
            right:          ShaftState::at(config.shaft_radius),
            factor:         config.smoothing_factor,
            rotation_scale: config.rotation_scale(),
            radius:         config.shaft_radius,
        }
    }

    /// Advance one frame toward `(left_target, right_target)`.
    pub fn step(&mut self, (left_target, right_target): (f32, f32)) -> ShaftPositions {
        let dxl = self.left.advance(left_target, self.factor);
        let dxr = self.right.advance(right_target, self.factor);

        // Rounding near the limit must never let the shafts overlap.
        self.left.position_x = self.left.position_x.min(-self.radius);
        self.right.position_x = self.right.position_x.max(self.radius);
        self.left.previous_position_x = self.left.position_x;
        self.right.previous_position_x = self.right.position_x;

        self.left.rotation -= dxl * self.rotation_scale;
        self.right.rotation += dxr * self.rotation_scale;

        self.positions()
    }

    pub fn positions(&self) -> ShaftPositions {
        ShaftPositions {
            left_x:  self.left.position_x,
            right_x: self.right.position_x,
        }
    }

    pub fn left(&self) -> &ShaftState  { &self.left }
    pub fn right(&self) -> &ShaftState { &self.right }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> KinematicSmoother {
        KinematicSmoother::new(&ScrollConfig::default())
    }

    #[test]
    fn first_step_moves_fifteen_percent() {
        let mut s = smoother();
        let p = s.step((-8.45, 8.45));
        assert!((p.left_x - (-0.45 - 8.0 * 0.15)).abs() < 1e-5);
        assert!((p.right_x - (0.45 + 8.0 * 0.15)).abs() < 1e-5);
    }

    #[test]
    fn converges_to_target() {
        let mut s = smoother();
        for _ in 0..200 { s.step((-8.0, 8.0)); }
        let p = s.positions();
        assert!((p.left_x + 8.0).abs() < 1e-3);
        assert!((p.right_x - 8.0).abs() < 1e-3);
        assert!((p.separation() - 16.0).abs() < 2e-3);
    }

    #[test]
    fn rotation_mirrors_travel() {
        let mut s = smoother();
        s.step((-1.45, 1.45));
        // Each shaft moved 0.15 outward.
        let expected = 0.15 / 0.45;
        assert!((s.left().rotation - expected).abs() < 1e-4);
        assert!((s.right().rotation - expected).abs() < 1e-4);

        // Rolling back in unwinds both.
        for _ in 0..300 { s.step((-0.45, 0.45)); }
        assert!(s.left().rotation.abs() < 1e-3);
        assert!(s.right().rotation.abs() < 1e-3);
    }

    #[test]
    fn previous_position_tracks_current() {
        let mut s = smoother();
        s.step((-5.0, 3.0));
        assert_eq!(s.left().previous_position_x, s.left().position_x);
        assert_eq!(s.right().previous_position_x, s.right().position_x);
        assert_eq!(s.right().target_x, 3.0);
    }

    #[test]
    fn still_shaft_does_not_turn() {
        let mut s = smoother();
        for _ in 0..10 { s.step((-0.45, 0.45)); }
        assert_eq!(s.left().rotation, 0.0);
        assert_eq!(s.right().rotation, 0.0);
    }
}
