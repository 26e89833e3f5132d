//! Which slice of the artwork the paper shows.
//!
//! The artwork spans the whole logical canvas, `[-W/2, W/2]`. The paper
//! between the shafts is a window onto it: opening the scroll reveals more
//! of the same fixed image instead of stretching it.

/// Smallest visible width, so a fully-shut scroll never divides by zero.
pub const MIN_VISIBLE_WIDTH: f32 = 0.01;

/// Horizontal sampling window into the source image, in UV units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureWindow {
    /// Fraction of the canvas to the left of the visible window.
    pub offset: f32,
    /// Fraction of the canvas currently visible.
    pub repeat: f32,
}

impl TextureWindow {
    /// Compute the window for shafts at `left_x`/`right_x`.
    pub fn map(left_x: f32, right_x: f32, world_width: f32) -> Self {
        let visible = (right_x - left_x).max(MIN_VISIBLE_WIDTH);
        let left_limit = -world_width / 2.0;
        TextureWindow {
            offset: (left_x - left_limit) / world_width,
            repeat: visible / world_width,
        }
    }

    /// Source-image `u` for a point `t` of the way across the paper
    /// (0.0 at the left shaft, 1.0 at the right). Clamps to the image edge.
    pub fn sample_u(&self, t: f32) -> f32 {
        (self.offset + self.repeat * t).clamp(0.0, 1.0)
    }
}
