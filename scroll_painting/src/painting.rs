//! Painting images and the providers that make them.
//!
//! A [`Painting`] is a plain ARGB pixel buffer spanning the whole logical
//! canvas; the visualizer samples it through a
//! [`TextureWindow`](scroll_core::TextureWindow). Providers are blocking and
//! run on the generator thread.

use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rice-paper background.
pub const PAPER_COLOR: u32 = 0xFFFCFAF2;
/// Vermilion seal stamp.
const SEAL_COLOR: u32 = 0xFFB22222;

// ════════════════════════════════════════════════════════════════════════════
// GenerationError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("provider failed: {0}")]
    Provider(String),

    #[error("provider returned no usable image")]
    EmptyImage,

    #[error("generator thread has stopped")]
    Disconnected,
}

// ════════════════════════════════════════════════════════════════════════════
// Painting
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct Painting {
    pub width:  usize,
    pub height: usize,
    /// Row-major 0xAARRGGBB.
    pub pixels: Vec<u32>,
}

impl Painting {
    /// An unpainted sheet.
    pub fn blank(width: usize, height: usize) -> Self {
        Painting { width, height, pixels: vec![PAPER_COLOR; width * height] }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.len() != self.width * self.height
    }

    /// Nearest-texel lookup with clamp-to-edge wrapping.
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        if self.is_empty() {
            return PAPER_COLOR;
        }
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as usize).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }

    fn put(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PaintingProvider
// ════════════════════════════════════════════════════════════════════════════

/// Turns a style prompt into a finished painting. May block for seconds.
pub trait PaintingProvider: Send + 'static {
    fn paint(&mut self, style: &str) -> Result<Painting, GenerationError>;
}

// ════════════════════════════════════════════════════════════════════════════
// InkWashProvider — offline procedural landscapes
// ════════════════════════════════════════════════════════════════════════════

/// Colour scheme for one style.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Palette {
    /// Hue of the nearest ridge, degrees.
    hue:        f32,
    saturation: f32,
    /// Number of ridge layers; fewer reads as emptier, more "zen".
    layers:     usize,
    /// Scatter blossoms over the foreground.
    blossoms:   bool,
}

fn palette_for(style: &str) -> Palette {
    let s = style.to_lowercase();
    if s.contains("blue-green") {
        Palette { hue: 170.0, saturation: 0.45, layers: 4, blossoms: false }
    } else if s.contains("flower") || s.contains("bird") {
        Palette { hue: 30.0, saturation: 0.25, layers: 2, blossoms: true }
    } else if s.contains("zen") {
        Palette { hue: 0.0, saturation: 0.0, layers: 1, blossoms: false }
    } else if s.contains("freehand") {
        Palette { hue: 25.0, saturation: 0.12, layers: 3, blossoms: false }
    } else {
        Palette { hue: 0.0, saturation: 0.0, layers: 4, blossoms: false }
    }
}

/// Procedural painter: layered mountain ridges in diluted ink, a palette
/// per style, and a seal in the corner.
pub struct InkWashProvider {
    width:   usize,
    height:  usize,
    latency: Duration,
    rng:     StdRng,
}

impl InkWashProvider {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        InkWashProvider {
            width,
            height,
            latency: Duration::ZERO,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pretend to be a remote model that takes a while.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Render immediately, ignoring latency.
    pub fn render(&mut self, style: &str) -> Painting {
        let palette = palette_for(style);
        let mut img = Painting::blank(self.width, self.height);
        if img.is_empty() {
            return img;
        }
        let (w, h) = (self.width, self.height);

        // Far ridges first, nearest last.
        for layer in 0..palette.layers {
            let depth = (layer + 1) as f32 / palette.layers as f32;
            let ridge = ValueNoise::new(&mut self.rng, 6 + layer * 4);
            let base = 0.35 + 0.45 * depth;
            let amp = 0.18 + 0.12 * (1.0 - depth);
            let ink = hsv_to_argb(palette.hue, palette.saturation, 0.55 - 0.4 * depth);
            let wash = 0.25 + 0.55 * depth;

            for x in 0..w {
                let u = x as f32 / w as f32;
                let top = ((base - amp * ridge.fbm(u)) * h as f32).max(0.0) as usize;
                for y in top.min(h)..h {
                    // Ink thins out toward the foot of each ridge.
                    let fade = 1.0 - (y - top) as f32 / (h - top).max(1) as f32 * 0.6;
                    let i = y * w + x;
                    img.pixels[i] = blend(img.pixels[i], ink, wash * fade);
                }
            }
        }

        if palette.blossoms {
            let petal = hsv_to_argb(350.0, 0.6, 0.9);
            for _ in 0..(w * h / 4000).max(1) {
                let cx = self.rng.gen_range(0..w);
                let cy = self.rng.gen_range(h / 2..h);
                for dy in 0..3 {
                    for dx in 0..3 {
                        img.put(cx + dx, cy + dy, petal);
                    }
                }
            }
        }

        // Seal, lower right.
        let side = (h / 24).max(2);
        for y in h.saturating_sub(side * 2)..h.saturating_sub(side) {
            for x in w.saturating_sub(side * 2)..w.saturating_sub(side) {
                img.put(x, y, SEAL_COLOR);
            }
        }
        img
    }
}

impl PaintingProvider for InkWashProvider {
    fn paint(&mut self, style: &str) -> Result<Painting, GenerationError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let img = self.render(style);
        if img.is_empty() {
            return Err(GenerationError::EmptyImage);
        }
        Ok(img)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 1-D value noise for ridge lines
// ────────────────────────────────────────────────────────────────────────────

struct ValueNoise {
    lattice: Vec<f32>,
}

impl ValueNoise {
    fn new(rng: &mut StdRng, points: usize) -> Self {
        ValueNoise { lattice: (0..points.max(2)).map(|_| rng.gen::<f32>()).collect() }
    }

    /// Smoothly interpolated value at `u` in `[0, 1]`.
    fn at(&self, u: f32) -> f32 {
        let n = self.lattice.len() - 1;
        let p = u.clamp(0.0, 1.0) * n as f32;
        let i = (p as usize).min(n - 1);
        let f = p - i as f32;
        let s = f * f * (3.0 - 2.0 * f);
        self.lattice[i] * (1.0 - s) + self.lattice[i + 1] * s
    }

    /// Two octaves; the second adds the jagged brush texture.
    fn fbm(&self, u: f32) -> f32 {
        0.7 * self.at(u) + 0.3 * self.at((u * 3.7).fract())
    }
}

/// Convert HSV → packed ARGB (0xAARRGGBB, A=0xFF).
fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let h  = h.rem_euclid(360.0);
    let hi = (h / 60.0) as u32;
    let f  = h / 60.0 - hi as f32;
    let p  = v * (1.0 - s);
    let q  = v * (1.0 - s * f);
    let t  = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    0xFF000000 | ((r * 255.0) as u32) << 16 | ((g * 255.0) as u32) << 8 | (b * 255.0) as u32
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t) as u32) << shift
    };
    0xFF000000 | mix(16) | mix(8) | mix(0)
}
