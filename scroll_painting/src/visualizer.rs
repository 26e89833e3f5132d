//! Software-rendered scroll using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ ● left hand                                                  │
//! │ ● right hand     ▄▄                        ▄▄                │
//! │                  ██░░░░░░░ painting ░░░░░░░██                │
//! │                  ██░░░░░░ (windowed) ░░░░░░██                │
//! │                  ██░░░░░░░░░░░░░░░░░░░░░░░░██                │
//! │                  ▀▀                        ▀▀                │
//! │                      [ engagement progress ]                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The status line goes in the window title.

use std::f32::consts::PI;
use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use scroll_core::{HandFrame, TextureWindow, TickReport};

use crate::hands::{PointerState, SimInput};
use crate::painting::{blend, Painting};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:       usize = 1200;
pub const WIN_H:       usize = 640;
const BG_COLOR:        u32   = 0xFFD9D6C3;
const SHAFT_COLOR:     u32   = 0xFFF1A30D;  // gold brocade
const CAP_COLOR:       u32   = 0xFF0A0A0A;  // ebony
const BORDER_COLOR:    u32   = 0xFFDA9100;
const INDICATOR_ON:    u32   = 0xFFEAB308;
const INDICATOR_OFF:   u32   = 0xFFB8B4A8;
const BAR_BG:          u32   = 0xFFC4C0AE;
const BAR_INK:         u32   = 0xFF374151;
/// World-unit heights of the scene pieces.
const SHAFT_HEIGHT:    f32   = 8.5;
const PAPER_HEIGHT:    f32   = 8.2;
const BORDER_MARGIN:   f32   = 0.15;
const CAP_HEIGHT:      f32   = 0.4;
const TITLE:           &str  = "Scroll Painting";

// ════════════════════════════════════════════════════════════════════════════
// Layout — world units → pixels
// ════════════════════════════════════════════════════════════════════════════

/// Orthographic mapping from world space onto the window, leaving a margin
/// around the full canvas width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    px_per_unit: f32,
}

impl Layout {
    pub fn new(world_width: f32) -> Self {
        Layout { px_per_unit: WIN_W as f32 / (world_width * 1.1) }
    }

    pub fn screen_x(&self, world_x: f32) -> f32 {
        WIN_W as f32 / 2.0 + world_x * self.px_per_unit
    }

    /// Screen y of a world height measured from the window's centre line.
    pub fn screen_y(&self, world_y: f32) -> f32 {
        WIN_H as f32 / 2.0 - world_y * self.px_per_unit
    }

    pub fn px(&self, units: f32) -> f32 {
        units * self.px_per_unit
    }
}

/// Everything drawn in one frame.
pub struct Scene<'a> {
    pub report:     &'a TickReport,
    pub painting:   &'a Painting,
    pub hands:      HandFrame,
    /// Engagement countdown progress, when one is running.
    pub progress:   Option<f32>,
    pub generating: bool,
    pub status:     Option<&'a str>,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    sim_tx: Sender<SimInput>,
    layout: Layout,
    radius: f32,
    title:  String,
    frame:  u64,
}

impl Visualizer {
    pub fn new(
        sim_tx: Sender<SimInput>,
        world_width: f32,
        shaft_radius: f32,
    ) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            TITLE,
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            layout: Layout::new(world_width),
            radius: shaft_radius,
            title: TITLE.to_string(),
            frame: 0,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keys and forward them as [`SimInput`].
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }

        let (mx, my) = self.window.get_mouse_pos(MouseMode::Clamp).unwrap_or((0.0, 0.0));
        let pointer = PointerState {
            x:          mx / WIN_W as f32,
            y:          my / WIN_H as f32,
            left_down:  self.window.get_mouse_down(MouseButton::Left),
            right_down: self.window.get_mouse_down(MouseButton::Right),
            clasp:      self.window.is_key_down(Key::C),
        };
        let _ = self.sim_tx.send(SimInput::Pointer(pointer));
        true
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene<'_>) {
        self.frame += 1;
        self.buf.fill(BG_COLOR);

        let left = self.layout.screen_x(scene.report.positions.left_x);
        let right = self.layout.screen_x(scene.report.positions.right_x);

        self.draw_paper(left, right, scene.report.window, scene.painting);
        self.draw_shaft(left, scene.report.left_rotation);
        self.draw_shaft(right, scene.report.right_rotation);

        self.draw_indicator(24, 24, scene.hands.left.is_some());
        self.draw_indicator(24, 44, scene.hands.right.is_some());

        if scene.generating {
            self.draw_busy_bar();
        } else if let Some(p) = scene.progress {
            self.draw_progress_bar(p);
        }

        let title = match scene.status {
            Some(s) => format!("{} — {}", TITLE, s),
            None => TITLE.to_string(),
        };
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Paper ─────────────────────────────────────────────────────────────

    fn draw_paper(&mut self, left: f32, right: f32, window: TextureWindow, painting: &Painting) {
        let top = self.layout.screen_y(PAPER_HEIGHT / 2.0);
        let bottom = self.layout.screen_y(-PAPER_HEIGHT / 2.0);
        let margin = self.layout.px(BORDER_MARGIN);

        self.fill_rect(
            left as i32, (top - margin) as i32,
            (right - left) as i32, (bottom - top + 2.0 * margin) as i32,
            BORDER_COLOR,
        );

        let (x0, x1) = (left.max(0.0) as usize, (right as usize).min(WIN_W));
        let (y0, y1) = (top.max(0.0) as usize, (bottom as usize).min(WIN_H));
        let width = (right - left).max(1.0);
        let height = (bottom - top).max(1.0);
        for x in x0..x1 {
            let u = window.sample_u((x as f32 - left) / width);
            for y in y0..y1 {
                let v = (y as f32 - top) / height;
                self.buf[y * WIN_W + x] = painting.sample(u, v);
            }
        }
    }

    // ── Shaft ─────────────────────────────────────────────────────────────

    /// A gold cylinder seen side-on; diagonal bands turn with `rotation` so
    /// the shaft visibly rolls.
    fn draw_shaft(&mut self, centre: f32, rotation: f32) {
        let r = self.layout.px(self.radius).max(1.0);
        let top = self.layout.screen_y(SHAFT_HEIGHT / 2.0);
        let bottom = self.layout.screen_y(-SHAFT_HEIGHT / 2.0);

        for col in (-r as i32)..=(r as i32) {
            let dx = (col as f32 / r).clamp(-1.0, 1.0);
            let light = 0.55 + 0.45 * (1.0 - dx * dx).sqrt();
            let angle = dx.asin() + rotation;
            let band = if ((angle / (PI / 4.0)).floor() as i64).rem_euclid(2) == 0 { 1.0 } else { 0.86 };
            let color = blend(0xFF000000, SHAFT_COLOR, light * band);
            let x = centre as i32 + col;
            self.fill_rect(x, top as i32, 1, (bottom - top) as i32, color);
        }

        let cap_w = self.layout.px(self.radius * 2.2) as i32;
        let cap_h = self.layout.px(CAP_HEIGHT) as i32;
        let cx = centre as i32 - cap_w / 2;
        self.fill_rect(cx, top as i32 - cap_h, cap_w, cap_h, CAP_COLOR);
        self.fill_rect(cx, bottom as i32, cap_w, cap_h, CAP_COLOR);
    }

    // ── Overlays ──────────────────────────────────────────────────────────

    fn draw_indicator(&mut self, x: i32, y: i32, active: bool) {
        let color = if active { INDICATOR_ON } else { INDICATOR_OFF };
        self.fill_rect(x, y, 10, 10, color);
    }

    fn draw_progress_bar(&mut self, progress: f32) {
        let (x, y, w) = bar_geometry();
        self.fill_rect(x, y, w, 6, BAR_BG);
        self.fill_rect(x, y, (w as f32 * progress.clamp(0.0, 1.0)) as i32, 6, INDICATOR_ON);
    }

    /// An ink block sweeping back and forth while a painting is made.
    fn draw_busy_bar(&mut self) {
        let (x, y, w) = bar_geometry();
        self.fill_rect(x, y, w, 6, BAR_BG);
        let block = w / 6;
        let period = 2 * (w - block) as u64;
        let step = (self.frame * 6 % period.max(1)) as i32;
        let pos = if step < w - block { step } else { 2 * (w - block) - step };
        self.fill_rect(x + pos, y, block, 6, BAR_INK);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    /// Filled rectangle, clipped to the window.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w).clamp(0, WIN_W as i32) as usize;
        let y1 = (y + h).clamp(0, WIN_H as i32) as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }
}

/// `(x, y, width)` of the bar under the scroll.
fn bar_geometry() -> (i32, i32, i32) {
    let w = 300;
    ((WIN_W as i32 - w) / 2, WIN_H as i32 - 28, w)
}
