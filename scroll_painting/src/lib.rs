//! # scroll_painting
//!
//! A hand-scrolled Chinese painting. Two gold shafts hold a paper scroll;
//! each hand drags one shaft, unrolling or hiding the picture. Keep the
//! scroll shut for five seconds and a fresh painting is made in one of five
//! traditional styles, then revealed when the hands pull it open again.
//!
//! ## Threads
//!
//! | Thread | Module | Talks over |
//! |---|---|---|
//! | Hand source (Leap or sim) | [`hands`] | `mpsc` of [`hands::HandMessage`] |
//! | Painting generator | [`generator`] | `mpsc` of requests / outcomes |
//! | Render loop | [`app`], [`visualizer`] | owns the `ScrollController` |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse stands in for the hands.
//! * `leap` — **Hardware mode**: palms tracked by a LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Left button drag | Move the left shaft |
//! | Right button drag | Move the right shaft |
//! | `C` held | Clasp both hands at the centre (close the scroll) |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod generator;
pub mod hands;
pub mod painting;
pub mod visualizer;
