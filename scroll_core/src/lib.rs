//! # scroll_core
//!
//! The interaction controller behind the hand-driven scroll painting. Two
//! shafts hold a painted scroll; each follows one tracked hand. Holding the
//! scroll shut long enough asks for a new painting.
//!
//! ## Per-frame pipeline
//!
//! | Stage | Module | Output |
//! |---|---|---|
//! | Hand samples → shaft targets | [`resolver`] | `(left, right)` world x |
//! | Exponential smoothing + rolling | [`smoother`] | positions, rotations |
//! | Open/closed edges | [`closure`] | [`ClosureEvent`] once per crossing |
//! | Sustained-closed debounce | [`engagement`] | at most one [`GenerationRequest`] |
//! | Visible slice of the artwork | [`texture`] | [`TextureWindow`] offset/repeat |
//!
//! [`ScrollController`] wires them together; call
//! [`ScrollController::tick`] once per rendered frame and feed provider
//! results back through [`ScrollController::resolve_generation`].
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use scroll_core::{HandFrame, HandSample, ScrollConfig, ScrollController};
//!
//! let mut ctl = ScrollController::with_seed(ScrollConfig::default(), 3);
//! let t0 = Instant::now();
//! let hands = HandFrame::both(HandSample::new(0.1, 0.5), HandSample::new(0.9, 0.5));
//! let report = ctl.tick(&hands, t0);
//! assert!(report.separation() > 0.9);
//! assert!(report.request.is_none());
//! ```

pub mod closure;
pub mod config;
pub mod controller;
pub mod engagement;
pub mod error;
pub mod hand;
pub mod resolver;
pub mod smoother;
pub mod texture;

pub use closure::{ClosureDetector, ClosureEvent, ClosureState};
pub use config::ScrollConfig;
pub use controller::{ScrollController, TickReport};
pub use engagement::{Countdown, EngagementTimer, GenerationRequest, RequestId, Resolution};
pub use error::{Error, Result};
pub use hand::{HandFrame, HandSample, Side};
pub use resolver::TargetResolver;
pub use smoother::{KinematicSmoother, ShaftPositions, ShaftState};
pub use texture::TextureWindow;
