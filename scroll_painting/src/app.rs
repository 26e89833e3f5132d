//! Top-level application state.
//!
//! `AppState` owns the `ScrollController`, the `Generator` and the painting
//! on display. It folds finished generations back into the controller and
//! hands new requests to the generator, once per frame.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use scroll_core::{HandFrame, Resolution, ScrollConfig, ScrollController, TickReport};
use tracing::{debug, info, warn};

use crate::generator::{GenerationOutcome, Generator};
use crate::hands::{spawn_hand_source, HandMessage, SimInput};
use crate::painting::{InkWashProvider, Painting, PaintingProvider};
use crate::visualizer::{Scene, Visualizer};

/// How long the "try again" notice stays up after a failed generation.
pub const FAILURE_NOTICE: Duration = Duration::from_secs(3);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(#[from] minifb::Error),

    #[error(transparent)]
    Config(#[from] scroll_core::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

pub struct AppConfig {
    pub scroll:        ScrollConfig,
    /// Fixes style choice and procedural paintings; random when `None`.
    pub seed:          Option<u64>,
    /// Simulated provider round-trip.
    pub latency:       Duration,
    /// Pixel size of each generated painting.
    pub painting_size: (usize, usize),
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scroll:        ScrollConfig::default(),
            seed:          None,
            latency:       Duration::from_millis(2500),
            painting_size: (1600, 400),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// A status line that disappears on its own.
struct Notice {
    text:  String,
    until: Instant,
}

pub struct AppState {
    controller: ScrollController,
    generator:  Generator,
    painting:   Painting,
    hands:      HandFrame,
    notice:     Option<Notice>,
}

impl AppState {
    /// Procedural ink-wash paintings with the configured latency.
    pub fn new(cfg: AppConfig) -> Self {
        let seed = cfg.seed.unwrap_or_else(rand::random);
        let (w, h) = cfg.painting_size;
        let mut provider = InkWashProvider::new(w, h, seed).with_latency(cfg.latency);
        let first_style = cfg.scroll.styles.first().cloned().unwrap_or_default();
        let painting = provider.render(&first_style);
        let controller = ScrollController::with_seed(cfg.scroll, seed);
        Self::assemble(controller, provider, painting)
    }

    /// Any provider, starting from `painting`.
    pub fn with_provider<P: PaintingProvider>(
        scroll: ScrollConfig,
        seed: u64,
        provider: P,
        painting: Painting,
    ) -> Self {
        Self::assemble(ScrollController::with_seed(scroll, seed), provider, painting)
    }

    fn assemble<P: PaintingProvider>(
        controller: ScrollController,
        provider: P,
        painting: Painting,
    ) -> Self {
        AppState {
            controller,
            generator: Generator::spawn(provider),
            painting,
            hands: HandFrame::empty(),
            notice: None,
        }
    }

    /// Latest hands replace whatever came before.
    pub fn update_hands(&mut self, frame: HandFrame) {
        self.hands = frame;
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, now: Instant) -> TickReport {
        for outcome in self.generator.drain_outcomes() {
            self.apply_outcome(outcome, now);
        }

        let report = self.controller.tick(&self.hands, now);

        if let Some(request) = &report.request {
            if let Err(e) = self.generator.submit(request.clone()) {
                warn!(id = %request.id, error = %e, "could not hand request to generator");
                self.controller.resolve_generation(request.id, Resolution::Failure, now);
                self.notify(failure_text(), now + FAILURE_NOTICE);
            }
        }
        report
    }

    fn apply_outcome(&mut self, outcome: GenerationOutcome, now: Instant) {
        let GenerationOutcome { id, style, result } = outcome;
        match result {
            Ok(painting) => {
                if !self.controller.resolve_generation(id, Resolution::Success, now) {
                    debug!(id = %id, "dropping stale painting");
                    return;
                }
                info!(id = %id, style = %style, "new painting on the scroll");
                self.painting = painting;
                let hold = self.controller.config().success_hold();
                self.notify(format!("A new {} unrolls", style), now + hold);
            }
            Err(e) => {
                if self.controller.resolve_generation(id, Resolution::Failure, now) {
                    warn!(id = %id, error = %e, "generation failed");
                    self.notify(failure_text(), now + FAILURE_NOTICE);
                }
            }
        }
    }

    fn notify(&mut self, text: String, until: Instant) {
        self.notice = Some(Notice { text, until });
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn painting(&self)      -> &Painting { &self.painting }
    pub fn hands(&self)         -> HandFrame { self.hands }
    pub fn is_generating(&self) -> bool      { self.controller.is_generating() }
    pub fn config(&self)        -> &ScrollConfig { self.controller.config() }

    pub fn engagement_progress(&self, now: Instant) -> Option<f32> {
        self.controller.engagement_progress(now)
    }

    /// Text for the status line, if anything is worth saying.
    pub fn status(&self, now: Instant) -> Option<&str> {
        if let Some(n) = self.notice.as_ref().filter(|n| now < n.until) {
            return Some(n.text.as_str());
        }
        if self.is_generating() {
            Some("Painting…")
        } else if self.engagement_progress(now).is_some() {
            Some("Hold the scroll closed to paint")
        } else {
            None
        }
    }
}

fn failure_text() -> String {
    "Generation failed, close the scroll to try again".to_string()
}

/// Drain pending hand messages, keeping the newest frame.
/// Returns false once the source has quit.
fn drain_hands(rx: &Receiver<HandMessage>, app: &mut AppState) -> bool {
    loop {
        match rx.try_recv() {
            Ok(HandMessage::Frame(f))       => app.update_hands(f),
            Ok(HandMessage::Quit)           => return false,
            Err(TryRecvError::Empty)        => return true,
            Err(TryRecvError::Disconnected) => {
                warn!("hand source stopped");
                return false;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer, the hand source (mouse simulation by default,
/// hardware with `--features leap`) and the generator, then drives the
/// render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.scroll.validate()?;

    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(feature = "leap")]
    let hand_rx = {
        drop(sim_rx);
        spawn_hand_source(crate::hands::LeapHandSource::default())
    };
    #[cfg(not(feature = "leap"))]
    let hand_rx = spawn_hand_source(crate::hands::SimHandSource { rx: sim_rx });

    let mut vis = Visualizer::new(sim_tx, cfg.scroll.world_width, cfg.scroll.shaft_radius)?;
    let mut app = AppState::new(cfg);
    info!("scroll ready");

    while vis.is_open() {
        if !vis.poll_input() { break; }
        if !drain_hands(&hand_rx, &mut app) { break; }

        let now = Instant::now();
        let report = app.tick(now);

        vis.render(&Scene {
            report:     &report,
            painting:   app.painting(),
            hands:      app.hands(),
            progress:   app.engagement_progress(now),
            generating: app.is_generating(),
            status:     app.status(now),
        });
    }

    info!("window closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painting::GenerationError;
    use scroll_core::{ClosureState, HandSample};
    use std::thread;

    const FRAME: Duration = Duration::from_millis(16);

    /// Returns the same answer for every request.
    struct Fixed(Result<Painting, GenerationError>);

    impl PaintingProvider for Fixed {
        fn paint(&mut self, _style: &str) -> Result<Painting, GenerationError> {
            self.0.clone()
        }
    }

    fn app_with(result: Result<Painting, GenerationError>) -> AppState {
        AppState::with_provider(ScrollConfig::default(), 4, Fixed(result), Painting::blank(1, 1))
    }

    /// Tick with no hands until a request goes out, then until the outcome
    /// has been folded back in. Returns the simulated clock.
    fn close_and_wait(app: &mut AppState, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..400 {
            now += FRAME;
            if app.tick(now).request.is_some() { break; }
        }
        assert!(app.is_generating());
        for _ in 0..500 {
            now += Duration::from_millis(1);
            app.tick(now);
            if !app.is_generating() { return now; }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("generation never resolved");
    }

    #[test]
    fn success_swaps_painting_and_announces_style() {
        let mut app = app_with(Ok(Painting::blank(3, 2)));
        let now = close_and_wait(&mut app, Instant::now());
        assert_eq!(app.painting().width, 3);
        let status = app.status(now).unwrap();
        assert!(status.starts_with("A new "));
        assert!(status.ends_with(" unrolls"));
        // Gone once the reveal pause is over.
        assert_eq!(app.status(now + Duration::from_secs(2)), None);
    }

    #[test]
    fn failure_keeps_painting_and_shows_notice_for_three_seconds() {
        let mut app = app_with(Err(GenerationError::Provider("offline".into())));
        let now = close_and_wait(&mut app, Instant::now());
        assert_eq!(app.painting().width, 1);
        assert!(app.status(now).unwrap().contains("try again"));
        assert!(app.status(now + Duration::from_millis(2900)).is_some());
        assert_eq!(app.status(now + Duration::from_millis(3100)), None);
    }

    #[test]
    fn countdown_status_while_held_closed() {
        let mut app = app_with(Ok(Painting::blank(2, 2)));
        let t0 = Instant::now();
        app.tick(t0);
        assert_eq!(app.status(t0), Some("Hold the scroll closed to paint"));
        assert!(app.engagement_progress(t0).is_some());
    }

    #[test]
    fn latest_hands_drive_shafts_open() {
        let mut app = app_with(Ok(Painting::blank(2, 2)));
        app.update_hands(HandFrame::both(HandSample::new(0.0, 0.5), HandSample::new(0.0, 0.5)));
        app.update_hands(HandFrame::both(HandSample::new(0.1, 0.5), HandSample::new(0.9, 0.5)));
        let t0 = Instant::now();
        let mut report = app.tick(t0);
        for i in 1..200 {
            report = app.tick(t0 + FRAME * i);
        }
        assert_eq!(report.closure_state, ClosureState::Open);
        assert!((report.separation() - 16.0).abs() < 0.1);
        assert!(!app.is_generating());
    }

    #[test]
    fn drain_hands_keeps_newest_and_stops_on_quit() {
        let mut app = app_with(Ok(Painting::blank(2, 2)));
        let (tx, rx) = mpsc::channel();
        let a = HandFrame::both(HandSample::new(0.2, 0.5), HandSample::new(0.8, 0.5));
        let b = HandFrame { left: Some(HandSample::new(0.3, 0.5)), right: None };
        tx.send(HandMessage::Frame(a)).unwrap();
        tx.send(HandMessage::Frame(b)).unwrap();
        assert!(drain_hands(&rx, &mut app));
        assert_eq!(app.hands(), b);

        tx.send(HandMessage::Quit).unwrap();
        assert!(!drain_hands(&rx, &mut app));
        drop(tx);
        assert!(!drain_hands(&rx, &mut app));
    }

    #[test]
    fn default_app_renders_first_painting() {
        let cfg = AppConfig {
            seed: Some(1),
            latency: Duration::ZERO,
            painting_size: (64, 16),
            ..AppConfig::default()
        };
        let app = AppState::new(cfg);
        assert_eq!(app.painting().pixels.len(), 64 * 16);
        assert_eq!(app.config().styles.len(), 5);
    }
}
