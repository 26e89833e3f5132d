//! One call per rendered frame drives the whole scroll.
//!
//! `ScrollController` owns the resolver, the smoother, the closure detector
//! and the engagement timer, and runs them in data-dependency order:
//!
//! 1. fire the engagement countdown if it has elapsed
//! 2. resolve hand targets (pinned shut while a painting is on its way)
//! 3. smooth shaft positions and accumulate rotation
//! 4. detect open/closed edges and feed them to the timer
//! 5. map the texture window for the renderer
//!
//! The countdown is polled first, so the tick that issues a request already
//! holds the shafts shut, and an elapsed deadline wins over hands opening
//! on that same tick.

use std::time::Instant;

use crate::closure::{ClosureDetector, ClosureEvent, ClosureState};
use crate::config::ScrollConfig;
use crate::engagement::{EngagementTimer, GenerationRequest, RequestId, Resolution};
use crate::hand::HandFrame;
use crate::resolver::TargetResolver;
use crate::smoother::{KinematicSmoother, ShaftPositions};
use crate::texture::TextureWindow;

/// Everything the renderer and the app need from one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub positions:      ShaftPositions,
    pub left_rotation:  f32,
    pub right_rotation: f32,
    pub window:         TextureWindow,
    pub closure_state:  ClosureState,
    pub closure_event:  Option<ClosureEvent>,
    /// Set on the one tick a countdown completes; hand it to the provider.
    pub request:        Option<GenerationRequest>,
}

impl TickReport {
    pub fn separation(&self) -> f32 {
        self.positions.separation()
    }
}

pub struct ScrollController {
    config:   ScrollConfig,
    resolver: TargetResolver,
    smoother: KinematicSmoother,
    detector: ClosureDetector,
    timer:    EngagementTimer,
}

impl ScrollController {
    pub fn new(config: ScrollConfig) -> Self {
        let timer = EngagementTimer::new(&config);
        Self::with_timer(config, timer)
    }

    pub fn with_seed(config: ScrollConfig, seed: u64) -> Self {
        let timer = EngagementTimer::with_seed(&config, seed);
        Self::with_timer(config, timer)
    }

    fn with_timer(config: ScrollConfig, timer: EngagementTimer) -> Self {
        ScrollController {
            resolver: TargetResolver::new(&config),
            smoother: KinematicSmoother::new(&config),
            detector: ClosureDetector::new(config.closed_threshold),
            timer,
            config,
        }
    }

    /// Advance one frame with the latest hand frame.
    pub fn tick(&mut self, frame: &HandFrame, now: Instant) -> TickReport {
        let request = self.timer.poll(now);
        self.resolver.resolve(frame, self.timer.holds_closed(now));
        let positions = self.smoother.step(self.resolver.targets());

        let closure_event = self.detector.observe(positions.separation());
        if let Some(event) = closure_event {
            self.timer.on_closure(event, now);
        }

        TickReport {
            positions,
            left_rotation:  self.smoother.left().rotation,
            right_rotation: self.smoother.right().rotation,
            window:         TextureWindow::map(
                positions.left_x, positions.right_x, self.config.world_width,
            ),
            closure_state:  self.detector.state(),
            closure_event,
            request,
        }
    }

    /// Report the provider's answer for request `id`.
    pub fn resolve_generation(&mut self, id: RequestId, resolution: Resolution, now: Instant) -> bool {
        self.timer.resolve(id, resolution, now)
    }

    pub fn config(&self) -> &ScrollConfig { &self.config }
    pub fn closure_state(&self) -> ClosureState { self.detector.state() }
    pub fn is_generating(&self) -> bool { self.timer.in_flight() }
    pub fn targets(&self) -> (f32, f32) { self.resolver.targets() }
    pub fn positions(&self) -> ShaftPositions { self.smoother.positions() }

    /// Engagement countdown progress (0.0–1.0), if one is running.
    pub fn engagement_progress(&self, now: Instant) -> Option<f32> {
        self.timer.countdown_progress(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::HandSample;
    use proptest::prelude::*;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller() -> ScrollController {
        ScrollController::with_seed(ScrollConfig::default(), 1)
    }

    /// Hands placed so their targets land at world `l` / `r`.
    fn hands_at(l: f32, r: f32) -> HandFrame {
        HandFrame::both(
            HandSample::new((l + 10.0) / 20.0, 0.5),
            HandSample::new((r + 10.0) / 20.0, 0.5),
        )
    }

    /// Tick `n` frames, collecting requests and closure events.
    fn run(
        c: &mut ScrollController,
        frame: &HandFrame,
        start: Instant,
        n: u32,
    ) -> (Instant, Vec<GenerationRequest>, Vec<ClosureEvent>) {
        let mut now = start;
        let mut reqs = Vec::new();
        let mut events = Vec::new();
        for _ in 0..n {
            now += FRAME;
            let r = c.tick(frame, now);
            reqs.extend(r.request);
            events.extend(r.closure_event);
        }
        (now, reqs, events)
    }

    #[test]
    fn no_hands_at_start_closes_on_first_tick_and_arms() {
        let t0 = Instant::now();
        let mut c = controller();
        let r = c.tick(&HandFrame::empty(), t0);
        assert_eq!(r.positions, ShaftPositions { left_x: -0.45, right_x: 0.45 });
        assert_eq!(r.closure_event, Some(ClosureEvent::Closed));
        assert_eq!(r.closure_state, ClosureState::Closed);
        assert!(c.engagement_progress(t0).is_some());

        // Nobody ever opens it, so the session's first painting is requested.
        let r = c.tick(&HandFrame::empty(), t0 + Duration::from_millis(5000));
        assert!(r.request.is_some());
    }

    #[test]
    fn reference_texture_window() {
        let t0 = Instant::now();
        let mut c = controller();
        run(&mut c, &hands_at(-8.0, 8.0), t0, 300);
        let r = c.tick(&hands_at(-8.0, 8.0), t0 + Duration::from_secs(10));
        assert!((r.window.offset - 0.1).abs() < 1e-3);
        assert!((r.window.repeat - 0.8).abs() < 1e-3);
    }

    #[test]
    fn opening_within_engagement_prevents_request() {
        let t0 = Instant::now();
        let mut c = controller();
        c.tick(&HandFrame::empty(), t0);
        // Open well before five seconds are up.
        let (now, reqs, events) = run(&mut c, &hands_at(-6.0, 6.0), t0, 60);
        assert!(reqs.is_empty());
        assert_eq!(events, vec![ClosureEvent::Opened]);
        let (_, reqs, _) = run(&mut c, &hands_at(-6.0, 6.0), now, 600);
        assert!(reqs.is_empty());
        assert!(!c.is_generating());
    }

    #[test]
    fn held_closed_fires_exactly_once_and_freezes_shafts() {
        let t0 = Instant::now();
        let mut c = controller();
        let (now, reqs, events) = run(&mut c, &HandFrame::empty(), t0, 400);
        assert_eq!(events, vec![ClosureEvent::Closed]);
        assert_eq!(reqs.len(), 1);
        assert!(c.is_generating());
        assert!((c.positions().separation() - 0.9).abs() < 1e-5);

        // Hands pull the scroll open while the painting is being made.
        let (_, reqs, events) = run(&mut c, &hands_at(-9.0, 9.0), now, 200);
        assert!(reqs.is_empty());
        assert!(events.is_empty());
        assert!((c.positions().separation() - 0.9).abs() < 1e-5);
        assert_eq!(c.targets(), (-0.45, 0.45));
    }

    #[test]
    fn success_releases_shafts_to_hands() {
        let t0 = Instant::now();
        let mut c = controller();
        let (now, reqs, _) = run(&mut c, &HandFrame::empty(), t0, 400);
        let id = reqs[0].id;
        assert!(c.resolve_generation(id, Resolution::Success, now));
        assert!(!c.is_generating());

        // Still pinned during the reveal pause.
        let (now, _, _) = run(&mut c, &hands_at(-7.0, 7.0), now, 10);
        assert_eq!(c.targets(), (-0.45, 0.45));

        let (_, reqs, events) = run(&mut c, &hands_at(-7.0, 7.0), now, 400);
        assert!(reqs.is_empty());
        assert_eq!(events, vec![ClosureEvent::Opened]);
        assert!((c.positions().separation() - 14.0).abs() < 1e-2);
    }

    #[test]
    fn hands_opening_on_deadline_tick_stay_pinned() {
        let t0 = Instant::now();
        let mut c = controller();
        c.tick(&HandFrame::empty(), t0);
        let r = c.tick(&hands_at(-9.0, 9.0), t0 + Duration::from_millis(5000));
        assert!(r.request.is_some());
        assert_eq!(r.closure_event, None);
        assert_eq!(r.closure_state, ClosureState::Closed);
        assert_eq!(c.targets(), (-0.45, 0.45));
        assert!((r.separation() - 0.9).abs() < 1e-5);

        let start = t0 + Duration::from_millis(5000);
        let (_, reqs, events) = run(&mut c, &hands_at(-9.0, 9.0), start, 100);
        assert!(reqs.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn zero_success_hold_frees_shafts_on_next_tick() {
        let cfg = ScrollConfig { success_hold_ms: 0, ..ScrollConfig::default() };
        let mut c = ScrollController::with_seed(cfg, 1);
        let t0 = Instant::now();
        let (now, reqs, _) = run(&mut c, &HandFrame::empty(), t0, 400);
        assert!(c.resolve_generation(reqs[0].id, Resolution::Success, now));
        assert!(!c.is_generating());

        let r = c.tick(&hands_at(-7.0, 7.0), now + FRAME);
        let (l, r_target) = c.targets();
        assert!((l + 7.0).abs() < 1e-4 && (r_target - 7.0).abs() < 1e-4);
        assert!(r.separation() > 0.9);
    }

    #[test]
    fn failure_releases_immediately_without_rearming() {
        let t0 = Instant::now();
        let mut c = controller();
        let (now, reqs, _) = run(&mut c, &HandFrame::empty(), t0, 400);
        c.resolve_generation(reqs[0].id, Resolution::Failure, now);
        // Still closed, but no fresh edge: no new countdown.
        let (now, reqs, events) = run(&mut c, &HandFrame::empty(), now, 400);
        assert!(reqs.is_empty());
        assert!(events.is_empty());
        assert!(c.engagement_progress(now).is_none());

        let (_, _, events) = run(&mut c, &hands_at(-3.0, 3.0), now, 5);
        assert_eq!(events, vec![ClosureEvent::Opened]);
    }

    #[test]
    fn reclose_after_painting_triggers_another() {
        let t0 = Instant::now();
        let mut c = controller();
        let (now, reqs, _) = run(&mut c, &HandFrame::empty(), t0, 400);
        c.resolve_generation(reqs[0].id, Resolution::Success, now);
        let (now, _, _) = run(&mut c, &HandFrame::empty(), now, 120);
        let (now, _, _) = run(&mut c, &hands_at(-5.0, 5.0), now, 100);
        let (_, reqs, events) = run(&mut c, &hands_at(0.0, 0.0), now, 500);
        assert_eq!(events.first(), Some(&ClosureEvent::Closed));
        assert_eq!(reqs.len(), 1);
    }

    proptest! {
        #[test]
        fn separation_never_below_closed_width(
            frames in proptest::collection::vec(
                (proptest::option::of(-0.5f32..1.5), proptest::option::of(-0.5f32..1.5)),
                1..200,
            )
        ) {
            let t0 = Instant::now();
            let mut c = controller();
            for (i, (l, r)) in frames.into_iter().enumerate() {
                let frame = HandFrame {
                    left:  l.map(|x| HandSample::new(x, 0.5)),
                    right: r.map(|x| HandSample::new(x, 0.5)),
                };
                let report = c.tick(&frame, t0 + FRAME * i as u32);
                prop_assert!(report.separation() >= 0.9 - 1e-6);
                prop_assert!(report.window.offset >= 0.0 && report.window.offset <= 1.0);
                prop_assert!(report.window.offset + report.window.repeat <= 1.0 + 1e-5);
            }
        }
    }
}
