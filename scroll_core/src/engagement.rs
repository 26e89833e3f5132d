//! Debounces a closed scroll into a single painting request.
//!
//! ```text
//!            Closed edge                 deadline reached
//!   Idle ───────────────▶ Countdown ─────────────────────▶ InFlight
//!    ▲                       │ Opened edge                    │ resolve()
//!    │◀──────────────────────┘                                │
//!    │◀────────── Failure ────────────────────────────────────┤
//!    │◀── hold elapsed ── Settling ◀──────── Success ─────────┘
//! ```
//!
//! The timer is the only writer of the countdown and the in-flight flag.
//! Everything else reads them through [`EngagementTimer::holds_closed`] and
//! friends, once per tick, on the same thread.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::closure::ClosureEvent;
use crate::config::ScrollConfig;

// ════════════════════════════════════════════════════════════════════════════
// Request types
// ════════════════════════════════════════════════════════════════════════════

/// Identifies one generation request so late or duplicate results can be
/// told apart from the one the timer is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 { self.0 }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ask the image provider for a new painting in `style`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub id:        RequestId,
    pub style:     String,
    pub issued_at: Instant,
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Success,
    Failure,
}

// ════════════════════════════════════════════════════════════════════════════
// Countdown — a cancellable deferred task
// ════════════════════════════════════════════════════════════════════════════

/// A scheduled request. Cancelling drops it; there is no callback left
/// behind that could still fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    token:      u64,
    started_at: Instant,
    deadline:   Instant,
}

impl Countdown {
    pub fn token(&self) -> u64 { self.token }
    pub fn deadline(&self) -> Instant { self.deadline }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Fraction of the countdown elapsed, 0.0–1.0.
    pub fn progress(&self, now: Instant) -> f32 {
        let total = self.deadline.saturating_duration_since(self.started_at);
        if total.is_zero() {
            return 1.0;
        }
        let done = now.saturating_duration_since(self.started_at);
        (done.as_secs_f32() / total.as_secs_f32()).min(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    InFlight(RequestId),
    /// A painting just arrived; shafts stay shut until `until`.
    Settling { until: Instant },
}

// ════════════════════════════════════════════════════════════════════════════
// EngagementTimer
// ════════════════════════════════════════════════════════════════════════════

pub struct EngagementTimer {
    duration:     Duration,
    success_hold: Duration,
    styles:       Vec<String>,
    rng:          StdRng,
    countdown:    Option<Countdown>,
    phase:        Phase,
    next_token:   u64,
    next_request: u64,
}

impl EngagementTimer {
    pub fn new(config: &ScrollConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic style choice, for tests and reproducible sessions.
    pub fn with_seed(config: &ScrollConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &ScrollConfig, rng: StdRng) -> Self {
        EngagementTimer {
            duration:     config.engagement_duration(),
            success_hold: config.success_hold(),
            styles:       config.styles.clone(),
            rng,
            countdown:    None,
            phase:        Phase::Idle,
            next_token:   0,
            next_request: 1,
        }
    }

    /// React to a closure edge.
    pub fn on_closure(&mut self, event: ClosureEvent, now: Instant) {
        match event {
            ClosureEvent::Closed => {
                if self.holds_closed(now) {
                    debug!("scroll closed while painting; countdown not started");
                } else if self.countdown.is_none() {
                    self.next_token += 1;
                    self.countdown = Some(Countdown {
                        token:      self.next_token,
                        started_at: now,
                        deadline:   now + self.duration,
                    });
                    debug!(token = self.next_token, ms = self.duration.as_millis() as u64,
                           "engagement countdown started");
                }
            }
            ClosureEvent::Opened => {
                if let Some(c) = self.countdown.take() {
                    debug!(token = c.token, "engagement countdown cancelled");
                }
            }
        }
    }

    /// Fire the countdown if its deadline has passed. Also ends a finished
    /// post-success hold.
    pub fn poll(&mut self, now: Instant) -> Option<GenerationRequest> {
        if let Phase::Settling { until } = self.phase {
            if now >= until {
                self.phase = Phase::Idle;
            }
        }

        let due = self.countdown.map_or(false, |c| c.is_due(now));
        if !due {
            return None;
        }
        self.countdown = None;
        if self.in_flight() {
            return None;
        }

        let id = RequestId(self.next_request);
        self.next_request += 1;
        let style = self.styles.choose(&mut self.rng).cloned().unwrap_or_default();
        self.phase = Phase::InFlight(id);
        info!(%id, %style, "painting requested");

        Some(GenerationRequest { id, style, issued_at: now })
    }

    /// Record the outcome of request `id`. Returns `false` (and changes
    /// nothing) if `id` is not the request currently in flight.
    pub fn resolve(&mut self, id: RequestId, resolution: Resolution, now: Instant) -> bool {
        match self.phase {
            Phase::InFlight(current) if current == id => {
                self.phase = match resolution {
                    Resolution::Success if !self.success_hold.is_zero() => {
                        Phase::Settling { until: now + self.success_hold }
                    }
                    _ => Phase::Idle,
                };
                info!(%id, ?resolution, "painting request resolved");
                true
            }
            _ => {
                warn!(%id, "ignoring result for a request that is not in flight");
                false
            }
        }
    }

    /// A request has been issued and not yet resolved.
    pub fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::InFlight(_))
    }

    /// The shafts should be pinned shut: painting in flight, or a fresh
    /// painting still settling.
    pub fn holds_closed(&self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => false,
            Phase::InFlight(_) => true,
            Phase::Settling { until } => now < until,
        }
    }

    pub fn pending(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn countdown_progress(&self, now: Instant) -> Option<f32> {
        self.countdown.map(|c| c.progress(now))
    }
}
