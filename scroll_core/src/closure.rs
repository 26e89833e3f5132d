//! Open/closed edges from the live shaft separation.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureState {
    Open,
    Closed,
}

/// Emitted once per threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureEvent {
    /// Separation dropped below the threshold.
    Closed,
    /// Separation rose back to or above the threshold.
    Opened,
}

/// Two-state machine over the live shaft separation.
///
/// Starts `Open` even though the shafts begin touching, so the first
/// observation of a shut scroll reports `Closed`.
#[derive(Debug, Clone)]
pub struct ClosureDetector {
    threshold:            f32,
    state:                ClosureState,
    tick:                 u64,
    last_transition_tick: Option<u64>,
}

impl ClosureDetector {
    pub fn new(threshold: f32) -> Self {
        ClosureDetector {
            threshold,
            state: ClosureState::Open,
            tick: 0,
            last_transition_tick: None,
        }
    }

    /// Feed one tick's separation; returns an event only on a state change.
    pub fn observe(&mut self, separation: f32) -> Option<ClosureEvent> {
        self.tick += 1;
        let event = match self.state {
            ClosureState::Open if separation < self.threshold => {
                self.state = ClosureState::Closed;
                ClosureEvent::Closed
            }
            ClosureState::Closed if separation >= self.threshold => {
                self.state = ClosureState::Open;
                ClosureEvent::Opened
            }
            _ => return None,
        };
        self.last_transition_tick = Some(self.tick);
        debug!(?event, separation, tick = self.tick, "scroll closure changed");
        Some(event)
    }

    pub fn state(&self) -> ClosureState {
        self.state
    }

    /// Tick number (1-based) of the most recent transition.
    pub fn last_transition_tick(&self) -> Option<u64> {
        self.last_transition_tick
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_open_and_first_closed_tick_fires() {
        let mut d = ClosureDetector::new(0.95);
        assert_eq!(d.state(), ClosureState::Open);
        assert_eq!(d.last_transition_tick(), None);
        assert_eq!(d.observe(0.9), Some(ClosureEvent::Closed));
        assert_eq!(d.last_transition_tick(), Some(1));
    }

    #[test]
    fn held_closed_fires_once() {
        let mut d = ClosureDetector::new(0.95);
        d.observe(5.0);
        let mut events = Vec::new();
        for _ in 0..30 { events.extend(d.observe(0.9)); }
        for _ in 0..30 { events.extend(d.observe(4.0)); }
        assert_eq!(events, vec![ClosureEvent::Closed, ClosureEvent::Opened]);
    }

    #[test]
    fn threshold_is_exclusive_for_closed() {
        let mut d = ClosureDetector::new(0.95);
        assert_eq!(d.observe(0.95), None);
        assert_eq!(d.observe(0.949), Some(ClosureEvent::Closed));
        assert_eq!(d.observe(0.95), Some(ClosureEvent::Opened));
    }

    #[test]
    fn transition_tick_recorded() {
        let mut d = ClosureDetector::new(0.95);
        d.observe(3.0);
        d.observe(3.0);
        d.observe(0.9);
        assert_eq!(d.last_transition_tick(), Some(3));
        d.observe(0.9);
        assert_eq!(d.last_transition_tick(), Some(3));
        assert_eq!(d.ticks(), 4);
    }
}
