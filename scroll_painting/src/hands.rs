//! Hand sources — LeapMotion hardware or mouse/keyboard simulation.
//!
//! Every source delivers [`HandMessage`]s over an `mpsc` channel at its own
//! cadence. The app keeps only the latest frame, so the controller never
//! sees a queue, just the newest hands at the start of each tick.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use scroll_core::{HandFrame, HandSample};

/// Message from a hand source.
#[derive(Clone, Debug, PartialEq)]
pub enum HandMessage {
    /// Fresh positions for the logical left/right handles.
    Frame(HandFrame),
    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandMessage`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandMessage>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<H: HandSource>(source: H) -> Receiver<HandMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a LeapMotion controller.
///
/// Palm x in millimetres is mapped from `[-range_mm, range_mm]` onto
/// `[0, 1]`; palm height from 100–500 mm onto `[1, 0]`. LeapC labels each
/// hand by anatomy, and that label picks the handle, so the left hand
/// always drives the left shaft.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub range_mm: f32,
}

#[cfg(feature = "leap")]
impl Default for LeapHandSource {
    fn default() -> Self {
        LeapHandSource { range_mm: 200.0 }
    }
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<HandMessage>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("failed to create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            tracing::error!("failed to open LeapMotion device: {:?}", e);
            return;
        }
        tracing::info!("LeapMotion connected");

        let to_sample = |x: f32, y: f32| HandSample {
            x: (x + self.range_mm) / (2.0 * self.range_mm),
            y: 1.0 - (y - 100.0) / 400.0,
        };

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut out = HandFrame::empty();
                for hand in frame.hands() {
                    let p = hand.palm().position();
                    let sample = to_sample(p.x, p.y);
                    if hand.hand_type() == HandType::Left {
                        out.left = Some(sample);
                    } else {
                        out.right = Some(sample);
                    }
                }
                if tx.send(HandMessage::Frame(out)).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Pointer(PointerState),
    Quit,
}

/// Mouse and key state for one window frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Normalised pointer position within the window.
    pub x: f32,
    pub y: f32,
    /// Left button: drag the left shaft.
    pub left_down:  bool,
    /// Right button: drag the right shaft.
    pub right_down: bool,
    /// `C` held: both hands clasp at the centre, rolling the scroll shut.
    pub clasp:      bool,
}

impl PointerState {
    /// Released buttons mean "no hand" on that side, so a shaft stays where
    /// it was left.
    pub fn to_frame(&self) -> HandFrame {
        if self.clasp {
            let centre = HandSample::new(0.5, self.y);
            return HandFrame::both(centre, centre);
        }
        let here = HandSample::new(self.x, self.y);
        HandFrame {
            left:  self.left_down.then_some(here),
            right: self.right_down.then_some(here),
        }
    }
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<HandMessage>) {
        let mut last: Option<HandFrame> = None;
        for input in self.rx {
            let msg = match input {
                SimInput::Pointer(p) => {
                    let frame = p.to_frame();
                    // Only forward changes; an idle mouse is not a new sample.
                    if last == Some(frame) { continue; }
                    last = Some(frame);
                    HandMessage::Frame(frame)
                }
                SimInput::Quit => {
                    let _ = tx.send(HandMessage::Quit);
                    return;
                }
            };
            if tx.send(msg).is_err() { return; }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn buttons_select_handles() {
        let p = PointerState { x: 0.2, y: 0.4, left_down: true, ..Default::default() };
        let f = p.to_frame();
        assert_eq!(f.left, Some(HandSample::new(0.2, 0.4)));
        assert!(f.right.is_none());

        let p = PointerState { x: 0.8, right_down: true, ..Default::default() };
        assert_eq!(p.to_frame().right.map(|s| s.x), Some(0.8));
        assert!(PointerState::default().to_frame().is_empty());
    }

    #[test]
    fn clasp_brings_both_to_centre() {
        let p = PointerState { x: 0.9, y: 0.3, left_down: true, clasp: true, ..Default::default() };
        let f = p.to_frame();
        assert_eq!(f.left.map(|s| s.x), Some(0.5));
        assert_eq!(f.right.map(|s| s.x), Some(0.5));
    }

    #[test]
    fn sim_source_forwards_changes_and_quit() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_hand_source(SimHandSource { rx: sim_rx });

        let grab = PointerState { x: 0.1, left_down: true, ..Default::default() };
        sim_tx.send(SimInput::Pointer(grab)).unwrap();
        sim_tx.send(SimInput::Pointer(grab)).unwrap();
        sim_tx.send(SimInput::Pointer(PointerState::default())).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();

        let wait = Duration::from_secs(2);
        assert_eq!(rx.recv_timeout(wait).unwrap(), HandMessage::Frame(grab.to_frame()));
        assert_eq!(rx.recv_timeout(wait).unwrap(), HandMessage::Frame(HandFrame::empty()));
        assert_eq!(rx.recv_timeout(wait).unwrap(), HandMessage::Quit);
    }
}
