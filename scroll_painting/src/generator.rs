//! Painting generation worker thread.
//!
//! Requests go in over one channel, outcomes come back over another. The
//! render loop never blocks on a provider; it drains finished outcomes once
//! per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use scroll_core::{GenerationRequest, RequestId};
use tracing::{debug, info, warn};

use crate::painting::{GenerationError, Painting, PaintingProvider};

// ════════════════════════════════════════════════════════════════════════════
// Commands and outcomes
// ════════════════════════════════════════════════════════════════════════════

pub enum GeneratorCommand {
    /// Paint one picture for this request.
    Generate(GenerationRequest),
    /// Terminate the thread.
    Quit,
}

/// The provider's answer to one request.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub id:     RequestId,
    pub style:  String,
    pub result: Result<Painting, GenerationError>,
}

// ════════════════════════════════════════════════════════════════════════════
// Generator — handle to the worker thread
// ════════════════════════════════════════════════════════════════════════════

pub struct Generator {
    cmd_tx:     Sender<GeneratorCommand>,
    outcome_rx: Receiver<GenerationOutcome>,
}

impl Generator {
    /// Spawn the worker; `provider` moves onto it.
    pub fn spawn<P: PaintingProvider>(provider: P) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<GeneratorCommand>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<GenerationOutcome>();

        thread::spawn(move || generator_thread(provider, cmd_rx, outcome_tx));

        Generator { cmd_tx, outcome_rx }
    }

    /// Queue a request. Fails only if the worker has gone away.
    pub fn submit(&self, request: GenerationRequest) -> Result<(), GenerationError> {
        self.cmd_tx
            .send(GeneratorCommand::Generate(request))
            .map_err(|_| GenerationError::Disconnected)
    }

    pub fn quit(&self) {
        let _ = self.cmd_tx.send(GeneratorCommand::Quit);
    }

    /// Drain any finished outcomes (non-blocking).
    pub fn drain_outcomes(&self) -> Vec<GenerationOutcome> {
        let mut out = Vec::new();
        while let Ok(o) = self.outcome_rx.try_recv() { out.push(o); }
        out
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.quit();
    }
}

fn generator_thread<P: PaintingProvider>(
    mut provider: P,
    cmd_rx:       Receiver<GeneratorCommand>,
    outcome_tx:   Sender<GenerationOutcome>,
) {
    for cmd in cmd_rx {
        let request = match cmd {
            GeneratorCommand::Generate(r) => r,
            GeneratorCommand::Quit => break,
        };

        info!(id = %request.id, style = %request.style, "painting");
        let result = provider.paint(&request.style);
        match &result {
            Ok(p)  => debug!(id = %request.id, width = p.width, height = p.height, "painting finished"),
            Err(e) => warn!(id = %request.id, error = %e, "painting failed"),
        }

        let outcome = GenerationOutcome { id: request.id, style: request.style, result };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
    debug!("generator thread exiting");
}
