/// ----- TIMING MODULE -----
/// Gate between two iterations of the processing loop. The loop only ever
/// blocks on `wait_next_tick`, so swapping the timing source is enough to
/// drive it from a wall clock in production and step by step under test.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};

pub trait TimingSource: Send + Sync {
    fn wait_next_tick(&self, nominal_period: Duration);
}

/// Wall-clock policy: block for the nominal period.
pub struct Sleeper;

impl TimingSource for Sleeper {
    fn wait_next_tick(&self, nominal_period: Duration) {
        thread::sleep(nominal_period);
    }
}

/// Externally driven policy: block until the driver releases one tick.
/// Each wait consumes exactly one release. A dropped driver releases every
/// wait, so the loop can still observe its stop channel.
pub struct StepTicker {
    release_rx: Receiver<()>,
}

impl TimingSource for StepTicker {
    fn wait_next_tick(&self, _nominal_period: Duration) {
        let _ = self.release_rx.recv();
    }
}

/// Driver side of a [`StepTicker`].
pub struct StepDriver {
    release_tx: Sender<()>,
}

impl StepDriver {
    /// Queue one release. A release sent before the loop waits is held
    /// until consumed; a second release blocks the caller until the first
    /// one has been taken, so ticks can never be double-released.
    pub fn step(&self) {
        let _ = self.release_tx.send(());
    }
}

pub fn step_ticker() -> (StepDriver, StepTicker) {
    let (release_tx, release_rx) = bounded(1);
    (StepDriver { release_tx }, StepTicker { release_rx })
}
