/// ----- SIMULATOR MODULE -----
/// In-memory stand-ins for the relay board, used by the demo binary and
/// the tests. The simulated device latches winding levels so the travel
/// loop can read back which way the platform is being driven.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::controller::Controller;
use crate::device::{DeviceError, Pin, SignalDevice};

/// How long the simulated platform takes to travel one floor.
pub const TRAVEL_PERIOD: Duration = Duration::from_millis(1500);

/// Conforming [`SignalDevice`] with an inspectable emission log, per-pin
/// levels and a failure switch for injecting device errors.
#[derive(Default)]
pub struct SimulatedDevice {
    emissions: Mutex<Vec<Pin>>,
    levels: Mutex<HashMap<Pin, bool>>,
    failing: AtomicBool,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every successfully emitted signal, oldest first.
    pub fn emissions(&self) -> Vec<Pin> {
        self.emissions.lock().clone()
    }

    /// Drives a sensor line from a test harness.
    pub fn set_level(&self, pin: Pin, on: bool) {
        self.levels.lock().insert(pin, on);
    }

    /// While failing, every send and read returns a device error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_failing(&self, pin: Pin) -> Result<(), DeviceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeviceError {
                pin,
                message: String::from("simulated device failure"),
            });
        }
        Ok(())
    }
}

impl SignalDevice for SimulatedDevice {
    fn send_signal(&self, pin: Pin) -> Result<(), DeviceError> {
        self.check_failing(pin)?;
        {
            let mut levels = self.levels.lock();
            match pin {
                // a winding signal engages its own line and drops the others
                Pin::WindingUp | Pin::WindingDown => {
                    levels.insert(Pin::WindingUp, pin == Pin::WindingUp);
                    levels.insert(Pin::WindingDown, pin == Pin::WindingDown);
                    levels.insert(Pin::WindingStop, false);
                }
                Pin::WindingStop => {
                    levels.insert(Pin::WindingUp, false);
                    levels.insert(Pin::WindingDown, false);
                    levels.insert(Pin::WindingStop, true);
                }
                _ => {
                    levels.insert(pin, true);
                }
            }
        }
        self.emissions.lock().push(pin);
        Ok(())
    }

    fn get_signal(&self, pin: Pin) -> Result<bool, DeviceError> {
        self.check_failing(pin)?;
        Ok(*self.levels.lock().get(&pin).unwrap_or(&false))
    }
}

/// Platform travel loop for the demo binary: while an up or down winding
/// is engaged the platform drifts one floor per travel period, clamped to
/// the shaft.
pub fn travel(controller: Arc<Controller>, device: Arc<dyn SignalDevice>) {
    loop {
        thread::sleep(TRAVEL_PERIOD);
        let last_seen = controller.last_seen_floor();
        let moved = match (
            device.get_signal(Pin::WindingUp),
            device.get_signal(Pin::WindingDown),
        ) {
            (Ok(true), _) if last_seen < controller.top_floor() => Some(last_seen + 1),
            (_, Ok(true)) if last_seen > 1 => Some(last_seen - 1),
            _ => None,
        };
        if let Some(floor) = moved {
            controller.set_last_seen_floor(floor);
        }
    }
}
