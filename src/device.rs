/// ----- DEVICE MODULE -----
/// The capability surface the controller depends on for raw signal I/O.
/// Any conforming implementation can be injected: the relay board on the
/// real installation, or the in-memory simulator in `sim`.

use std::error::Error;
use std::fmt;

/// Signal lines wired between the controller and the winding motor board.
/// The three winding lines are outputs, the rest are sensor inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    WindingUp,
    WindingDown,
    WindingStop,
    Floor1Requested,
    Floor2Requested,
    Floor3Requested,
    StopRequested,
    AtFloor,
}

impl Pin {
    pub fn as_string(self) -> String {
        match self {
            Pin::WindingUp => String::from("winding-up"),
            Pin::WindingDown => String::from("winding-down"),
            Pin::WindingStop => String::from("winding-stop"),
            Pin::Floor1Requested => String::from("floor-1-requested"),
            Pin::Floor2Requested => String::from("floor-2-requested"),
            Pin::Floor3Requested => String::from("floor-3-requested"),
            Pin::StopRequested => String::from("stop-requested"),
            Pin::AtFloor => String::from("at-floor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    pub pin: Pin,
    pub message: String,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device error on {}: {}", self.pin.as_string(), self.message)
    }
}

impl Error for DeviceError {}

pub trait SignalDevice: Send + Sync {
    /// Asserts the named signal line.
    fn send_signal(&self, pin: Pin) -> Result<(), DeviceError>;

    /// Reads the level of the named signal line, true when the signal is on.
    fn get_signal(&self, pin: Pin) -> Result<bool, DeviceError>;
}
