/// ----- CONTROLLER MODULE -----
/// The decision loop for the dumbwaiter platform. Once per tick it compares
/// the requested floor against the last seen floor and emits at most one
/// winding signal to the device:
/// - if the platform is stopped and another floor is requested, start it
///   moving in the requested direction
/// - if the platform is moving away from the requested floor, stop it and
///   let the next tick start it the other way (the winding motor must never
///   be reversed in a single tick)
/// - if the platform is moving and the requested floor is the last seen
///   floor, stop it there

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::{error, info};
use parking_lot::Mutex;

use crate::config::DEFAULT_POLL_PERIOD;
use crate::device::{DeviceError, SignalDevice};
use crate::direction::Direction;
use crate::timing::{Sleeper, TimingSource};

/// Snapshot of the controller fields. Each field is read under its own
/// lock, so a snapshot taken while the loop is mid-tick may mix values
/// from before and after that tick.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Status {
    pub direction: Direction,
    pub last_seen_floor: u8,
    pub requested_floor: u8,
}

pub struct Controller {
    last_seen_floor: Mutex<u8>,
    requested_floor: Mutex<u8>,
    direction: Mutex<Direction>,
    top_floor: u8,
    poll_period: Duration,
    device: Arc<dyn SignalDevice>,
    timing: Box<dyn TimingSource>,
}

impl Controller {
    /// Floors are numbered from 1 up to and including `top_floor`. The
    /// platform is assumed stopped at the bottom floor until the sensor
    /// collaborator reports otherwise.
    pub fn new(top_floor: u8, device: Arc<dyn SignalDevice>) -> Self {
        Controller {
            last_seen_floor: Mutex::new(1),
            requested_floor: Mutex::new(1),
            direction: Mutex::new(Direction::Stop),
            top_floor,
            poll_period: DEFAULT_POLL_PERIOD,
            device,
            timing: Box::new(Sleeper),
        }
    }

    pub fn with_device(mut self, device: Arc<dyn SignalDevice>) -> Self {
        self.device = device;
        self
    }

    pub fn with_timing_source(mut self, timing: Box<dyn TimingSource>) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_poll_period(mut self, poll_period: Duration) -> Self {
        self.poll_period = poll_period;
        self
    }

    /// Spawns the processing loop on its own thread. Stopping the returned
    /// handle ends the loop; dropping it has the same effect on the next
    /// tick, so the thread can never outlive its owner.
    pub fn start(self: Arc<Self>) -> io::Result<ControllerHandle> {
        let (stop_tx, stop_rx) = unbounded();
        let thread = thread::Builder::new()
            .name("controller".to_string())
            .spawn(move || self.processing_loop(stop_rx))?;
        Ok(ControllerHandle { stop_tx, thread })
    }

    fn processing_loop(&self, stop_rx: Receiver<()>) {
        info!("starting controller processing loop");
        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => (),
            }
            self.tick();
            self.timing.wait_next_tick(self.poll_period);
        }
        info!("controller processing loop stopped");
    }

    /// One evaluate-and-act cycle. A device error ends the tick with no
    /// state change; the unchanged floor fields make the next tick retry
    /// the same decision.
    pub fn tick(&self) {
        if let Err(e) = self.evaluate() {
            error!("{}, retrying on next tick", e);
        }
    }

    fn evaluate(&self) -> Result<(), DeviceError> {
        let requested = self.requested_floor();
        let last_seen = self.last_seen_floor();
        if requested > last_seen {
            match self.direction() {
                Direction::Stop => self.send_winding(Direction::Up)?,
                Direction::Down => self.send_winding(Direction::Stop)?,
                Direction::Up => (),
            }
        } else if requested < last_seen {
            match self.direction() {
                Direction::Stop => self.send_winding(Direction::Down)?,
                Direction::Up => self.send_winding(Direction::Stop)?,
                Direction::Down => (),
            }
        } else if self.direction() != Direction::Stop {
            self.send_winding(Direction::Stop)?;
        }
        Ok(())
    }

    fn send_winding(&self, direction: Direction) -> Result<(), DeviceError> {
        let pin = direction.winding_pin();
        info!("controller sending {}", pin.as_string());
        self.device.send_signal(pin)?;
        self.set_direction(direction);
        Ok(())
    }

    pub fn last_seen_floor(&self) -> u8 {
        *self.last_seen_floor.lock()
    }

    pub fn set_last_seen_floor(&self, floor: u8) {
        info!("controller setting last seen floor to {}", floor);
        *self.last_seen_floor.lock() = floor;
    }

    pub fn requested_floor(&self) -> u8 {
        *self.requested_floor.lock()
    }

    pub fn set_requested_floor(&self, floor: u8) {
        info!("controller setting requested floor to {}", floor);
        *self.requested_floor.lock() = floor;
    }

    pub fn direction(&self) -> Direction {
        *self.direction.lock()
    }

    /// The loop is the only caller outside of tests, where the travel
    /// direction may be pre-set as ground truth.
    pub fn set_direction(&self, direction: Direction) {
        *self.direction.lock() = direction;
    }

    pub fn top_floor(&self) -> u8 {
        self.top_floor
    }

    pub fn status(&self) -> Status {
        Status {
            direction: self.direction(),
            last_seen_floor: self.last_seen_floor(),
            requested_floor: self.requested_floor(),
        }
    }
}

/// Stop side of a running controller loop.
pub struct ControllerHandle {
    stop_tx: Sender<()>,
    thread: thread::JoinHandle<()>,
}

impl ControllerHandle {
    /// Signals the loop to exit and waits for the thread to finish. With
    /// the wall-clock timing source the loop exits at most one poll period
    /// late.
    pub fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.thread.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Pin;
    use crate::sim::SimulatedDevice;

    fn controller_at(
        last_seen: u8,
        requested: u8,
        direction: Direction,
    ) -> (Arc<SimulatedDevice>, Controller) {
        let device = Arc::new(SimulatedDevice::new());
        let controller = Controller::new(3, device.clone());
        controller.set_last_seen_floor(last_seen);
        controller.set_requested_floor(requested);
        controller.set_direction(direction);
        (device, controller)
    }

    #[test]
    fn starts_up_when_stopped_below_requested() {
        let (device, controller) = controller_at(2, 3, Direction::Stop);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingUp]);
        assert_eq!(controller.direction(), Direction::Up);
    }

    #[test]
    fn starts_down_when_stopped_above_requested() {
        let (device, controller) = controller_at(2, 1, Direction::Stop);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingDown]);
        assert_eq!(controller.direction(), Direction::Down);
    }

    #[test]
    fn keeps_moving_up_toward_requested() {
        let (device, controller) = controller_at(2, 3, Direction::Up);
        controller.tick();
        assert_eq!(device.emissions(), Vec::new());
        assert_eq!(controller.direction(), Direction::Up);
    }

    #[test]
    fn keeps_moving_down_toward_requested() {
        let (device, controller) = controller_at(2, 1, Direction::Down);
        controller.tick();
        assert_eq!(device.emissions(), Vec::new());
        assert_eq!(controller.direction(), Direction::Down);
    }

    #[test]
    fn stops_before_reversing_upward() {
        let (device, controller) = controller_at(2, 3, Direction::Down);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingStop]);
        assert_eq!(controller.direction(), Direction::Stop);
    }

    #[test]
    fn stops_before_reversing_downward() {
        let (device, controller) = controller_at(2, 1, Direction::Up);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingStop]);
        assert_eq!(controller.direction(), Direction::Stop);
    }

    #[test]
    fn stops_on_arrival_at_requested_floor() {
        for direction in [Direction::Up, Direction::Down] {
            let (device, controller) = controller_at(2, 2, direction);
            controller.tick();
            assert_eq!(device.emissions(), vec![Pin::WindingStop]);
            assert_eq!(controller.direction(), Direction::Stop);
        }
    }

    #[test]
    fn idles_at_requested_floor() {
        let (device, controller) = controller_at(2, 2, Direction::Stop);
        for _ in 0..3 {
            controller.tick();
        }
        assert_eq!(device.emissions(), Vec::new());
        assert_eq!(controller.direction(), Direction::Stop);
    }

    #[test]
    fn reversal_takes_two_ticks() {
        let (device, controller) = controller_at(2, 1, Direction::Up);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingStop]);
        assert_eq!(controller.direction(), Direction::Stop);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingStop, Pin::WindingDown]);
        assert_eq!(controller.direction(), Direction::Down);
    }

    #[test]
    fn device_failure_leaves_state_unchanged_and_retries() {
        let (device, controller) = controller_at(2, 3, Direction::Stop);
        device.set_failing(true);
        controller.tick();
        assert_eq!(device.emissions(), Vec::new());
        assert_eq!(controller.direction(), Direction::Stop);

        device.set_failing(false);
        controller.tick();
        assert_eq!(device.emissions(), vec![Pin::WindingUp]);
        assert_eq!(controller.direction(), Direction::Up);
    }
}
