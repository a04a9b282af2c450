use std::io::stdin;
use std::sync::Arc;
use std::thread;

use dumbwaiter_controller::config::Config;
use dumbwaiter_controller::controller::Controller;
use dumbwaiter_controller::debug;
use dumbwaiter_controller::sim::{self, SimulatedDevice};

fn main() -> std::io::Result<()> {
    env_logger::init();

    // READ CONFIGURATION
    let config = Config::get();

    // INITIALIZE SIMULATED DEVICE
    let device = Arc::new(SimulatedDevice::new());

    // INITIALIZE CONTROLLER
    let controller = Arc::new(
        Controller::new(config.settings.top_floor, device.clone())
            .with_poll_period(config.settings.poll_period),
    );
    let handle = controller.clone().start()?;

    // INITIALIZE THREAD FOR PLATFORM TRAVEL SIMULATION
    {
        let controller = controller.clone();
        let device = device.clone();
        thread::Builder::new()
            .name("travel".to_string())
            .spawn(move || sim::travel(controller, device))?;
    }

    // INITIALIZE THREAD FOR STATUS DISPLAY
    {
        let controller = controller.clone();
        thread::Builder::new()
            .name("status".to_string())
            .spawn(move || debug::main(controller))?;
    }

    // READ FLOOR REQUESTS FROM TERMINAL
    for line in stdin().lines() {
        let line = line?;
        let input = line.trim();
        if input == "q" {
            break;
        }
        match input.parse::<u8>() {
            Ok(floor) if floor >= 1 && floor <= controller.top_floor() => {
                controller.set_requested_floor(floor);
            },
            _ => {
                println!(
                    "floor {} is not between 1 and {}, skipping...",
                    input,
                    controller.top_floor(),
                );
            },
        }
    }

    println!("STOPPING PROGRAM...");
    handle.stop();
    Ok(())
}
