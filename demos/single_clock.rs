//! Drive a single clock in a Tokio runtime.
//! Shows how to register a tick listener and stop the driver.
//! Run for a few ticks, and then shutdown the clock.
#![warn(missing_docs)]
#![warn(unsafe_code)]

use log::{error, info};

use tokio::{runtime, sync::mpsc::Receiver, task};
use tokio_util::sync::CancellationToken;

use ticktock::{config::ClockConfig, driver::stop_clock, ClockDriver, Tick};

/// A single listener task that processes clock ticks.
async fn run_listener(mut rx: Receiver<Tick>, ticks_to_run_for: u32, stopper: CancellationToken) {
    info!("Running listener in main");
    let mut cnt = 0;

    while cnt < ticks_to_run_for {
        match rx.recv().await {
            Some((n, at)) => println!("got tick {} at {:?}", n, at),
            None => break,
        }
        cnt += 1;
    }

    rx.close();

    // Shutdown the clock
    stop_clock(&stopper);
}

/// A single driver task that waits for the clock and messages
/// listeners on every tick.
async fn run_clock(driver: ClockDriver) {
    info!("Starting the clock in main");

    match driver.start().await {
        Ok(n) => {
            println!("Finished task after {} ticks", n);
        }
        Err(e) => {
            error!("Error with task: {}", e);
        }
    }
}

fn main() {
    // Initialize logger
    if let Err(e) = env_logger::try_init() {
        panic!("couldn't initialize logger: {:?}", e);
    }

    // TICKTOCK_FRAMERATE=0.5 ticks every two seconds
    let config = match ClockConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let mut driver = ClockDriver::new(config.clock());
    let tick_listener = driver.register();
    let stopper = driver.stopper();

    let rt = match runtime::Builder::new_current_thread().enable_time().build() {
        Ok(rt) => rt,
        Err(e) => panic!("Couldn't create a Tokio runtime: {}", e),
    };

    rt.block_on(async {
        let local = task::LocalSet::new();
        local.spawn_local(run_listener(tick_listener, 3, stopper));
        local.spawn_local(run_clock(driver));
        local.await;
    });
}
