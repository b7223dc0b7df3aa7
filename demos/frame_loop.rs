//! A frame loop at a fixed framerate.
//!
//! Ticks at 30 frames per second for five seconds, printing the measured
//! framerate once a second and a heartbeat from an interval timer.
use std::time::{Duration, Instant};

use log::info;

use ticktock::{Clock, FrameCounter, Timer};

fn main() {
    env_logger::init();

    let clock = Clock::framerate(30.0);
    let mut counter = FrameCounter::new();
    let mut heartbeat = match Timer::apply(
        |_, beats| {
            *beats += 1;
            *beats
        },
        0u32,
    )
    .every(Duration::from_millis(750))
    .start(clock.started_at())
    {
        Ok(timer) => timer,
        Err(e) => panic!("couldn't start heartbeat: {}", e),
    };

    for (tick, now) in clock.iter() {
        if counter.next_frame_at(now) {
            println!("{}", counter);
        }

        if let Some(beat) = heartbeat.update(now) {
            info!("Heartbeat {} at tick {}", beat, tick);
        }

        if now - clock.started_at() >= Duration::from_secs(5) {
            break;
        }
    }

    println!(
        "{} heartbeats, done after {:?}",
        heartbeat.value(),
        Instant::now() - clock.started_at()
    );
}
