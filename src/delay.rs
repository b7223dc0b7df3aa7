//! Delay iterator
//!
//! A simpler iterator than [`Clock`](crate::Clock) that sleeps a fixed
//! amount between iterations, without adapting to the time spent in the
//! loop body.
use std::{iter, thread};

use crate::time::Duration;

/// Simple iterable delay
///
/// Iterating over this structure inserts `delay` between each iteration,
/// starting after the first.
///
/// ```
/// use std::time::{Duration, Instant};
/// use ticktock::Delay;
///
/// let start = Instant::now();
/// for _ in Delay::new(Duration::from_millis(5)).take(3) {}
/// assert!(start.elapsed() >= Duration::from_millis(10));
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    delay: Duration,

    /// Skips the sleep on the first iteration.
    first_tick: bool,
}

impl Delay {
    /// Creates a new delay
    #[inline]
    pub fn new(delay: Duration) -> Delay {
        Delay {
            delay,
            first_tick: true,
        }
    }

    /// Creates a new delay that also sleeps before the first iteration
    #[inline]
    pub fn delayed(delay: Duration) -> Delay {
        Delay {
            delay,
            first_tick: false,
        }
    }

    /// The pause between iterations
    #[inline]
    pub fn duration(&self) -> Duration {
        self.delay
    }
}

impl iter::Iterator for Delay {
    type Item = ();

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.first_tick {
            self.first_tick = false;
        } else {
            thread::sleep(self.delay);
        }

        Some(())
    }
}
