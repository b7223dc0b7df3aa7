//! ticktock is a timing crate for frame-based applications.
//!
//! It contains a clock for slowing a loop down to a fixed framerate, interval
//! timers driven from such a loop, a frames per second counter and a
//! bandwidth-limited IO wrapper. With the `async_tokio` feature a clock can
//! also be driven on a tokio runtime and broadcast to listeners.
//!
//! ```no_run
//! use ticktock::Clock;
//!
//! let now = std::time::Instant::now();
//! for (tick, t) in Clock::framerate(30.0).iter() {
//!     // do something every 1/30th of a second
//!     if t - now > std::time::Duration::from_secs(10) {
//!         break;
//!     }
//!     # let _ = tick;
//! }
//! ```
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod clock;
pub mod config;
pub mod delay;
#[cfg(feature = "async_tokio")]
pub mod driver;
pub mod error;
pub mod framecounter;
#[cfg(feature = "async_tokio")]
pub mod listener;
pub mod throttled_io;
pub mod time;
pub mod timer;
mod util;

pub use crate::clock::{Clock, ClockIter, ClockIterRelative, Tick};
pub use crate::delay::Delay;
#[cfg(feature = "async_tokio")]
pub use crate::driver::ClockDriver;
pub use crate::error::{Error, ErrorKind};
pub use crate::framecounter::FrameCounter;
pub use crate::throttled_io::ThrottledIo;
pub use crate::timer::{Timer, TimerBuilder};
