//! The clock module contains a fixed-rate clock that ticks in a set
//! interval as precisely as possible.
//!
//! Tick instants are always computed from the start time of the clock, so
//! time spent between two waits does not accumulate as drift. If a caller
//! falls behind, the ticks it missed are skipped.
//!
//! ```no_run
//! use ticktock::Clock;
//!
//! // tick 60 times per second
//! for (tick, now) in Clock::framerate(60.0).iter() {
//!     // render frame `tick` at `now`
//!     # let _ = now;
//!     if tick == 600 {
//!         break;
//!     }
//! }
//! ```
use std::{iter, thread};

use log::trace;

use crate::{
    error::Error,
    time::{Duration, Instant},
    util,
};

/// A tick number paired with the absolute instant of that tick.
pub type Tick = (u64, Instant);

/// A fixed-rate Clock.
///
/// A clock has a start instant and a tick length. Tick `n` happens at
/// `started_at + n * tick_len`; tick 0 is the start itself and is never
/// waited for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clock {
    /// Start time of the clock
    started_at: Instant,
    /// Tick length
    tick_len: Duration,
}

impl Clock {
    /// Create a new clock with a given tick length, starting now.
    ///
    /// # Panics
    ///
    /// Panics if `tick_len` is zero. Use [`Clock::try_new`] to handle that
    /// case.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use ticktock::Clock;
    ///
    /// // Create a clock that ticks every two seconds
    /// let clock = Clock::new(Duration::from_secs(2));
    /// assert_eq!(clock.tick_len(), Duration::from_secs(2));
    /// ```
    pub fn new(tick_len: Duration) -> Clock {
        Clock::new_with_start_time(tick_len, Instant::now())
    }

    /// Create a new clock with a given tick length, starting now.
    pub fn try_new(tick_len: Duration) -> Result<Clock, Error> {
        Clock::try_new_with_start_time(tick_len, Instant::now())
    }

    /// Create a new clock with a specified start time.
    ///
    /// # Panics
    ///
    /// Panics if `tick_len` is zero.
    pub fn new_with_start_time(tick_len: Duration, start: Instant) -> Clock {
        assert!(!tick_len.is_zero(), "clock tick length must not be zero");
        Clock {
            started_at: start,
            tick_len,
        }
    }

    /// Create a new clock with a specified start time.
    pub fn try_new_with_start_time(tick_len: Duration, start: Instant) -> Result<Clock, Error> {
        Ok(Clock {
            started_at: start,
            tick_len: util::non_zero(tick_len)?,
        })
    }

    /// Create a new fixed-framerate clock, starting now.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a finite positive number, or so large that a
    /// single frame is shorter than a nanosecond.
    pub fn framerate(fps: f64) -> Clock {
        Clock::framerate_with_start_time(fps, Instant::now())
    }

    /// Create a new fixed-framerate clock, starting now.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use ticktock::Clock;
    ///
    /// let clock = Clock::try_framerate(50.0).unwrap();
    /// assert_eq!(clock.tick_len(), Duration::from_millis(20));
    ///
    /// assert!(Clock::try_framerate(0.0).is_err());
    /// ```
    pub fn try_framerate(fps: f64) -> Result<Clock, Error> {
        Clock::try_framerate_with_start_time(fps, Instant::now())
    }

    /// Create a new fixed-framerate clock with a specified start time.
    ///
    /// # Panics
    ///
    /// See [`Clock::framerate`].
    pub fn framerate_with_start_time(fps: f64, start: Instant) -> Clock {
        match Clock::try_framerate_with_start_time(fps, start) {
            Ok(clock) => clock,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create a new fixed-framerate clock with a specified start time.
    pub fn try_framerate_with_start_time(fps: f64, start: Instant) -> Result<Clock, Error> {
        Clock::try_new_with_start_time(util::frame_duration(fps)?, start)
    }

    /// Create a new clock with a different tick length that is synced to
    /// this clock, i.e. shares its start time.
    ///
    /// # Panics
    ///
    /// Panics if `tick_len` is zero.
    pub fn synced(&self, tick_len: Duration) -> Clock {
        Clock::new_with_start_time(tick_len, self.started_at)
    }

    /// Create a new clock with a different tick length that is synced to
    /// this clock.
    pub fn try_synced(&self, tick_len: Duration) -> Result<Clock, Error> {
        Clock::try_new_with_start_time(tick_len, self.started_at)
    }

    /// Get start time
    #[inline]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Get tick length
    #[inline]
    pub fn tick_len(&self) -> Duration {
        self.tick_len
    }

    /// Returns the number of the tick at or preceding `now`.
    ///
    /// Instants before the start of the clock are in tick 0.
    #[inline]
    pub fn tick_num_at(&self, now: Instant) -> u64 {
        util::whole_intervals(now.saturating_duration_since(self.started_at), self.tick_len)
    }

    /// Returns the instant of tick number `n`.
    ///
    /// # Panics
    ///
    /// Panics if the instant lies beyond what the platform can represent.
    /// See [`Clock::checked_tick_at`].
    #[inline]
    pub fn tick_at(&self, n: u64) -> Instant {
        match self.checked_tick_at(n) {
            Some(at) => at,
            None => panic!("tick {} is out of range for this clock", n),
        }
    }

    /// Returns the instant of tick number `n`, or `None` if it cannot be
    /// represented.
    #[inline]
    pub fn checked_tick_at(&self, n: u64) -> Option<Instant> {
        self.started_at
            .checked_add(util::mul_duration(self.tick_len, n))
    }

    /// Returns the first tick strictly after `now`.
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use ticktock::Clock;
    ///
    /// let start = Instant::now();
    /// let clock = Clock::new_with_start_time(Duration::from_millis(10), start);
    ///
    /// let (n, at) = clock.next_tick_after(start + Duration::from_millis(25));
    /// assert_eq!(n, 3);
    /// assert_eq!(at, start + Duration::from_millis(30));
    /// ```
    #[inline]
    pub fn next_tick_after(&self, now: Instant) -> Tick {
        let next = self.tick_num_at(now) + 1;
        (next, self.tick_at(next))
    }

    /// Waits for the next clock tick.
    ///
    /// Blocks the current thread until the next tick and returns its number
    /// and instant.
    pub fn wait_until_tick(&self) -> Tick {
        let now = Instant::now();
        let (n, at) = self.next_tick_after(now);

        let until_next = at.saturating_duration_since(now);
        trace!("Waiting {:?} for tick {}", until_next, n);
        thread::sleep(until_next);

        (n, at)
    }

    /// Creates a clock iterator.
    ///
    /// The iterator will iterate forever, calling `wait_until_tick` on each
    /// iteration.
    ///
    /// Returns (current tick number, absolute time) on each iteration.
    #[inline]
    pub fn iter(&self) -> ClockIter<'_> {
        ClockIter(self)
    }

    /// Create a relative clock iterator.
    ///
    /// Similar to `iter()`, but the resulting iterator will return a tuple of
    /// (current tick number, relative time), with relative time being a
    /// `Duration` from the start of the clock.
    #[inline]
    pub fn rel_iter(&self) -> ClockIterRelative<'_> {
        ClockIterRelative(self)
    }
}

#[cfg(feature = "async_tokio")]
impl Clock {
    /// Waits for the next clock tick without blocking the thread.
    ///
    /// Same as [`Clock::wait_until_tick`], but sleeps on the tokio timer.
    /// Must be called from within a tokio runtime with time enabled.
    pub async fn tick(&self) -> Tick {
        let (n, at) = self.next_tick_after(Instant::now());
        trace!("Waiting asynchronously for tick {}", n);
        crate::time::sleep_until(at).await;
        (n, at)
    }

    /// An endless stream of ticks, driven by [`Clock::tick`].
    pub fn stream(&self) -> impl futures::Stream<Item = Tick> + '_ {
        futures::stream::unfold(self, |clock| async move { Some((clock.tick().await, clock)) })
    }
}

/// A clock iterator
///
/// Used to iterate over the clock:
///
/// ```
/// use std::time::{Duration, Instant};
/// use ticktock::Clock;
///
/// let start = Instant::now();
/// let clock = Clock::new(Duration::from_millis(20));
///
/// // as soon as the clock starts, it will wait for the next tick.
/// for (tick, _now) in clock.iter() {
///     assert!(tick >= 1);
///     break;
/// }
///
/// assert!(Duration::from_millis(20) <= start.elapsed());
/// ```
#[derive(Debug)]
pub struct ClockIter<'a>(&'a Clock);

impl<'a> iter::Iterator for ClockIter<'a> {
    type Item = Tick;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.wait_until_tick())
    }
}

/// Similar to `ClockIter`, but returns a relative time instead.
///
/// The resulting returned tuple will be of the form `(tick_number,
/// duration_since_clock_start)`
#[derive(Debug)]
pub struct ClockIterRelative<'a>(&'a Clock);

impl<'a> iter::Iterator for ClockIterRelative<'a> {
    type Item = (u64, Duration);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (n, t) = self.0.wait_until_tick();
        Some((n, t - self.0.started_at))
    }
}

impl<'a> IntoIterator for &'a Clock {
    type Item = Tick;
    type IntoIter = ClockIter<'a>;

    fn into_iter(self) -> ClockIter<'a> {
        self.iter()
    }
}
