//! Interval timers
//!
//! Interval timers periodically perform an action or mutate a stored value.
//! The value is owned by the timer itself, but can be retrieved.
//!
//! A timer does not run on its own thread. It expects to be triggered from
//! the outside every now and then, usually from a frame loop, with the
//! current time passed in to save on syscalls.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use ticktock::Timer;
//!
//! let start = Instant::now();
//! let mut heartbeat = Timer::apply(
//!     |_, count| {
//!         *count += 1;
//!         *count
//!     },
//!     0,
//! )
//! .every(Duration::from_millis(500))
//! .start(start)
//! .unwrap();
//!
//! assert_eq!(heartbeat.update(start + Duration::from_millis(100)), None);
//! assert_eq!(heartbeat.update(start + Duration::from_millis(500)), Some(1));
//! ```
use std::fmt;

use crate::{
    error::{Error, ErrorKind},
    time::{Duration, Instant},
    util,
};

/// A timer builder
///
/// Returned by [`Timer::apply`]; set the timing with `every` or `once`,
/// then `start` it.
pub struct TimerBuilder<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    func: F,
    initial: V,
    interval: Option<Duration>,
    repeat: bool,
}

impl<F, V, R> TimerBuilder<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    fn new(func: F, initial: V) -> TimerBuilder<F, V, R> {
        TimerBuilder {
            func,
            initial,
            interval: None,
            repeat: true,
        }
    }

    /// Fire in fixed intervals
    ///
    /// The timer will repeat after waiting `interval`. Time spent executing
    /// the timer function is ignored.
    #[inline]
    pub fn every(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self.repeat = true;
        self
    }

    /// Fire once after a delay
    #[inline]
    pub fn once(mut self, delay: Duration) -> Self {
        self.interval = Some(delay);
        self.repeat = false;
        self
    }

    /// Start the timer
    ///
    /// Records `now` as the basis for all later calculations. The first
    /// firing is due one interval after `now`. Fails with `Overflow` if that
    /// instant cannot be represented.
    pub fn start(self, now: Instant) -> Result<Timer<F, V, R>, Error> {
        let interval = self
            .interval
            .ok_or_else(|| Error::new(ErrorKind::NoTimingSet))?;
        let interval = util::non_zero(interval)?;
        let next_fire = now
            .checked_add(interval)
            .ok_or_else(|| Error::new(ErrorKind::Overflow))?;

        Ok(Timer {
            func: self.func,
            value: self.initial,
            interval,
            repeat: self.repeat,
            next_fire: Some(next_fire),
        })
    }
}

impl<F, V: fmt::Debug, R> fmt::Debug for TimerBuilder<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerBuilder")
            .field("initial", &self.initial)
            .field("interval", &self.interval)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

/// An interval timer owning a value of type `V`.
///
/// Every time the timer fires, `F` is called with the time elapsed since the
/// previous scheduled firing and a mutable reference to the value. Whatever
/// `F` returns is handed back from [`Timer::update`].
pub struct Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    func: F,
    value: V,
    interval: Duration,
    repeat: bool,
    /// `None` once a one-shot timer has fired, or when the next firing is
    /// out of range.
    next_fire: Option<Instant>,
}

impl<F, V, R> Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    /// Construct a new timer
    ///
    /// The timer will periodically execute `func`, which alters a value
    /// initially set to `initial`.
    #[inline]
    pub fn apply(func: F, initial: V) -> TimerBuilder<F, V, R> {
        TimerBuilder::new(func, initial)
    }

    /// Get timer interval
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the timer re-arms itself after firing
    #[inline]
    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// The instant of the next firing, `None` if the timer is disarmed.
    #[inline]
    pub fn next_fire(&self) -> Option<Instant> {
        self.next_fire
    }

    /// Whether calling `update(now)` would fire the timer.
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.next_fire, Some(at) if at <= now)
    }

    /// Replace the stored value
    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    /// Consume the timer and return the stored value
    pub fn into_value(self) -> V {
        self.value
    }

    /// Re-arm the timer, next firing one interval after `now`.
    ///
    /// Also re-arms one-shot timers that already fired. If one interval
    /// after `now` cannot be represented, the timer is disarmed instead.
    pub fn reset(&mut self, now: Instant) {
        self.next_fire = now.checked_add(self.interval);
    }

    /// Execute the timer function if due
    ///
    /// If the timer is not due at `now`, the function is not called and
    /// `None` is returned.
    ///
    /// Otherwise the next firing instant is advanced past `now`, the
    /// function is called exactly once (however many intervals were missed)
    /// and its result returned.
    pub fn update(&mut self, now: Instant) -> Option<R> {
        let next_fire = match self.next_fire {
            Some(at) if at <= now => at,
            _ => return None,
        };

        // time since the previous scheduled firing
        let dt = now - next_fire + self.interval;

        self.next_fire = if self.repeat {
            let intervals = util::whole_intervals(dt, self.interval);
            next_fire.checked_add(util::mul_duration(self.interval, intervals))
        } else {
            None
        };

        Some((self.func)(dt, &mut self.value))
    }
}

impl<F, V: Clone, R> Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    /// Returns a copy of the value stored inside the timer.
    #[inline]
    pub fn value(&self) -> V {
        self.value.clone()
    }
}

impl<F, V, R> AsRef<V> for Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    #[inline(always)]
    fn as_ref(&self) -> &V {
        &self.value
    }
}

impl<F, V, R> AsMut<V> for Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    #[inline(always)]
    fn as_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<F, V: fmt::Debug, R> fmt::Debug for Timer<F, V, R>
where
    F: Fn(Duration, &mut V) -> R,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("value", &self.value)
            .field("interval", &self.interval)
            .field("repeat", &self.repeat)
            .field("next_fire", &self.next_fire)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn construction() {
        let now = Instant::now();
        Timer::apply(|_, _| (), 123).every(ms(500)).start(now).unwrap();
        let timer = Timer::apply(
            |_, v| {
                *v += 1;
                *v
            },
            12,
        )
        .every(ms(500))
        .start(now)
        .unwrap();

        assert_eq!(timer.interval(), ms(500));
        assert!(timer.is_repeating());
        assert_eq!(timer.next_fire(), Some(now + ms(500)));
    }

    #[test]
    fn start_without_timing_fails() {
        let err = Timer::apply(|_, _| (), 0).start(Instant::now()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NoTimingSet);

        let err = Timer::apply(|_, _| (), 0)
            .every(Duration::ZERO)
            .start(Instant::now())
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ZeroInterval);
    }

    #[test]
    fn far_future_firing() {
        let now = Instant::now();

        let err = Timer::apply(|_, _: &mut ()| (), ())
            .once(Duration::MAX)
            .start(now)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Overflow);

        // a huge interval that still fits disarms on reset instead of panicking
        let mut timer = Timer::apply(|_, _: &mut ()| (), ())
            .every(ms(10))
            .start(now)
            .unwrap();
        timer.interval = Duration::MAX;
        timer.reset(now);
        assert_eq!(timer.next_fire(), None);
        assert!(!timer.is_due(now + ms(1_000)));
        assert_eq!(timer.update(now + ms(1_000)), None);
    }

    #[test]
    fn value_retrieval() {
        let now = Instant::now();
        let mut t = Timer::apply(|_, _| (), 123).every(ms(500)).start(now).unwrap();

        assert_eq!(*t.as_ref(), 123);
        assert_eq!(*t.as_mut(), 123);
        assert_eq!(t.value(), 123);

        *t.as_mut() = 7;
        assert_eq!(t.into_value(), 7);
    }

    #[test]
    fn single_timer() {
        let now = Instant::now();
        let mut timer = Timer::apply(|_, count| *count += 1, 0)
            .every(ms(50))
            .start(now)
            .unwrap();

        assert_eq!(timer.value(), 0);
        let future = now + ms(49);
        assert!(!timer.is_due(future));
        assert!(timer.update(future).is_none());
        assert_eq!(timer.value(), 0);
        timer.update(future);
        assert_eq!(timer.value(), 0);

        let future2 = now + ms(50);
        assert!(timer.is_due(future2));
        assert!(timer.update(future2).is_some());
        assert_eq!(timer.value(), 1);
        timer.update(future2);
        assert_eq!(timer.value(), 1);

        let future3 = now + ms(51);
        timer.update(future3);
        assert_eq!(timer.value(), 1);
        timer.update(future3);
        assert_eq!(timer.value(), 1);

        let future4 = now + ms(100);
        timer.update(future4);
        assert_eq!(timer.value(), 2);
        timer.update(future4);
        assert_eq!(timer.value(), 2);

        // many missed intervals collapse into a single call
        let future5 = now + ms(10_000);
        timer.update(future5);
        assert_eq!(timer.value(), 3);
        timer.update(future5);
        assert_eq!(timer.value(), 3);
        assert_eq!(timer.next_fire(), Some(now + ms(10_050)));
    }

    #[test]
    fn elapsed_time_passed_to_func() {
        let now = Instant::now();
        let mut timer = Timer::apply(|dt, _: &mut ()| dt, ())
            .every(ms(100))
            .start(now)
            .unwrap();

        assert_eq!(timer.update(now + ms(100)), Some(ms(100)));
        // 30ms late
        assert_eq!(timer.update(now + ms(230)), Some(ms(130)));
        // the schedule stays aligned to the start
        assert_eq!(timer.next_fire(), Some(now + ms(300)));
        assert_eq!(timer.update(now + ms(300)), Some(ms(100)));
    }

    #[test]
    fn once_fires_a_single_time() {
        let now = Instant::now();
        let mut timer = Timer::apply(|_, fired| *fired += 1, 0)
            .once(ms(20))
            .start(now)
            .unwrap();

        assert!(!timer.is_repeating());
        assert_eq!(timer.update(now + ms(10)), None);
        assert_eq!(timer.update(now + ms(25)), Some(()));
        assert_eq!(timer.next_fire(), None);
        assert_eq!(timer.update(now + ms(1_000)), None);
        assert_eq!(timer.value(), 1);

        timer.reset(now + ms(1_000));
        assert_eq!(timer.update(now + ms(1_020)), Some(()));
        assert_eq!(timer.value(), 2);
    }

    #[test]
    fn reset_postpones_firing() {
        let now = Instant::now();
        let mut timer = Timer::apply(|_, fired| *fired = true, false)
            .every(ms(100))
            .start(now)
            .unwrap();

        timer.reset(now + ms(90));
        assert!(timer.update(now + ms(100)).is_none());
        assert!(timer.update(now + ms(190)).is_some());

        if timer.value() {
            // reset after it fired
            timer.set_value(false);
        }
        assert!(!timer.value());
    }
}
