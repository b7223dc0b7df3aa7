//! Duration arithmetic shared by the clock, timer and throttling code.
//!
//! Everything is done in 128 bit nanoseconds, so multiplying a tick length by
//! a tick number cannot overflow the way a `u32` multiplier on `Duration`
//! would after a few billion ticks. Products past `Duration::MAX` saturate;
//! adding them to an `Instant` is up to the caller to check.

use std::time::Duration;

use crate::error::{Error, ErrorKind};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Build a `Duration` from a nanosecond count.
///
/// Saturates at `Duration::MAX` instead of panicking.
pub(crate) fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = nanos / NANOS_PER_SEC;
    if secs > u64::MAX as u128 {
        return Duration::MAX;
    }
    Duration::new(secs as u64, (nanos % NANOS_PER_SEC) as u32)
}

/// `duration * n`, saturating.
pub(crate) fn mul_duration(duration: Duration, n: u64) -> Duration {
    duration_from_nanos(duration.as_nanos().saturating_mul(n as u128))
}

/// Number of whole `interval`s that fit into `elapsed`.
///
/// `interval` must not be zero.
pub(crate) fn whole_intervals(elapsed: Duration, interval: Duration) -> u64 {
    let n = elapsed.as_nanos() / interval.as_nanos();
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Length of a single frame at `fps` frames per second.
pub(crate) fn frame_duration(fps: f64) -> Result<Duration, Error> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(Error::new(ErrorKind::InvalidFramerate(fps)));
    }

    let frame = Duration::try_from_secs_f64(1.0 / fps)
        .map_err(|_| Error::new(ErrorKind::InvalidFramerate(fps)))?;

    non_zero(frame)
}

/// Reject zero-length intervals.
pub(crate) fn non_zero(duration: Duration) -> Result<Duration, Error> {
    if duration.is_zero() {
        Err(Error::new(ErrorKind::ZeroInterval))
    } else {
        Ok(duration)
    }
}
