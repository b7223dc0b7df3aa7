//! Simulated slow reads and writes.
//!
//! Limits bandwidth by lengthening calls to `Read::read` and `Write::write`
//! until an upper bound on the byte rate is met. Useful for testing how an
//! application behaves on a slow link.
use std::io::{self, Read, Write};
use std::thread;

use log::trace;

use crate::{
    time::{Duration, Instant},
    util,
};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A wrapper that limits the maximum read and write rate.
///
/// After each successful read or write the wrapper pauses long enough that
/// the total number of bytes moved since the start never exceeds the
/// configured rate. Reads and writes are accounted for separately.
#[derive(Debug)]
pub struct ThrottledIo<T> {
    bytes_per_second: u32,
    /// Total bytes read since `start`.
    total_read: u128,
    /// Total bytes written since `start`.
    total_written: u128,
    start: Instant,
    io: T,
}

impl<T> ThrottledIo<T> {
    /// Create a new throttled reader/writer with a maximum rate, starting
    /// now.
    ///
    /// # Panics
    ///
    /// Panics if `bytes_per_second` is zero.
    #[inline]
    pub fn new(io: T, bytes_per_second: u32) -> ThrottledIo<T> {
        Self::new_with_start_time(io, bytes_per_second, Instant::now())
    }

    /// Create a new throttled reader/writer with a specified start time.
    ///
    /// A start time in the future counts as no time elapsed yet.
    ///
    /// # Panics
    ///
    /// Panics if `bytes_per_second` is zero.
    pub fn new_with_start_time(io: T, bytes_per_second: u32, start: Instant) -> ThrottledIo<T> {
        assert!(bytes_per_second > 0, "throttle rate must not be zero");

        ThrottledIo {
            bytes_per_second,
            total_read: 0,
            total_written: 0,
            start,
            io,
        }
    }

    /// Return the inner reader/writer.
    #[inline]
    pub fn into_inner(self) -> T {
        self.io
    }

    /// Borrow the inner reader/writer.
    #[inline]
    pub fn get_ref(&self) -> &T {
        &self.io
    }

    /// Mutably borrow the inner reader/writer.
    ///
    /// Bytes moved through this reference bypass the throttle.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Bytes read since the start.
    #[inline]
    pub fn total_read(&self) -> u128 {
        self.total_read
    }

    /// Bytes written since the start.
    #[inline]
    pub fn total_written(&self) -> u128 {
        self.total_written
    }

    fn throttle(&self, total: u128) {
        let elapsed = Instant::now().saturating_duration_since(self.start);

        if let Some(wait) = excess_time(total, elapsed, self.bytes_per_second) {
            trace!("Throttling for {:?} after {} bytes", wait, total);
            thread::sleep(wait);
        }
    }
}

/// How long to wait until moving `total` bytes is within `bytes_per_second`,
/// given `elapsed` time since the start.
fn excess_time(total: u128, elapsed: Duration, bytes_per_second: u32) -> Option<Duration> {
    let rate = bytes_per_second as u128;
    let allowed = elapsed.as_nanos().saturating_mul(rate) / NANOS_PER_SEC;

    if allowed < total {
        Some(util::duration_from_nanos(
            (total - allowed).saturating_mul(NANOS_PER_SEC) / rate,
        ))
    } else {
        None
    }
}

impl<T> Read for ThrottledIo<T>
where
    T: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes_read = self.io.read(buf)?;
        self.total_read += bytes_read as u128;

        self.throttle(self.total_read);

        Ok(bytes_read)
    }
}

impl<T> Write for ThrottledIo<T>
where
    T: Write,
{
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let bytes_written = self.io.write(data)?;
        self.total_written += bytes_written as u128;

        self.throttle(self.total_written);

        Ok(bytes_written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.io.flush()
    }
}
