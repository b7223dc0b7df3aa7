//! Frames per second counter
//!
//! Counts frames in fixed measuring slices and reports the rate of the last
//! completed slice. Print using `{}` to show it as `"59.94 FPS"`.
use std::fmt;

use crate::{
    time::{Duration, Instant},
    util,
};

/// Frame counter.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    slice_start: Instant,
    frame_count: u32,
    slice_size: Duration,
    fps: f64,
}

impl FrameCounter {
    /// Creates a new frame counter with a measuring slice of one second.
    pub fn new() -> FrameCounter {
        Self::new_with_slice_size(Duration::from_secs(1))
    }

    /// Creates a new frame counter with a specific slice size.
    ///
    /// # Panics
    ///
    /// Panics if `slice_size` is zero.
    pub fn new_with_slice_size(slice_size: Duration) -> FrameCounter {
        Self::new_with_start_time(slice_size, Instant::now())
    }

    /// Creates a new frame counter whose first slice begins at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `slice_size` is zero.
    pub fn new_with_start_time(slice_size: Duration, start: Instant) -> FrameCounter {
        assert!(!slice_size.is_zero(), "slice size must not be zero");

        FrameCounter {
            slice_start: start,
            frame_count: 0,
            slice_size,
            fps: 0.0,
        }
    }

    /// Counts a frame now.
    ///
    /// Returns true if a measuring slice ended, which is a good time to
    /// print the current fps value.
    pub fn next_frame(&mut self) -> bool {
        self.next_frame_at(Instant::now())
    }

    /// Counts a frame at `now`.
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use ticktock::FrameCounter;
    ///
    /// let start = Instant::now();
    /// let mut counter = FrameCounter::new_with_start_time(Duration::from_secs(1), start);
    ///
    /// for i in 0..30 {
    ///     assert!(!counter.next_frame_at(start + Duration::from_millis(i * 33)));
    /// }
    /// assert!(counter.next_frame_at(start + Duration::from_secs(1)));
    /// assert_eq!(counter.to_string(), "30.00 FPS");
    /// ```
    pub fn next_frame_at(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.slice_start);
        let slices_passed = util::whole_intervals(elapsed, self.slice_size);

        let completed = slices_passed > 0;
        if completed {
            self.fps = self.frame_count as f64 / elapsed.as_secs_f64();

            self.frame_count = 0;
            self.slice_start += util::mul_duration(self.slice_size, slices_passed);
        }

        self.frame_count += 1;
        completed
    }

    /// Frames per second measured over the last completed slice.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl Default for FrameCounter {
    fn default() -> FrameCounter {
        FrameCounter::new()
    }
}

impl fmt::Display for FrameCounter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2} FPS", self.fps)
    }
}
