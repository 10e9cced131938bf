//! Time management utilities
//!
//! Frame timing is computed from timestamps supplied by the caller rather than
//! from `Instant::now()`, so the same code runs against the real platform
//! clock and against a fake one in tests.

use std::time::Duration;

/// Frame timer fed by a monotonic clock
#[derive(Debug, Clone)]
pub struct FrameTimer {
    origin: Duration,
    last_frame_start: Option<Duration>,
    delta_time: Duration,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a timer whose zero point is `now`
    pub fn new(now: Duration) -> Self {
        Self {
            origin: now,
            last_frame_start: None,
            delta_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the start of a frame and return the time since the previous one
    pub fn begin_frame(&mut self, now: Duration) -> Duration {
        self.delta_time = self
            .last_frame_start
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last_frame_start = Some(now);
        self.frame_count += 1;
        self.delta_time
    }

    /// How long to wait at `now` so the next frame starts no sooner than
    /// `interval` after the previous frame start
    ///
    /// Returns `None` before the first frame or when the interval has
    /// already passed.
    pub fn remaining_interval(&self, now: Duration, interval: Duration) -> Option<Duration> {
        let next_start = self.last_frame_start? + interval;
        let remaining = next_start.saturating_sub(now);
        (!remaining.is_zero()).then_some(remaining)
    }

    /// Time between the last two frame starts
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Time since the timer was created
    pub fn total_time(&self, now: Duration) -> Duration {
        now.saturating_sub(self.origin)
    }

    /// Number of frames started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second up to `now`
    pub fn average_fps(&self, now: Duration) -> f32 {
        let total = self.total_time(now).as_secs_f32();
        if total > 0.0 {
            self.frame_count as f32 / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut timer = FrameTimer::new(ms(100));
        assert_eq!(timer.begin_frame(ms(110)), Duration::ZERO);
        assert_eq!(timer.frame_count(), 1);
        assert_eq!(timer.begin_frame(ms(126)), ms(16));
        assert_eq!(timer.delta_time(), ms(16));
        assert_eq!(timer.total_time(ms(126)), ms(26));
    }

    #[test]
    fn test_remaining_interval() {
        let mut timer = FrameTimer::new(Duration::ZERO);
        assert_eq!(timer.remaining_interval(ms(0), ms(16)), None);

        timer.begin_frame(ms(0));
        assert_eq!(timer.remaining_interval(ms(4), ms(16)), Some(ms(12)));
        assert_eq!(timer.remaining_interval(ms(16), ms(16)), None);
        assert_eq!(timer.remaining_interval(ms(40), ms(16)), None);
    }

    #[test]
    fn test_average_fps() {
        let mut timer = FrameTimer::new(Duration::ZERO);
        assert_eq!(timer.average_fps(Duration::ZERO), 0.0);
        for frame in 0..10 {
            timer.begin_frame(ms(frame * 100));
        }
        assert!((timer.average_fps(ms(1000)) - 10.0).abs() < f32::EPSILON);
    }
}
