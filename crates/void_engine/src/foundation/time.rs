//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer measuring wall-clock delta between ticks
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
    max_delta: Option<f32>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: None,
        }
    }

    /// Cap the reported delta, e.g. after a debugger pause
    pub fn with_max_delta(mut self, seconds: f32) -> Self {
        self.max_delta = Some(seconds.max(0.0));
        self
    }

    /// Advance one frame and return the elapsed seconds since the last call
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Restart the wall clock without counting a frame, e.g. after loading
    pub fn resync(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Advance one frame by an explicit amount of seconds.
    ///
    /// Used by deterministic drivers that do not follow the wall clock.
    pub fn advance(&mut self, seconds: f32) -> f32 {
        let mut delta = seconds.max(0.0);
        if let Some(max) = self.max_delta {
            delta = delta.min(max);
        }
        self.delta_time = delta;
        self.total_time += f64::from(delta);
        self.frame_count += 1;
        delta
    }

    /// Seconds elapsed during the last frame
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total seconds accumulated by this timer
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.frame_count as f64 / self.total_time
        } else {
            0.0
        }
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start (or resume) the stopwatch
    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Total elapsed time, including the running segment
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut timer = Timer::new();
        timer.advance(0.5);
        timer.advance(0.25);

        assert_eq!(timer.delta_time(), 0.25);
        assert_eq!(timer.total_time(), 0.75);
        assert_eq!(timer.frame_count(), 2);
        assert_eq!(timer.average_fps(), 2.0 / 0.75);
    }

    #[test]
    fn test_advance_clamps_negative_and_max() {
        let mut timer = Timer::new().with_max_delta(0.1);
        assert_eq!(timer.advance(-1.0), 0.0);
        assert_eq!(timer.advance(5.0), 0.1);
    }

    #[test]
    fn test_stopwatch_state() {
        let mut stopwatch = Stopwatch::start_new();
        assert!(stopwatch.is_running());
        stopwatch.stop();
        assert!(!stopwatch.is_running());
        let frozen = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), frozen);
    }
}
