//! # Frame timing
//!
//! [`FrameClock`] measures the time between frames and since start-up, it is
//! what drives movement speed and the animated parts of the scene.
//! [`FrameStats`] keeps a short history of frame times for the controls panel.
//!
//! ```rust
//! use glint::performance::{FrameClock, FrameStats};
//!
//! let mut clock = FrameClock::new();
//! let mut stats = FrameStats::new(120);
//!
//! // In your main loop
//! let dt = clock.tick();
//! stats.record(dt);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Per-frame delta and total elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    delta: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            delta: Duration::ZERO,
        }
    }

    /// Starts a new frame and returns the time since the previous one.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.delta
    }

    /// Duration of the last frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds between start-up and the last tick.
    pub fn elapsed_seconds(&self) -> f32 {
        self.last_frame
            .saturating_duration_since(self.start)
            .as_secs_f32()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolling frame time statistics.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    max_samples: usize,
}

impl FrameStats {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    pub fn average_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: Duration = self.frame_times.iter().sum();
        total.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let frame_time_ms = self.average_frame_time_ms();
        if frame_time_ms > 0.0 {
            1000.0 / frame_time_ms
        } else {
            0.0
        }
    }

    /// Frame times in milliseconds, oldest first, for graphing.
    pub fn history_ms(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frame_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_times.is_empty()
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        // ~2 seconds at 60fps
        Self::new(120)
    }
}
