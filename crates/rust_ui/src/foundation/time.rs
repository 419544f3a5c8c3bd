//! Frame timing for hosts
//!
//! The UI core never reads the wall clock itself: every animation is advanced
//! by the delta the host passes to `tick`. `FrameTimer` is a convenience for
//! hosts that want a clamped, pausable delta feed.

use std::time::Instant;

/// Longest delta handed out by default (seconds), so a stalled frame does
/// not make every animation jump to its end
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Pausable frame timer producing per-frame deltas
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    max_delta: f32,
    time_scale: f32,
    paused: bool,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new running timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            max_delta: DEFAULT_MAX_DELTA,
            time_scale: 1.0,
            paused: false,
        }
    }

    /// Set the largest delta this timer will report
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Scale every reported delta (slow motion, fast forward)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Advance to the next frame and return its delta in seconds
    ///
    /// A paused timer reports zero, which freezes every effect driven by it.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        self.delta_time = if self.paused {
            0.0
        } else {
            elapsed.min(self.max_delta) * self.time_scale
        };
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Stop producing time
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume producing time
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_frame = Instant::now();
    }

    /// Whether the timer is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Delta reported by the last `tick`
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of all reported deltas
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of `tick` calls so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_timer_reports_zero() {
        let mut timer = FrameTimer::new();
        timer.pause();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_eq!(timer.tick(), 0.0);
        assert_eq!(timer.frame_count(), 1);
        assert!(timer.is_paused());
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut timer = FrameTimer::new().with_max_delta(0.001);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.tick() <= 0.001);
    }
}
