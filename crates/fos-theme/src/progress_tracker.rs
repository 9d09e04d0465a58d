//! Progress Tracker
//!
//! Maps host frame timestamps (microseconds from any monotonic clock) to
//! iteration progress. The tracker never reads a clock itself.

use crate::config;

/// Where a tracker is relative to its active interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressState {
    Before,
    During,
    After,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    running: bool,
    last_frame_time: Option<i64>,
    duration: i64,
    iteration: f64,
    iteration_count: f64,
    slowdown: f64,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::with_slowdown(config::slowdown())
    }
}

impl ProgressTracker {
    /// A stopped tracker using the process-wide slowdown factor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slowdown(slowdown: f64) -> Self {
        Self {
            running: false,
            last_frame_time: None,
            duration: 0,
            iteration: 0.0,
            iteration_count: 0.0,
            slowdown,
        }
    }

    /// Start over. A positive `delay` puts the tracker in
    /// [`ProgressState::Before`] until it has elapsed.
    pub fn start(&mut self, duration: i64, delay: i64, iteration_count: f64) {
        self.running = true;
        self.last_frame_time = None;
        self.duration = duration;
        self.iteration = -(delay as f64) / duration.max(1) as f64;
        self.iteration_count = iteration_count;
    }

    pub fn finish(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Move to `now`. The first frame only records the time.
    pub fn advance_frame(&mut self, now: i64) {
        if !self.running {
            return;
        }

        let Some(last) = self.last_frame_time else {
            self.last_frame_time = Some(now);
            return;
        };

        if now < last {
            tracing::warn!(now, last, "progress tracker frame set backwards, ignoring");
            return;
        }

        let delta = (now - last) as f64 / self.slowdown / self.duration.max(1) as f64;
        self.iteration += delta;
        self.last_frame_time = Some(now);
    }

    /// Record `now` without making progress
    pub fn skip_frame(&mut self, now: i64) {
        if !self.running {
            return;
        }
        self.last_frame_time = Some(now);
    }

    pub fn state(&self) -> ProgressState {
        if !self.running || self.iteration > self.iteration_count {
            ProgressState::After
        } else if self.iteration < 0.0 {
            ProgressState::Before
        } else {
            ProgressState::During
        }
    }

    /// Iterations completed, fractional, within `[0, iteration_count]`
    pub fn iteration(&self) -> f64 {
        if !self.running {
            return 1.0;
        }
        self.iteration.clamp(0.0, self.iteration_count.max(0.0))
    }

    /// Index of the current iteration
    pub fn iteration_cycle(&self) -> u64 {
        let iteration = self.iteration();
        if iteration == 0.0 {
            return 0;
        }
        (iteration.ceil() - 1.0) as u64
    }

    /// Progress through the current iteration, in `[0, 1]`
    pub fn progress(&self, reverse: bool) -> f64 {
        let iteration = self.iteration();
        let progress = iteration - self.iteration_cycle() as f64;
        if reverse { 1.0 - progress } else { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(duration: i64, delay: i64, count: f64) -> ProgressTracker {
        let mut tracker = ProgressTracker::with_slowdown(1.0);
        tracker.start(duration, delay, count);
        tracker
    }

    #[test]
    fn test_first_frame_only_records_time() {
        let mut tracker = tracker(1000, 0, 1.0);
        tracker.advance_frame(5000);
        assert_eq!(tracker.state(), ProgressState::During);
        assert_eq!(tracker.progress(false), 0.0);

        tracker.advance_frame(5500);
        assert_eq!(tracker.progress(false), 0.5);
        assert_eq!(tracker.progress(true), 0.5);
    }

    #[test]
    fn test_delay_starts_before() {
        let mut tracker = tracker(1000, 500, 1.0);
        tracker.advance_frame(0);
        assert_eq!(tracker.state(), ProgressState::Before);
        tracker.advance_frame(500);
        assert_eq!(tracker.state(), ProgressState::During);
        tracker.advance_frame(1500);
        assert_eq!(tracker.state(), ProgressState::During);
        assert_eq!(tracker.progress(false), 1.0);
        tracker.advance_frame(1501);
        assert_eq!(tracker.state(), ProgressState::After);
    }

    #[test]
    fn test_backwards_frames_are_ignored() {
        let mut tracker = tracker(1000, 0, 1.0);
        tracker.advance_frame(1000);
        tracker.advance_frame(1200);
        tracker.advance_frame(100);
        assert_eq!(tracker.iteration(), 0.2);
        tracker.advance_frame(1300);
        assert!((tracker.iteration() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_skip_frame_pauses() {
        let mut tracker = tracker(1000, 0, 1.0);
        tracker.advance_frame(0);
        tracker.advance_frame(250);
        tracker.skip_frame(5000);
        tracker.advance_frame(5250);
        assert_eq!(tracker.iteration(), 0.5);
    }

    #[test]
    fn test_cycles() {
        let mut tracker = tracker(100, 0, 3.0);
        tracker.advance_frame(0);
        assert_eq!(tracker.iteration_cycle(), 0);
        tracker.advance_frame(150);
        assert_eq!(tracker.iteration_cycle(), 1);
        assert_eq!(tracker.progress(false), 0.5);
        tracker.advance_frame(200);
        assert_eq!(tracker.iteration_cycle(), 1);
        assert_eq!(tracker.progress(false), 1.0);
    }

    #[test]
    fn test_slowdown() {
        let mut tracker = ProgressTracker::with_slowdown(2.0);
        tracker.start(1000, 0, 1.0);
        tracker.advance_frame(0);
        tracker.advance_frame(1000);
        assert_eq!(tracker.progress(false), 0.5);
    }

    #[test]
    fn test_stopped_tracker_is_after() {
        let mut tracker = tracker(1000, 0, 1.0);
        tracker.finish();
        assert_eq!(tracker.state(), ProgressState::After);
        assert_eq!(tracker.iteration(), 1.0);
        assert!(!tracker.is_running());
        assert_eq!(ProgressTracker::with_slowdown(1.0).state(), ProgressState::After);
    }
}
