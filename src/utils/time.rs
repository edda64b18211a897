use std::time::{Duration, Instant};

/// Timer for tracking frame timing and elapsed time.
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    /// Time since last tick
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Updates the timer and returns the delta since the previous tick in seconds.
    ///
    /// Callers that want to ignore a time span (e.g. while the window is
    /// occluded) simply do not tick; the next tick then reports the whole
    /// span, exactly as the wall clock observed it.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now - self.last_update;
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

/// Caps per-frame work to a fixed interval by accumulating wall-clock deltas.
///
/// Deltas below the interval are carried over instead of being dropped, and
/// the residual after a produced frame is the accumulation modulo the
/// interval, so long-term playback speed matches wall-clock time.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: f32,
    accumulated: f32,
}

impl FramePacer {
    /// Creates a pacer with the given minimum frame interval in seconds.
    #[must_use]
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    /// Feeds a wall-clock delta and decides whether a frame should run.
    ///
    /// Returns `Some(step)` when enough time has accumulated, where `step` is
    /// the full accumulated delta to advance simulation by; the remainder
    /// (`step % interval`) is kept for the next call. Returns `None` when the
    /// frame should be skipped, keeping the accumulation.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        self.accumulated += dt;
        if self.accumulated < self.interval {
            return None;
        }
        let step = self.accumulated;
        self.accumulated %= self.interval;
        Some(step)
    }

    /// The currently accumulated, not yet consumed time.
    #[inline]
    #[must_use]
    pub fn residual(&self) -> f32 {
        self.accumulated
    }

    /// The configured frame interval in seconds.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> f32 {
        self.interval
    }
}
