use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Delay between the last asset reaching 100% and the scene going live.
pub const START_DELAY: Duration = Duration::from_secs(1);

/// Tracks per-asset load percentages and derives the overall progress.
///
/// The denominator is fixed at construction: assets that never report keep
/// dragging the overall value down, so a failed load permanently blocks the
/// start trigger. Re-reports overwrite the previous value, which keeps
/// repeated or out-of-order callbacks from double counting.
pub struct LoadProgress {
    reported: FxHashMap<&'static str, f32>,
    total_assets: usize,
    completed_at: Option<Instant>,
    started: bool,
}

impl LoadProgress {
    #[must_use]
    pub fn new(total_assets: usize) -> Self {
        assert!(total_assets > 0, "progress needs at least one asset");
        Self {
            reported: FxHashMap::default(),
            total_assets,
            completed_at: None,
            started: false,
        }
    }

    /// Records the latest percentage for an asset and re-derives the overall
    /// value. Arms the delayed start trigger the first time the overall
    /// progress reaches 100%.
    pub fn report(&mut self, id: &'static str, percent: f32, now: Instant) {
        self.reported.insert(id, percent.clamp(0.0, 100.0));

        if self.completed_at.is_none() && self.overall() >= 100.0 {
            self.completed_at = Some(now);
            log::info!("All assets loaded");
        }
    }

    /// Overall progress in [0, 100]: sum of the latest per-asset values over
    /// the fixed asset count.
    #[must_use]
    pub fn overall(&self) -> f32 {
        let sum: f32 = self.reported.values().sum();
        sum / self.total_assets as f32
    }

    /// Overall progress floored to a whole percent, for display.
    #[must_use]
    pub fn display_percent(&self) -> u32 {
        self.overall().floor().max(0.0) as u32
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns `true` exactly once, when the start delay has elapsed after
    /// completion. Further calls (and further reports) never re-trigger.
    pub fn take_start(&mut self, now: Instant) -> bool {
        if self.started {
            return false;
        }
        match self.completed_at {
            Some(completed) if now.duration_since(completed) >= START_DELAY => {
                self.started = true;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: usize = 12;

    #[test]
    fn overall_is_sum_over_fixed_total() {
        let now = Instant::now();
        let mut progress = LoadProgress::new(TOTAL);
        progress.report("alien", 50.0, now);
        for id in ["a", "b", "c", "d", "e"] {
            progress.report(id, 100.0, now);
        }
        // (50 + 500) / 12
        assert!((progress.overall() - 550.0 / 12.0).abs() < 1e-4);
        assert_eq!(progress.display_percent(), 45);
    }

    #[test]
    fn re_report_overwrites_instead_of_accumulating() {
        let now = Instant::now();
        let mut progress = LoadProgress::new(2);
        progress.report("mesh", 30.0, now);
        progress.report("mesh", 60.0, now);
        assert!((progress.overall() - 30.0).abs() < 1e-4);
    }
}
