//! Progress Tracker Tests
//!
//! Tests for:
//! - Overall percentage derivation (sum of latest values / fixed total)
//! - Overwrite-on-re-report semantics
//! - The one-second delayed, fire-exactly-once start trigger

use std::time::{Duration, Instant};

use vitrine::loading::progress::{LoadProgress, START_DELAY};
use vitrine::loading::{CLIP_IDS, TOTAL_ASSETS};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[test]
fn total_asset_count_is_clips_plus_mesh() {
    assert_eq!(TOTAL_ASSETS, 12);
    assert_eq!(CLIP_IDS.len(), 11);
}

#[test]
fn overall_is_sum_over_fixed_denominator() {
    let now = Instant::now();
    let mut progress = LoadProgress::new(TOTAL_ASSETS);

    progress.report("alien", 50.0, now);
    for &id in &CLIP_IDS[..5] {
        progress.report(id, 100.0, now);
    }

    // (50 + 5 * 100) / 12 ≈ 45.8, floored for display
    assert!(approx(progress.overall(), 550.0 / 12.0));
    assert_eq!(progress.display_percent(), 45);
    assert!(!progress.is_complete());
}

#[test]
fn re_report_overwrites_not_accumulates() {
    let now = Instant::now();
    let mut progress = LoadProgress::new(TOTAL_ASSETS);

    progress.report("alien", 40.0, now);
    progress.report("alien", 80.0, now);
    progress.report("alien", 60.0, now);

    assert!(approx(progress.overall(), 60.0 / 12.0));
}

#[test]
fn out_of_range_reports_are_clamped() {
    let now = Instant::now();
    let mut progress = LoadProgress::new(1);
    progress.report("alien", 150.0, now);
    assert!(approx(progress.overall(), 100.0));
    progress.report("alien", -10.0, now);
    assert!(approx(progress.overall(), 0.0));
}

#[test]
fn completion_requires_every_asset() {
    let now = Instant::now();
    let mut progress = LoadProgress::new(TOTAL_ASSETS);

    progress.report("alien", 100.0, now);
    for &id in &CLIP_IDS[..10] {
        progress.report(id, 100.0, now);
    }
    // One clip missing: 11/12 assets at 100%
    assert!(!progress.is_complete());

    progress.report("walking", 100.0, now);
    assert!(progress.is_complete());
}

#[test]
fn start_fires_once_after_the_delay() {
    let t0 = Instant::now();
    let mut progress = LoadProgress::new(TOTAL_ASSETS);

    progress.report("alien", 100.0, t0);
    for id in CLIP_IDS {
        progress.report(id, 100.0, t0);
    }
    assert!(progress.is_complete());

    // Not yet: the delay has not elapsed
    assert!(!progress.take_start(t0));
    assert!(!progress.take_start(t0 + START_DELAY / 2));

    // Fires exactly once
    assert!(progress.take_start(t0 + START_DELAY));
    assert!(!progress.take_start(t0 + START_DELAY));
    assert!(!progress.take_start(t0 + START_DELAY * 10));
}

#[test]
fn late_reports_do_not_rearm_the_trigger() {
    let t0 = Instant::now();
    let mut progress = LoadProgress::new(2);

    progress.report("alien", 100.0, t0);
    progress.report("idle", 100.0, t0);
    assert!(progress.take_start(t0 + START_DELAY));

    // Stray progress callbacks after the start must not re-trigger
    progress.report("idle", 100.0, t0 + START_DELAY + Duration::from_secs(5));
    assert!(!progress.take_start(t0 + START_DELAY * 20));
}

#[test]
fn completion_timestamp_is_first_crossing() {
    let t0 = Instant::now();
    let t1 = t0 + Duration::from_millis(500);
    let mut progress = LoadProgress::new(2);

    progress.report("alien", 100.0, t0);
    progress.report("idle", 100.0, t1);

    // Completion happened at t1; the delay counts from there
    assert!(!progress.take_start(t1 + START_DELAY / 2));
    assert!(progress.take_start(t1 + START_DELAY));
}

#[test]
fn missing_mesh_blocks_completion_forever() {
    let now = Instant::now();
    let mut progress = LoadProgress::new(TOTAL_ASSETS);

    // Every clip finished, the mesh never reports
    for id in CLIP_IDS {
        progress.report(id, 100.0, now);
    }
    assert!(approx(progress.overall(), 1100.0 / 12.0));
    assert!(!progress.is_complete());
    assert!(!progress.take_start(now + START_DELAY * 100));
}
