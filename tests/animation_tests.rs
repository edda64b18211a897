//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation and end clamping
//! - KeyframeCursor sequential scan vs binary search fallback
//! - AnimationAction loop modes (Once, Repeat, PingPong)
//! - AnimationClip duration auto-computation

use std::sync::Arc;

use glam::{Quat, Vec3};

use vitrine::animation::action::{AnimationAction, LoopMode};
use vitrine::animation::clip::{AnimationClip, TargetPath, Track, TrackData};
use vitrine::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn translation_track(times: Vec<f32>, xs: Vec<f32>) -> Track {
    let values = xs.into_iter().map(|x| Vec3::new(x, 0.0, 0.0)).collect();
    Track {
        target_node: "Hips".to_string(),
        path: TargetPath::Translation,
        data: TrackData::Vector3(KeyframeTrack::new(times, values, InterpolationMode::Linear)),
    }
}

// ============================================================================
// KeyframeTrack: Linear Interpolation
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 10.0],
        InterpolationMode::Linear,
    );
    assert!(approx(track.sample(0.5), 5.0));
}

#[test]
fn track_linear_f32_exact_keyframes() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 10.0, 20.0],
        InterpolationMode::Linear,
    );
    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.0, &mut cursor), 0.0));
    assert!(approx(track.sample_with_cursor(1.0, &mut cursor), 10.0));
    assert!(approx(track.sample_with_cursor(2.0, &mut cursor), 20.0));
}

#[test]
fn track_clamps_beyond_both_ends() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![10.0_f32, 20.0],
        InterpolationMode::Linear,
    );
    assert!(approx(track.sample(0.5), 10.0));
    assert!(approx(track.sample(5.0), 20.0));
}

#[test]
fn track_single_keyframe_is_constant() {
    let track = KeyframeTrack::new(vec![0.0], vec![7.0_f32], InterpolationMode::Linear);
    assert!(approx(track.sample(0.0), 7.0));
    assert!(approx(track.sample(100.0), 7.0));
}

// ============================================================================
// KeyframeTrack: Step Interpolation
// ============================================================================

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    );
    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.5, &mut cursor), 0.0));
    assert!(approx(track.sample_with_cursor(0.99, &mut cursor), 0.0));
    assert!(approx(track.sample_with_cursor(1.0, &mut cursor), 100.0));
    assert!(approx(track.sample_with_cursor(1.5, &mut cursor), 100.0));
}

// ============================================================================
// KeyframeTrack: Cursor Behavior
// ============================================================================

#[test]
fn cursor_sequential_matches_cold_sampling() {
    let times: Vec<f32> = (0..100).map(|i| i as f32 * 0.1).collect();
    let values: Vec<f32> = (0..100).map(|i| i as f32).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    let mut t = 0.0;
    while t < 9.9 {
        let warm = track.sample_with_cursor(t, &mut cursor);
        let cold = track.sample(t);
        assert!(approx(warm, cold), "mismatch at t={t}: {warm} vs {cold}");
        t += 0.033;
    }
}

#[test]
fn cursor_survives_loop_reset() {
    let times: Vec<f32> = (0..50).map(|i| i as f32 * 0.1).collect();
    let values: Vec<f32> = (0..50).map(|i| i as f32).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    // Play to near the end, then jump back to the start (loop wrap)
    track.sample_with_cursor(4.8, &mut cursor);
    let after_reset = track.sample_with_cursor(0.05, &mut cursor);
    assert!(approx(after_reset, track.sample(0.05)));
}

// ============================================================================
// KeyframeTrack: Cubic Spline
// ============================================================================

#[test]
fn track_cubic_hits_keyframe_values() {
    // Two keyframes with zero tangents: endpoints must match exactly
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 5.0, 0.0],
        InterpolationMode::CubicSpline,
    );
    assert!(approx(track.sample(0.0), 0.0));
    assert!(approx(track.sample(1.0), 5.0));
    // Zero tangents make the midpoint the smoothstep of the endpoints
    assert!(approx(track.sample(0.5), 2.5));
}

#[test]
fn quat_linear_interpolation_normalized() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ],
        InterpolationMode::Linear,
    );
    let q = track.sample(0.5);
    assert!(approx(q.length(), 1.0));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_longest_track() {
    let clip = AnimationClip::new(
        "walking".to_string(),
        vec![
            translation_track(vec![0.0, 1.0], vec![0.0, 1.0]),
            translation_track(vec![0.0, 2.5], vec![0.0, 1.0]),
        ],
    );
    assert!(approx(clip.duration, 2.5));
}

// ============================================================================
// AnimationAction: Loop Modes
// ============================================================================

fn looping_action(duration: f32, loop_mode: LoopMode) -> AnimationAction {
    let clip = AnimationClip::new(
        "clip".to_string(),
        vec![translation_track(vec![0.0, duration], vec![0.0, 1.0])],
    );
    let mut action = AnimationAction::new(Arc::new(clip));
    action.loop_mode = loop_mode;
    action
}

#[test]
fn action_repeat_wraps_time() {
    let mut action = looping_action(1.0, LoopMode::Repeat);
    action.advance(2.3);
    assert!(approx(action.time, 0.3), "got {}", action.time);
    assert!(!action.paused);
}

#[test]
fn action_once_clamps_and_pauses() {
    let mut action = looping_action(1.0, LoopMode::Once);
    action.advance(1.5);
    assert!(approx(action.time, 1.0));
    assert!(action.paused);
}

#[test]
fn action_ping_pong_reverses() {
    let mut action = looping_action(1.0, LoopMode::PingPong);
    action.advance(1.25);
    assert!(approx(action.time, 0.75), "got {}", action.time);
}

#[test]
fn action_time_scale_speeds_up_playback() {
    let mut action = looping_action(10.0, LoopMode::Repeat);
    action.set_effective_time_scale(2.0);
    action.advance(1.0);
    assert!(approx(action.time, 2.0));
}

#[test]
fn paused_action_does_not_advance() {
    let mut action = looping_action(1.0, LoopMode::Repeat);
    action.paused = true;
    action.advance(0.5);
    assert!(approx(action.time, 0.0));
}
