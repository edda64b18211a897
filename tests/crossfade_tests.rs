//! Crossfade Protocol Tests
//!
//! Tests for:
//! - AnimationMixer weighted blending during a fade
//! - Fade endpoints (outgoing disabled, incoming at full weight)
//! - Timeline warping between clips of different lengths
//! - No-op crossfade onto the already-active clip
//! - "Next animation" cycling order and wrap-around

use std::sync::Arc;

use glam::Vec3;

use vitrine::animation::clip::{AnimationClip, TargetPath, Track, TrackData};
use vitrine::animation::mixer::CROSSFADE_SECONDS;
use vitrine::animation::tracks::{InterpolationMode, KeyframeTrack};
use vitrine::animation::{bind_clip, AnimationMixer};
use vitrine::loading::CLIP_IDS;
use vitrine::scene::{Node, NodeHandle, Scene};
use vitrine::viewer::Viewer;

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// A clip holding the "Hips" node at a constant x translation.
fn constant_clip(name: &str, x: f32, duration: f32) -> AnimationClip {
    let track = Track {
        target_node: "Hips".to_string(),
        path: TargetPath::Translation,
        data: TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, duration],
            vec![Vec3::new(x, 0.0, 0.0), Vec3::new(x, 0.0, 0.0)],
            InterpolationMode::Linear,
        )),
    };
    AnimationClip::new(name.to_string(), vec![track])
}

/// Scene with a root and a "Hips" child, plus a mixer with the given clips.
fn rigged_scene(clips: &[AnimationClip]) -> (Scene, NodeHandle, AnimationMixer) {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let hips = scene.insert_detached(Node::named("Hips"));
    scene.attach(root, hips);

    let mut mixer = AnimationMixer::new();
    for clip in clips {
        let clip = Arc::new(clip.clone());
        let bindings = bind_clip(&scene, root, &clip);
        assert_eq!(bindings.len(), 1, "expected the Hips track to bind");
        mixer.add_clip(clip, bindings);
    }
    (scene, hips, mixer)
}

fn hips_x(scene: &Scene, hips: NodeHandle) -> f32 {
    scene.get_node(hips).unwrap().transform.position.x
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn single_action_drives_pose() {
    let (mut scene, hips, mut mixer) = rigged_scene(&[constant_clip("idle", 0.0, 1.0)]);
    assert!(mixer.play("idle"));
    mixer.update(0.016, &mut scene);
    assert!(approx(hips_x(&scene, hips), 0.0));
}

#[test]
fn mid_fade_blends_both_clips() {
    let (mut scene, hips, mut mixer) = rigged_scene(&[
        constant_clip("idle", 0.0, 1.0),
        constant_clip("walking", 10.0, 1.0),
    ]);
    mixer.play("idle");
    mixer.update(0.016, &mut scene);

    assert!(mixer.crossfade_to("walking", CROSSFADE_SECONDS, true));
    // Advance exactly to the middle of the blend window
    mixer.update(CROSSFADE_SECONDS / 2.0, &mut scene);

    let x = hips_x(&scene, hips);
    assert!(approx(x, 5.0), "expected halfway blend, got {x}");
}

#[test]
fn fade_completion_leaves_only_incoming() {
    let (mut scene, hips, mut mixer) = rigged_scene(&[
        constant_clip("idle", 0.0, 1.0),
        constant_clip("walking", 10.0, 1.0),
    ]);
    mixer.play("idle");
    mixer.update(0.016, &mut scene);

    mixer.crossfade_to("walking", CROSSFADE_SECONDS, true);
    mixer.update(CROSSFADE_SECONDS + 0.01, &mut scene);

    assert!(approx(hips_x(&scene, hips), 10.0));

    let idle = mixer.action("idle").unwrap();
    assert!(!idle.enabled, "outgoing action should be disabled");
    assert!(approx(idle.effective_weight(), 0.0));

    let walking = mixer.action("walking").unwrap();
    assert!(walking.enabled);
    assert!(approx(walking.effective_weight(), 1.0));
    assert!(approx(walking.effective_time_scale(), 1.0));
}

// ============================================================================
// Crossfade protocol
// ============================================================================

#[test]
fn crossfade_to_active_clip_is_noop() {
    let (mut scene, _hips, mut mixer) = rigged_scene(&[
        constant_clip("idle", 0.0, 1.0),
        constant_clip("walking", 10.0, 1.0),
    ]);
    mixer.play("idle");
    mixer.update(0.016, &mut scene);

    assert!(mixer.crossfade_to("idle", CROSSFADE_SECONDS, true));

    let idle = mixer.action("idle").unwrap();
    assert!(!idle.is_fading(), "no blend may be scheduled");
    assert!(approx(idle.effective_weight(), 1.0));
    assert_eq!(mixer.current_name(), Some("idle"));
}

#[test]
fn crossfade_to_unknown_clip_is_rejected() {
    let (_scene, _hips, mut mixer) = rigged_scene(&[constant_clip("idle", 0.0, 1.0)]);
    mixer.play("idle");
    assert!(!mixer.crossfade_to("missing", CROSSFADE_SECONDS, true));
    assert_eq!(mixer.current_name(), Some("idle"));
}

#[test]
fn warp_ramps_outgoing_time_scale_to_duration_ratio() {
    // Outgoing clip is twice as long as the incoming one
    let (mut scene, _hips, mut mixer) = rigged_scene(&[
        constant_clip("idle", 0.0, 2.0),
        constant_clip("walking", 10.0, 1.0),
    ]);
    mixer.play("idle");
    mixer.update(0.016, &mut scene);

    mixer.crossfade_to("walking", CROSSFADE_SECONDS, true);

    // Half way through the blend both time scales sit between their endpoints
    mixer.update(CROSSFADE_SECONDS / 2.0, &mut scene);
    let idle_ts = mixer.action("idle").unwrap().effective_time_scale();
    let walking_ts = mixer.action("walking").unwrap().effective_time_scale();
    assert!(approx(idle_ts, 1.5), "outgoing warps 1 -> 2, got {idle_ts}");
    assert!(approx(walking_ts, 0.75), "incoming warps 0.5 -> 1, got {walking_ts}");

    // After the blend the incoming clip runs at normal speed again
    mixer.update(CROSSFADE_SECONDS, &mut scene);
    assert!(approx(
        mixer.action("walking").unwrap().effective_time_scale(),
        1.0
    ));
}

#[test]
fn crossfade_enables_and_loops_incoming() {
    let (mut scene, _hips, mut mixer) = rigged_scene(&[
        constant_clip("idle", 0.0, 1.0),
        constant_clip("walking", 10.0, 1.0),
    ]);
    mixer.play("idle");
    mixer.update(0.016, &mut scene);

    mixer.crossfade_to("walking", CROSSFADE_SECONDS, true);
    let walking = mixer.action("walking").unwrap();
    assert!(walking.enabled);
    assert!(!walking.paused);
    assert_eq!(mixer.current_name(), Some("walking"));
}

// ============================================================================
// Cycling
// ============================================================================

fn viewer_with_clips(loaded: &[&str]) -> Viewer {
    let mut viewer = Viewer::new().expect("viewer construction");
    let root = viewer.scene.add_node(Node::named("root"));
    let hips = viewer.scene.insert_detached(Node::named("Hips"));
    viewer.scene.attach(root, hips);

    let mut mixer = AnimationMixer::new();
    for &id in loaded {
        let clip = Arc::new(constant_clip(id, 1.0, 1.0));
        let bindings = bind_clip(&viewer.scene, root, &clip);
        mixer.add_clip(clip, bindings);
    }
    mixer.play("idle");
    viewer.mixer = Some(mixer);
    viewer
}

#[test]
fn next_animation_follows_fixed_order() {
    let mut viewer = viewer_with_clips(&CLIP_IDS);
    // idle is at index 6; the successor in the fixed list is shakeFist
    viewer.next_animation();
    assert_eq!(
        viewer.mixer.as_ref().unwrap().current_name(),
        Some("shakeFist")
    );
    viewer.next_animation();
    assert_eq!(
        viewer.mixer.as_ref().unwrap().current_name(),
        Some("surprised")
    );
}

#[test]
fn next_animation_wraps_from_last_to_first() {
    let mut viewer = viewer_with_clips(&CLIP_IDS);
    let mixer = viewer.mixer.as_mut().unwrap();
    mixer.crossfade_to("walking", CROSSFADE_SECONDS, true);

    viewer.next_animation();
    assert_eq!(
        viewer.mixer.as_ref().unwrap().current_name(),
        Some("agreeing")
    );
}

#[test]
fn next_animation_skips_missing_clips() {
    let mut viewer = viewer_with_clips(&["idle", "walking"]);
    viewer.next_animation();
    // Everything between idle and walking failed to load and is skipped
    assert_eq!(
        viewer.mixer.as_ref().unwrap().current_name(),
        Some("walking")
    );
    viewer.next_animation();
    assert_eq!(viewer.mixer.as_ref().unwrap().current_name(), Some("idle"));
}
