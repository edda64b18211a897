//! Orbit Controls Tests
//!
//! Tests for:
//! - Camera placement on the orbit sphere
//! - Zoom lock (`enable_zoom = false`)
//! - Look-at orientation towards the orbit center

use glam::{Vec2, Vec3};

use vitrine::app::input::Input;
use vitrine::scene::Transform;
use vitrine::utils::OrbitControls;

const EPSILON: f32 = 1e-3;

fn default_input() -> Input {
    let mut input = Input::new();
    input.handle_resize(1280, 720);
    input
}

#[test]
fn idle_update_places_camera_at_radius() {
    let mut controls = OrbitControls::new(Vec3::ZERO, 100.0);
    let mut transform = Transform::new();
    let input = default_input();

    controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);

    assert!((transform.position.length() - 100.0).abs() < EPSILON);
    // Default spherical angles put the camera on the +Z axis
    assert!((transform.position - Vec3::new(0.0, 0.0, 100.0)).length() < EPSILON);
}

#[test]
fn scroll_is_ignored_when_zoom_disabled() {
    let mut controls = OrbitControls::new(Vec3::ZERO, 100.0);
    controls.enable_zoom = false;
    let mut transform = Transform::new();

    let mut input = default_input();
    input.scroll_delta = Vec2::new(0.0, 5.0);
    controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);

    assert!((controls.radius - 100.0).abs() < EPSILON);
}

#[test]
fn scroll_zooms_when_enabled() {
    let mut controls = OrbitControls::new(Vec3::ZERO, 100.0);
    controls.enable_zoom = true;
    let mut transform = Transform::new();

    let mut input = default_input();
    input.scroll_delta = Vec2::new(0.0, 5.0);
    controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);

    assert!(controls.radius < 100.0);
}

#[test]
fn camera_faces_the_orbit_center() {
    let mut controls = OrbitControls::new(Vec3::new(0.0, 10.0, 0.0), 50.0);
    let mut transform = Transform::new();
    let input = default_input();

    controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);

    // Forward axis (-Z of the rotation) points from the camera to the center
    let forward = transform.rotation * Vec3::NEG_Z;
    let expected = (controls.center - transform.position).normalize();
    assert!((forward - expected).length() < EPSILON);
}
