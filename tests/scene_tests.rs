//! Scene Graph Tests
//!
//! Tests for:
//! - Hierarchy attach / world matrix composition
//! - Name-based node lookup (used by animation binding)
//! - Camera aspect updates on resize
//! - Skeleton joint palette computation

use glam::{Affine3A, Mat4, Vec3};

use vitrine::scene::{Camera, Node, Scene, Skeleton};

const EPSILON: f32 = 1e-4;

#[test]
fn attach_moves_node_out_of_roots() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::named("parent"));
    let child = scene.add_node(Node::named("child"));
    assert_eq!(scene.root_nodes.len(), 2);

    scene.attach(parent, child);
    assert_eq!(scene.root_nodes.len(), 1);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
}

#[test]
fn world_matrices_compose_down_the_tree() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let child = scene.insert_detached(Node::named("child"));
    scene.attach(root, child);

    scene.get_node_mut(root).unwrap().transform.position = Vec3::new(0.0, -50.0, 0.0);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(0.0, 1.0, 0.0);
    scene.update();

    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!((world.y + 49.0).abs() < EPSILON);
}

#[test]
fn find_node_by_name_searches_depth_first() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let hips = scene.insert_detached(Node::named("Hips"));
    let spine = scene.insert_detached(Node::named("Spine"));
    scene.attach(root, hips);
    scene.attach(hips, spine);

    assert_eq!(scene.find_node_by_name(root, "Spine"), Some(spine));
    assert_eq!(scene.find_node_by_name(root, "Hips"), Some(hips));
    assert_eq!(scene.find_node_by_name(root, "Tail"), None);
}

#[test]
fn camera_view_follows_node_transform() {
    let mut scene = Scene::new();
    let camera = Camera::new_perspective(75.0, 16.0 / 9.0, 0.1, 1000.0);
    let cam_node = scene.add_camera(camera);
    scene.active_camera = Some(cam_node);

    scene.get_node_mut(cam_node).unwrap().transform.position = Vec3::new(0.0, 0.0, 100.0);
    scene.update();

    let cam = scene.active_camera_component().unwrap();
    // A point at the origin lands in front of the camera, 100 units away
    let viewed = cam.view_projection() * Vec3::ZERO.extend(1.0);
    assert!(viewed.w > 0.0, "origin should be in front of the camera");
}

#[test]
fn skeleton_palette_is_identity_at_bind_pose() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let bone = scene.insert_detached(Node::named("Bone"));
    scene.attach(root, bone);
    scene.get_node_mut(bone).unwrap().transform.position = Vec3::new(0.0, 1.0, 0.0);
    scene.update();

    let bind_world = *scene.get_node(bone).unwrap().world_matrix();
    let ibm = Mat4::from(bind_world.inverse());
    let mut skeleton = Skeleton::new("skin", vec![bone], vec![ibm]);

    skeleton.update_palette(&scene.nodes, &Affine3A::IDENTITY);
    let palette = skeleton.joint_matrices()[0];
    assert!(palette.abs_diff_eq(Mat4::IDENTITY, EPSILON));
}

#[test]
fn skeleton_palette_tracks_bone_movement() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let bone = scene.insert_detached(Node::named("Bone"));
    scene.attach(root, bone);
    scene.update();

    let ibm = Mat4::IDENTITY;
    let mut skeleton = Skeleton::new("skin", vec![bone], vec![ibm]);

    scene.get_node_mut(bone).unwrap().transform.position = Vec3::new(2.0, 0.0, 0.0);
    scene.update();

    skeleton.update_palette(&scene.nodes, &Affine3A::IDENTITY);
    let moved = skeleton.joint_matrices()[0].transform_point3(Vec3::ZERO);
    assert!((moved - Vec3::new(2.0, 0.0, 0.0)).length() < EPSILON);
}

#[test]
fn scene_update_refreshes_skin_palettes() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::named("root"));
    let bone = scene.insert_detached(Node::named("Bone"));
    let skinned = scene.insert_detached(Node::named("SkinnedMesh"));
    scene.attach(root, bone);
    scene.attach(root, skinned);

    let skin_key = scene
        .skins
        .insert(Skeleton::new("skin", vec![bone], vec![Mat4::IDENTITY]));
    scene.get_node_mut(skinned).unwrap().skin = Some(skin_key);

    scene.get_node_mut(bone).unwrap().transform.position = Vec3::new(0.0, 3.0, 0.0);
    scene.update();

    let palette = scene.skins.get(skin_key).unwrap().joint_matrices()[0];
    let moved = palette.transform_point3(Vec3::ZERO);
    assert!((moved.y - 3.0).abs() < EPSILON);
}
