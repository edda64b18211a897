//! Viewer session state.
//!
//! One [`Viewer`] owns everything the application mutates over its lifetime:
//! the scene graph, the progress tracker, the loader, the animation mixer and
//! the orbit controls. It is constructed once and lives for the whole
//! session; there is no teardown path.

use std::time::Instant;

use glam::Vec3;

use crate::animation::mixer::CROSSFADE_SECONDS;
use crate::animation::{bind_clip, AnimationMixer};
use crate::app::input::Input;
use crate::assets::CharacterAsset;
use crate::errors::Result;
use crate::loading::{AssetLoader, LoadEvent, LoadProgress, CLIP_IDS, IDLE_ID, TOTAL_ASSETS};
use crate::render::Renderer;
use crate::scene::{Camera, Light, Node, NodeHandle, Scene};
use crate::utils::OrbitControls;

const CAMERA_FOV_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_DISTANCE: f32 = 100.0;
const CHARACTER_Y_OFFSET: f32 = -50.0;

pub struct Viewer {
    pub scene: Scene,
    pub camera_node: NodeHandle,
    pub controls: OrbitControls,
    pub progress: LoadProgress,
    pub loader: AssetLoader,

    pub mixer: Option<AnimationMixer>,
    pub character_root: Option<NodeHandle>,
    pub started: bool,

    directional_lights: Vec<NodeHandle>,
}

impl Viewer {
    /// Builds the static part of the scene: camera, lighting rig and orbit
    /// controls. The character arrives later through the loader.
    pub fn new() -> Result<Self> {
        let mut scene = Scene::new();

        let camera = Camera::new_perspective(CAMERA_FOV_DEGREES, 16.0 / 9.0, CAMERA_NEAR, CAMERA_FAR);
        let camera_node = scene.add_camera(camera);
        if let Some(node) = scene.get_node_mut(camera_node) {
            node.transform.position = Vec3::new(0.0, 0.0, CAMERA_DISTANCE);
        }
        scene.active_camera = Some(camera_node);

        // Soft blue-white fill from above, black below
        scene.add_light(Light::new_hemisphere(
            Vec3::new(0.867, 0.933, 1.0),
            Vec3::ZERO,
            0.25,
        ));

        let mut directional_lights = Vec::with_capacity(3);
        for position in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(100.0, -50.0, 0.0),
            Vec3::new(-100.0, -50.0, 0.0),
        ] {
            let handle = scene.add_light(Light::new_directional(Vec3::ONE, 1.0));
            if let Some(node) = scene.get_node_mut(handle) {
                node.transform.position = position;
            }
            directional_lights.push(handle);
        }

        let mut controls = OrbitControls::new(Vec3::ZERO, CAMERA_DISTANCE);
        controls.enable_zoom = false;

        Ok(Self {
            scene,
            camera_node,
            controls,
            progress: LoadProgress::new(TOTAL_ASSETS),
            loader: AssetLoader::new()?,
            mixer: None,
            character_root: None,
            started: false,
            directional_lights,
        })
    }

    /// Kicks off the character load. Clip loads follow once the character is
    /// bound.
    pub fn begin_loading(&self) {
        self.loader.begin_character_load();
    }

    /// Drains loader events, wiring results into the scene and renderer.
    pub fn handle_load_events(&mut self, renderer: &mut Renderer) {
        for event in self.loader.poll() {
            match event {
                LoadEvent::Progress { id, percent } => {
                    self.progress.report(id, percent, Instant::now());
                }
                LoadEvent::Character(asset) => {
                    self.bind_character(&asset);
                    renderer.upload_character(&self.scene);
                    self.loader.begin_clip_loads();
                }
                LoadEvent::Clip { id, clip } => {
                    let (Some(mixer), Some(root)) = (&mut self.mixer, self.character_root) else {
                        log::warn!("Clip '{id}' arrived before the character, dropping");
                        continue;
                    };
                    let bindings = bind_clip(&self.scene, root, &clip);
                    log::debug!("Clip '{id}': {} of {} tracks bound", bindings.len(), clip.tracks.len());
                    mixer.add_clip(clip.into(), bindings);
                    if id == IDLE_ID {
                        mixer.play(IDLE_ID);
                    }
                }
                LoadEvent::Photo(image) => renderer.set_photo(&image),
            }
        }
    }

    /// Builds the character subtree, points the directional lights at it and
    /// prepares the animation mixer.
    fn bind_character(&mut self, asset: &CharacterAsset) {
        let mut root_node = Node::named("alien");
        root_node.transform.position.y = CHARACTER_Y_OFFSET;
        let root = self.scene.add_node(root_node);

        let mesh_keys: Vec<_> = asset
            .meshes
            .iter()
            .map(|mesh| self.scene.meshes.insert(mesh.clone()))
            .collect();

        // Nodes first, so skins and the hierarchy can refer to them by index
        let handles: Vec<NodeHandle> = asset
            .nodes
            .iter()
            .map(|desc| {
                let mut node = Node::named(desc.name.clone());
                node.transform.position = desc.translation;
                node.transform.rotation = desc.rotation;
                node.transform.scale = desc.scale;
                node.mesh = desc.mesh.map(|i| mesh_keys[i]);
                self.scene.insert_detached(node)
            })
            .collect();

        let skin_keys: Vec<_> = asset
            .skins
            .iter()
            .map(|skin| {
                let bones = skin.joints.iter().map(|&i| handles[i]).collect();
                self.scene.skins.insert(crate::scene::Skeleton::new(
                    &skin.name,
                    bones,
                    skin.inverse_bind_matrices.clone(),
                ))
            })
            .collect();

        for (desc, &handle) in asset.nodes.iter().zip(&handles) {
            if let Some(skin_index) = desc.skin
                && let Some(node) = self.scene.get_node_mut(handle)
            {
                node.skin = Some(skin_keys[skin_index]);
            }
            for &child in &desc.children {
                self.scene.attach(handle, handles[child]);
            }
        }
        for &root_index in &asset.roots {
            self.scene.attach(root, handles[root_index]);
        }

        for &handle in &self.directional_lights {
            let key = self.scene.get_node(handle).and_then(|node| node.light);
            if let Some(key) = key
                && let Some(light) = self.scene.lights.get_mut(key)
            {
                light.set_target(root);
            }
        }

        self.scene.update();
        self.mixer = Some(AnimationMixer::new());
        self.character_root = Some(root);
        log::info!("Character bound: {} nodes", asset.nodes.len());
    }

    /// Fires the delayed start trigger. Returns `true` on the single
    /// transition into the running state.
    pub fn try_start(&mut self, now: Instant) -> bool {
        if !self.started && self.progress.take_start(now) {
            self.started = true;
            log::info!("Scene start");
            return true;
        }
        false
    }

    /// Per-frame simulation step: animations, camera controls and scene
    /// maintenance.
    pub fn update(&mut self, dt: f32, input: &Input) {
        if let Some(mixer) = &mut self.mixer {
            mixer.update(dt, &mut self.scene);
        }

        let fov = self
            .scene
            .active_camera_component()
            .map_or(CAMERA_FOV_DEGREES, |c| c.fov.to_degrees());
        if let Some(node) = self.scene.get_node_mut(self.camera_node) {
            self.controls.update(&mut node.transform, input, fov, dt);
        }

        self.scene.update();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if let Some(camera) = self.scene.active_camera_component_mut() {
            camera.set_aspect(aspect);
        }
    }

    /// Advances to the next animation in the fixed clip order, wrapping from
    /// the last identifier to the first. Identifiers whose clip failed to
    /// load are skipped.
    pub fn next_animation(&mut self) {
        let Some(mixer) = &mut self.mixer else {
            return;
        };
        let Some(current) = mixer.current_name() else {
            return;
        };

        let start = CLIP_IDS.iter().position(|&id| id == current).unwrap_or(0);
        for offset in 1..=CLIP_IDS.len() {
            let id = CLIP_IDS[(start + offset) % CLIP_IDS.len()];
            if mixer.has_clip(id) {
                mixer.crossfade_to(id, CROSSFADE_SECONDS, true);
                return;
            }
            log::debug!("Clip '{id}' not loaded, skipping");
        }
    }
}
