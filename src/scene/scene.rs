use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skeleton::Skeleton;
use crate::scene::transform_system;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle, SkeletonKey};

/// Scene container.
///
/// Pure data layer: a node arena forming the hierarchy, plus component pools
/// keyed from the nodes. Owned by the viewer session for the whole process
/// lifetime; nothing is ever torn down.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    // ==== Component pools ====
    pub meshes: SlotMap<MeshKey, Mesh>,
    pub cameras: SlotMap<CameraKey, Camera>,
    pub lights: SlotMap<LightKey, Light>,
    pub skins: SlotMap<SkeletonKey, Skeleton>,

    pub active_camera: Option<NodeHandle>,

    // Scratch list reused by the per-frame skeleton pass
    skin_scratch: Vec<(SkeletonKey, Affine3A)>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            cameras: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            skins: SlotMap::with_key(),
            active_camera: None,
            skin_scratch: Vec::new(),
        }
    }

    /// Inserts a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Inserts a node without attaching it anywhere. Use [`attach`](Self::attach)
    /// to place it in the hierarchy.
    pub fn insert_detached(&mut self, node: Node) -> NodeHandle {
        self.nodes.insert(node)
    }

    /// Makes `child` a child of `parent`, keeping both sides in sync.
    pub fn attach(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self.root_nodes.retain(|&h| h != child);
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Adds a camera component wrapped in a fresh root node.
    pub fn add_camera(&mut self, camera: Camera) -> NodeHandle {
        let key = self.cameras.insert(camera);
        let mut node = Node::named("Camera");
        node.camera = Some(key);
        self.add_node(node)
    }

    /// Adds a light component wrapped in a fresh root node.
    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let key = self.lights.insert(light);
        let mut node = Node::named("Light");
        node.light = Some(key);
        self.add_node(node)
    }

    /// Depth-first search for a node by name, starting at `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        for &child in &node.children {
            if let Some(found) = self.find_node_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Per-frame scene maintenance: world matrices, camera view matrices and
    /// skeleton joint palettes.
    pub fn update(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);

        for (_, node) in &self.nodes {
            if let Some(cam_key) = node.camera
                && let Some(camera) = self.cameras.get_mut(cam_key)
            {
                camera.update_view(&node.transform.world_matrix);
            }
        }

        self.skin_scratch.clear();
        for (_, node) in &self.nodes {
            if let Some(skin_key) = node.skin {
                self.skin_scratch.push((skin_key, node.transform.world_matrix));
            }
        }
        for &(skin_key, mesh_world) in &self.skin_scratch {
            if let Some(skeleton) = self.skins.get_mut(skin_key) {
                skeleton.update_palette(&self.nodes, &mesh_world);
            }
        }
    }

    /// The active camera component, if one is set.
    #[must_use]
    pub fn active_camera_component(&self) -> Option<&Camera> {
        let node = self.nodes.get(self.active_camera?)?;
        self.cameras.get(node.camera?)
    }

    pub fn active_camera_component_mut(&mut self) -> Option<&mut Camera> {
        let node = self.nodes.get(self.active_camera?)?;
        let key = node.camera?;
        self.cameras.get_mut(key)
    }

    /// Iterates lights together with their node world transforms.
    pub fn iter_lights(&self) -> impl Iterator<Item = (&Light, &Affine3A)> {
        self.nodes.iter().filter_map(|(_, node)| {
            let key = node.light?;
            let light = self.lights.get(key)?;
            Some((light, &node.transform.world_matrix))
        })
    }
}
