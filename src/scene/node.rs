use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{CameraKey, LightKey, MeshKey, NodeHandle, SkeletonKey};

/// A scene node: hierarchy links, a transform, and optional component keys.
///
/// Heavy component data (meshes, cameras, lights, skeletons) lives in the
/// [`Scene`](crate::scene::Scene) component pools; nodes only carry the keys
/// that associate them.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    /// Node name, used for animation track binding.
    pub name: String,
    /// Transform component (hot data, touched every frame).
    pub transform: Transform,
    pub visible: bool,

    pub mesh: Option<MeshKey>,
    pub skin: Option<SkeletonKey>,
    pub camera: Option<CameraKey>,
    pub light: Option<LightKey>,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name: String::new(),
            transform: Transform::new(),
            visible: true,
            mesh: None,
            skin: None,
            camera: None,
            light: None,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let mut node = Self::new();
        node.name = name.into();
        node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix, updated by the hierarchy pass each frame.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
