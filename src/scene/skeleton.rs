use glam::{Affine3A, Mat4};
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::NodeHandle;

/// Joint palette for a skinned mesh.
///
/// `bones[i]` corresponds to `joints[i]` in the shader. The inverse bind
/// matrices are static after load; [`update_palette`](Skeleton::update_palette)
/// recomputes the joint matrices each frame from the bone world transforms.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,
    pub bones: Vec<NodeHandle>,
    inverse_bind_matrices: Vec<Mat4>,
    joint_matrices: Vec<Mat4>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<NodeHandle>, inverse_bind_matrices: Vec<Mat4>) -> Self {
        let count = bones.len();
        Self {
            name: name.to_string(),
            bones,
            inverse_bind_matrices,
            joint_matrices: vec![Mat4::IDENTITY; count],
        }
    }

    /// Recomputes joint matrices relative to the skinned mesh node.
    ///
    /// `mesh_world` is the world transform of the node carrying the skinned
    /// mesh; the palette maps mesh-space vertices through each bone:
    /// `inverse(mesh_world) * bone_world * inverse_bind`.
    pub fn update_palette(&mut self, nodes: &SlotMap<NodeHandle, Node>, mesh_world: &Affine3A) {
        let mesh_world_inv = mesh_world.inverse();
        for (i, &bone) in self.bones.iter().enumerate() {
            let Some(bone_node) = nodes.get(bone) else {
                continue;
            };
            let bone_world = bone_node.transform.world_matrix;
            self.joint_matrices[i] =
                Mat4::from(mesh_world_inv * bone_world) * self.inverse_bind_matrices[i];
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.bones.len()
    }
}
