//! Scene Graph Module
//!
//! Manages the scene hierarchy and its components:
//! - [`Node`]: scene node (parent/child relationships and a transform)
//! - [`Transform`]: position, rotation, scale with cached matrices
//! - [`Scene`]: scene container with component pools
//! - [`Camera`]: perspective camera component
//! - [`Light`]: hemisphere and directional light components
//! - [`Skeleton`]: joint palette for skinned meshes

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use mesh::{ImageData, Material, Mesh, Primitive};
pub use node::Node;
pub use scene::Scene;
pub use skeleton::Skeleton;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct CameraKey;
    pub struct LightKey;
    pub struct SkeletonKey;
}
