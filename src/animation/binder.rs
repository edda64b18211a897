use crate::animation::clip::{AnimationClip, TargetPath};
use crate::scene::{NodeHandle, Scene};

/// Resolved binding: track `track_index` of a clip drives `node`'s `path`.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeHandle,
    pub path: TargetPath,
}

/// Resolves a clip's tracks against the subtree under `root` by node name.
///
/// Tracks whose target node is missing from the hierarchy are silently
/// skipped; clips recorded against a richer rig than the loaded character
/// simply drive the bones both have.
#[must_use]
pub fn bind_clip(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
    let mut bindings = Vec::with_capacity(clip.tracks.len());

    for (track_index, track) in clip.tracks.iter().enumerate() {
        if let Some(node) = scene.find_node_by_name(root, &track.target_node) {
            bindings.push(PropertyBinding {
                track_index,
                node,
                path: track.path,
            });
        }
    }

    bindings
}
