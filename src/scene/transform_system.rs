//! Hierarchy transform propagation.
//!
//! Walks the node tree from the roots, refreshing local matrices (dirty
//! checked) and composing world matrices parent-down. A parent whose local
//! matrix changed forces the whole subtree to recompose.

use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::NodeHandle;
use glam::Affine3A;

/// Updates world matrices for every node reachable from `roots`.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    for &root in roots {
        update_recursive(nodes, root, Affine3A::IDENTITY, false);
    }
}

fn update_recursive(
    nodes: &mut SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    parent_world: Affine3A,
    parent_changed: bool,
) {
    let (world, changed, children) = {
        let Some(node) = nodes.get_mut(handle) else {
            return;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;
        if changed {
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);
        }
        (
            node.transform.world_matrix,
            changed,
            node.children.clone(),
        )
    };

    for child in children {
        update_recursive(nodes, child, world, changed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn child_world_composes_parent_translation() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new();
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new();
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes
            .get_mut(parent_handle)
            .unwrap()
            .children
            .push(child_handle);

        update_hierarchy(&mut nodes, &[parent_handle]);

        let child_world = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world.x - 1.0).abs() < 1e-5);
        assert!((child_world.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn moving_parent_updates_child() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let parent_handle = nodes.insert(Node::new());
        let mut child = Node::new();
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);
        nodes
            .get_mut(parent_handle)
            .unwrap()
            .children
            .push(child_handle);

        update_hierarchy(&mut nodes, &[parent_handle]);

        nodes.get_mut(parent_handle).unwrap().transform.position = Vec3::new(0.0, -50.0, 0.0);
        update_hierarchy(&mut nodes, &[parent_handle]);

        let child_world = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world.y + 50.0).abs() < 1e-5);
    }
}
