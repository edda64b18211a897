use glam::Vec3;

use crate::scene::NodeHandle;

/// Directional lights shine from their node's position towards an optional
/// target node (straight down when the target coincides with the position).
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub target: Option<NodeHandle>,
}

/// Hemisphere lights blend a sky color above with a ground color below,
/// independent of position.
#[derive(Debug, Clone)]
pub struct HemisphereLight {
    pub ground_color: Vec3,
}

#[derive(Debug, Clone)]
pub enum LightKind {
    Directional(DirectionalLight),
    Hemisphere(HemisphereLight),
}

#[derive(Debug, Clone)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional(DirectionalLight { target: None }),
        }
    }

    #[must_use]
    pub fn new_hemisphere(sky_color: Vec3, ground_color: Vec3, intensity: f32) -> Self {
        Self {
            color: sky_color,
            intensity,
            kind: LightKind::Hemisphere(HemisphereLight { ground_color }),
        }
    }

    /// Points a directional light at the given node. No-op for other kinds.
    pub fn set_target(&mut self, target: NodeHandle) {
        if let LightKind::Directional(ref mut dir) = self.kind {
            dir.target = Some(target);
        }
    }
}
