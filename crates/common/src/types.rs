use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tree in the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(pub Uuid);

impl TreeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from a raw 128-bit value (used for deterministic scattering).
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// First 8 hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_owned()
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A choppable tree. Existing in the forest is what makes it alive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    id: TreeId,
    position: Vec3,
}

impl Tree {
    pub fn new(id: TreeId, position: Vec3) -> Self {
        Self { id, position }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

/// Project a vector onto the horizontal (XZ) plane.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points ignoring the vertical axis.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(a - b).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_id_uniqueness() {
        let a = TreeId::new();
        let b = TreeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn short_id_is_eight_chars() {
        let id = TreeId::from_u128(0xdead_beef_0000_0000_0000_0000_0000_0001);
        assert_eq!(id.short(), "deadbeef");
    }

    #[test]
    fn horizontal_drops_height() {
        assert_eq!(horizontal(Vec3::new(1.0, 7.0, -2.0)), Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn horizontal_distance_ignores_y() {
        let a = Vec3::new(0.0, 2.5, 0.0);
        let b = Vec3::new(3.0, 3.0, 4.0);
        assert!((horizontal_distance(a, b) - 5.0).abs() < 1e-6);
    }
}
