//! Axis-aligned collision volumes for the runner and barriers.

use glam::Vec3;

/// Depth at which the runner sits in world space. Barriers scroll toward
/// this plane and collisions are only possible near it.
pub const PLAYER_Z: f32 = -5.0;

const PLAYER_HALF: Vec3 = Vec3::new(0.165, 0.15, 0.15);
const BARRIER_HALF: Vec3 = Vec3::new(0.37, 0.16, 0.1);

/// Axis-aligned bounding box described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
            && (self.center.z - other.center.z).abs() <= self.half.z + other.half.z
    }
}

/// Collider for the runner at horizontal position `x` raised by `height`
/// above the ground plane.
pub fn player_collider(x: f32, height: f32) -> Aabb {
    Aabb {
        center: Vec3::new(x, PLAYER_HALF.y + height, PLAYER_Z),
        half: PLAYER_HALF,
    }
}

/// Collider for a barrier at horizontal position `x` and depth `z`.
pub fn barrier_collider(x: f32, z: f32) -> Aabb {
    Aabb {
        center: Vec3::new(x, BARRIER_HALF.y, z),
        half: BARRIER_HALF,
    }
}
