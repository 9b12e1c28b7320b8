use glam::Vec3;
use hecs::Entity;

/// Linear velocity in world space, units per second.
pub struct Velocity(pub Vec3);

/// Collision shape attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    /// Infinite plane `normal · p = offset`; the entity transform is ignored.
    Plane { normal: Vec3, offset: f32 },
    /// Box oriented by the entity rotation.
    Box { half_extents: Vec3 },
}

/// Marker: entity is immovable and takes part in ground queries.
pub struct Static;

/// Layer bits matched against a query's layer mask. Statics without one are
/// on [`CollisionLayer::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    pub const DEFAULT: CollisionLayer = CollisionLayer(1);
    pub const TRACK: CollisionLayer = CollisionLayer(1 << 1);
}

/// Multiplier on world gravity for bodies that fall on their own.
pub struct GravityScale(pub f32);

/// Marker: the body is still falling and gravity applies to it.
pub struct Falling;

/// Contact between a dynamic sphere and a static collider, produced by the
/// physics step after push-out.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub entity: Entity,
    pub static_entity: Entity,
    /// Points away from the static surface.
    pub normal: Vec3,
    pub penetration_depth: f32,
}
