mod breakable;
mod character;
mod physics;

pub use breakable::*;
pub use character::*;
pub use physics::*;

use glam::{Quat, Vec3};

/// World-space position and rotation. The demo has no transform hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}
