use glam::{Quat, Vec3};

use crate::locomotion::{PlayerController, TickOutput};
use crate::stats::StatType;

/// A locally controlled player; `slot` indexes the input router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub slot: usize,
}

/// The player's locomotion controller.
pub struct Controller(pub PlayerController);

/// Pose of the visual mesh, written after every locomotion tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshPose {
    pub rotation: Quat,
    /// Mesh position relative to the body.
    pub offset: Vec3,
}

impl Default for MeshPose {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            offset: Vec3::ZERO,
        }
    }
}

/// Output of the player's most recent locomotion tick.
pub struct LastTick(pub Option<TickOutput>);

/// Stat pickup collected by the closest player inside `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub stat_type: StatType,
    pub radius: f32,
}
