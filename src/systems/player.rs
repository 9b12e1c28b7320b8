use hecs::World;
use log::debug;

use crate::components::{Controller, LastTick, LocalTransform, MeshPose, Player, Velocity};
use crate::engine::input::InputRouter;

use super::raycast::StaticGeometry;

/// Advance every player's locomotion by one fixed tick.
///
/// Each player reads its own input snapshot, taken once here so it stays
/// stable for the whole tick. The returned velocity replaces the body's
/// velocity; on a transition tick the body keeps the one it had.
pub fn locomotion_system(world: &mut World, geometry: &StaticGeometry, inputs: &InputRouter, dt: f32) {
    for (entity, (player, controller, local, velocity, pose, last)) in world.query_mut::<(
        &Player,
        &mut Controller,
        &LocalTransform,
        &mut Velocity,
        &mut MeshPose,
        &mut LastTick,
    )>() {
        let input = inputs.snapshot(player.slot);
        let out = controller.0.fixed_update(geometry, local.position, &input, dt);

        if let Some(v) = out.velocity {
            velocity.0 = v;
        }
        pose.rotation = out.mesh_rotation;
        pose.offset = out.mesh_offset;
        if let Some(kind) = out.transitioned {
            debug!("Player {:?} (slot {}) is now {:?}", entity, player.slot, kind);
        }
        last.0 = Some(out);
    }
}
