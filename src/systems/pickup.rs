use hecs::{Entity, World};
use log::info;

use crate::components::{Controller, LocalTransform, Pickup, Player};
use crate::stats::StatType;

/// A collected pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collected {
    pub pickup: Entity,
    pub player: Entity,
    pub stat_type: StatType,
}

/// Each pickup goes to the closest player inside its radius, measured from
/// the pickup, so one pickup never feeds two players. The stats go through
/// the controller's stat hook and the pickup is despawned.
pub fn pickup_system(world: &mut World) -> Vec<Collected> {
    let players: Vec<(Entity, glam::Vec3)> = world
        .query::<(&Player, &LocalTransform)>()
        .iter()
        .map(|(e, (_, local))| (e, local.position))
        .collect();

    let collected: Vec<Collected> = world
        .query::<(&Pickup, &LocalTransform)>()
        .iter()
        .filter_map(|(pickup_entity, (pickup, local))| {
            players
                .iter()
                .map(|&(player, position)| (player, position.distance(local.position)))
                .filter(|&(_, distance)| distance <= pickup.radius)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(player, _)| Collected {
                    pickup: pickup_entity,
                    player,
                    stat_type: pickup.stat_type,
                })
        })
        .collect();

    for event in &collected {
        if let Ok(mut controller) = world.get::<&mut Controller>(event.player) {
            controller.0.add_stats(event.stat_type.pickup_stats());
            info!(
                "Player {:?} picked up {:?}; stats now {:?}",
                event.player,
                event.stat_type,
                controller.0.stats()
            );
        }
        let _ = world.despawn(event.pickup);
    }

    collected
}
