use glam::Vec3;
use hecs::{Entity, World};
use log::{debug, info};
use rand::Rng;

use crate::components::{BoxSpawner, BreakableBox, Collider, LocalTransform, Player};
use crate::math::UP;
use crate::scene::prefabs::{spawn_breakable_box, spawn_launched_pickup};
use crate::stats::StatType;
use crate::timer::Timer;

/// A box a player broke this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBroken {
    pub box_entity: Entity,
    pub player: Entity,
    pub pickups: Vec<Entity>,
}

/// Inclusive float range that tolerates `min == max`.
fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn random_point(rng: &mut impl Rng, center: Vec3, size: Vec3) -> Vec3 {
    let min = center - size / 2.0;
    let max = center + size / 2.0;
    Vec3::new(
        random_between(rng, min.x, max.x),
        random_between(rng, min.y, max.y),
        random_between(rng, min.z, max.z),
    )
}

/// Interval until the next batch: `min..=max + 1` seconds.
fn random_interval(rng: &mut impl Rng, spawner: &BoxSpawner) -> Timer {
    Timer::new(random_between(rng, spawner.min_interval, spawner.max_interval + 1.0))
}

/// Advance every spawner and drop a batch of boxes for each one that is due.
/// Returns the spawned boxes.
pub fn box_spawner_system(world: &mut World, rng: &mut impl Rng, dt: f32) -> Vec<Entity> {
    let mut drops: Vec<(Vec3, f32, BreakableBox)> = Vec::new();

    for (_, spawner) in world.query_mut::<&mut BoxSpawner>() {
        let due = match spawner.timer.as_mut() {
            Some(timer) => {
                *timer += dt;
                timer.expired()
            }
            None => true,
        };
        if !due {
            continue;
        }

        let count = rng.gen_range(spawner.min_boxes..=spawner.max_boxes.max(spawner.min_boxes));
        let area = Vec3::new(spawner.area.x, 0.0, spawner.area.y);
        for _ in 0..count {
            let position = random_point(rng, spawner.center, area);
            let yaw = rng.gen_range(0.0_f32..360.0);
            drops.push((position, yaw, spawner.template));
        }
        let timer = random_interval(rng, spawner);
        spawner.timer = Some(timer);
    }

    if !drops.is_empty() {
        debug!("Dropping {} breakable boxes", drops.len());
    }
    drops
        .into_iter()
        .map(|(position, yaw, template)| spawn_breakable_box(world, position, yaw, template))
        .collect()
}

/// Break every box a player's body touches. Each break scatters
/// `min_pickups..max_pickups` pickups of random stat types through the box's
/// spawn volume, launched upwards, and despawns the box.
pub fn box_break_system(world: &mut World, rng: &mut impl Rng) -> Vec<BoxBroken> {
    let players: Vec<(Entity, Vec3, f32)> = world
        .query::<(&Player, &LocalTransform, &Collider)>()
        .iter()
        .filter_map(|(e, (_, local, collider))| match *collider {
            Collider::Sphere { radius } => Some((e, local.position, radius)),
            _ => None,
        })
        .collect();

    let touched: Vec<(Entity, Entity, Vec3, BreakableBox)> = world
        .query::<(&BreakableBox, &LocalTransform)>()
        .iter()
        .filter_map(|(box_entity, (breakable, local))| {
            players
                .iter()
                .find(|&&(_, position, radius)| {
                    position.distance(local.position) <= radius + breakable.radius
                })
                .map(|&(player, _, _)| (box_entity, player, local.position, *breakable))
        })
        .collect();

    let mut broken = Vec::with_capacity(touched.len());
    for (box_entity, player, position, breakable) in touched {
        let count = if breakable.max_pickups > breakable.min_pickups {
            rng.gen_range(breakable.min_pickups..breakable.max_pickups)
        } else {
            breakable.min_pickups
        };

        let pickups = (0..count)
            .map(|_| {
                let at = random_point(rng, position + breakable.spawn_center, breakable.spawn_size);
                let stat_type = StatType::ALL[rng.gen_range(0..StatType::ALL.len())];
                spawn_launched_pickup(world, at, stat_type, UP * breakable.launch_speed)
            })
            .collect::<Vec<_>>();

        let _ = world.despawn(box_entity);
        info!("Player {:?} broke box {:?}: {} pickups", player, box_entity, pickups.len());
        broken.push(BoxBroken {
            box_entity,
            player,
            pickups,
        });
    }

    broken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Falling, Pickup, Velocity};
    use crate::config::LocomotionConfig;
    use crate::locomotion::PlayerController;
    use crate::scene::prefabs::{spawn_box_spawner, spawn_player};
    use crate::stats::PlayerStats;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn player_at(world: &mut World, position: Vec3) -> Entity {
        let controller = PlayerController::new(LocomotionConfig::default(), PlayerStats::neutral(), 0.0);
        spawn_player(world, position, 0, controller)
    }

    #[test]
    fn first_batch_drops_immediately_then_waits_for_timer() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut world = World::new();
        let mut spawner = BoxSpawner::new(Vec3::new(0.0, 10.0, 0.0), Vec2::new(8.0, 4.0));
        spawner.min_interval = 1.0;
        spawner.max_interval = 1.0;
        spawner.min_boxes = 2;
        spawner.max_boxes = 3;
        spawn_box_spawner(&mut world, spawner);

        let first = box_spawner_system(&mut world, &mut rng, 0.1);
        assert!((2..=3).contains(&first.len()));
        for &entity in &first {
            let position = world.get::<&LocalTransform>(entity).unwrap().position;
            assert_eq!(position.y, 10.0);
            assert!(position.x.abs() <= 4.0 && position.z.abs() <= 2.0);
            assert!(world.get::<&Falling>(entity).is_ok());
            assert!(world.get::<&Velocity>(entity).unwrap().0.y < 0.0);
        }

        // Interval is drawn from 1..=2 seconds.
        for _ in 0..9 {
            assert!(box_spawner_system(&mut world, &mut rng, 0.1).is_empty());
        }
        let mut ticks = 9;
        while box_spawner_system(&mut world, &mut rng, 0.1).is_empty() {
            ticks += 1;
            assert!(ticks <= 21, "second batch never dropped");
        }
        assert!(world.query::<&BreakableBox>().iter().count() > first.len());
    }

    #[test]
    fn touching_box_bursts_into_pickups() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let mut world = World::new();
        let player = player_at(&mut world, Vec3::new(0.0, 1.0, 0.0));
        let template = BreakableBox {
            min_pickups: 3,
            max_pickups: 3,
            ..BreakableBox::default()
        };
        let box_position = Vec3::new(0.0, 1.0, 1.5);
        let crate_entity = spawn_breakable_box(&mut world, box_position, 0.0, template);

        let broken = box_break_system(&mut world, &mut rng);
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].player, player);
        assert_eq!(broken[0].pickups.len(), 3);
        assert!(!world.contains(crate_entity));

        let center = box_position + template.spawn_center;
        for &pickup in &broken[0].pickups {
            assert!(world.get::<&Pickup>(pickup).is_ok());
            let position = world.get::<&LocalTransform>(pickup).unwrap().position;
            let offset = (position - center).abs();
            assert!(offset.cmple(template.spawn_size / 2.0 + 1e-5).all(), "{position:?}");
            let velocity = world.get::<&Velocity>(pickup).unwrap().0;
            assert_eq!(velocity, UP * template.launch_speed);
        }
    }

    #[test]
    fn distant_box_stays_whole() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let mut world = World::new();
        player_at(&mut world, Vec3::ZERO);
        let crate_entity = spawn_breakable_box(&mut world, Vec3::new(0.0, 0.0, 5.0), 0.0, BreakableBox::default());

        assert!(box_break_system(&mut world, &mut rng).is_empty());
        assert!(world.contains(crate_entity));
    }

    #[test]
    fn pickup_count_excludes_upper_bound() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let template = BreakableBox {
            min_pickups: 1,
            max_pickups: 3,
            ..BreakableBox::default()
        };
        for _ in 0..30 {
            let mut world = World::new();
            player_at(&mut world, Vec3::ZERO);
            spawn_breakable_box(&mut world, Vec3::ZERO, 0.0, template);
            let broken = box_break_system(&mut world, &mut rng);
            assert!((1..3).contains(&broken[0].pickups.len()));
        }
    }
}
