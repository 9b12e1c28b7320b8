use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::components::BoxSpawner;
use crate::locomotion::PlayerController;
use crate::math::euler_deg;
use crate::scene::prefabs::{
    spawn_box_spawner, spawn_ground, spawn_pickup, spawn_player, spawn_ramp, spawn_static_box,
};
use crate::stats::StatType;

/// Where the player is dropped from.
pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, 6.0, 0.0);

/// Build the test track: a floor, a ramp up onto a raised deck, a line of
/// pickups along the straight and a box spawner over the run-up to the ramp.
/// Returns the player entity.
pub fn load_test_scene(world: &mut World, slot: usize, controller: PlayerController) -> Entity {
    spawn_ground(world);

    // 20 degree ramp whose top edge meets the deck.
    spawn_ramp(
        world,
        Vec3::new(0.0, 1.7, 40.0),
        Vec3::new(4.0, 0.25, 5.0),
        euler_deg(-20.0, 0.0, 0.0),
    );
    spawn_static_box(world, Vec3::new(0.0, 1.75, 55.0), Vec3::new(6.0, 1.75, 10.5));

    let pickups = [
        StatType::TopSpeed,
        StatType::Glide,
        StatType::Boost,
        StatType::All,
    ];
    for (i, &stat_type) in pickups.iter().enumerate() {
        spawn_pickup(world, Vec3::new(0.0, 3.0, 8.0 + 6.0 * i as f32), stat_type);
    }

    spawn_box_spawner(world, BoxSpawner::new(Vec3::new(0.0, 12.0, 30.0), Vec2::new(6.0, 10.0)));

    spawn_player(world, PLAYER_SPAWN, slot, controller)
}
