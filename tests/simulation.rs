//! Headless simulation: locomotion, rigidbody integration, breakable boxes and
//! pickups running together in one hecs world at the fixed physics rate.

use glam::Vec3;
use hecs::World;
use kartflight::components::{BreakableBox, Controller, Falling, LocalTransform, Pickup};
use kartflight::scene::prefabs::{spawn_breakable_box, spawn_ground, spawn_pickup, spawn_player};
use kartflight::systems::{
    box_break_system, locomotion_system, physics_step, pickup_system, settle_falling, BoxBroken, StaticGeometry,
    PHYSICS_DT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use kartflight::{InputRouter, LocomotionConfig, LocomotionKind, PlayerController, PlayerStats, StatType};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Sim {
    world: World,
    geometry: StaticGeometry,
    router: InputRouter,
    player: hecs::Entity,
    rng: ChaCha12Rng,
    broken: Vec<BoxBroken>,
    collected: Vec<StatType>,
}

impl Sim {
    fn new() -> Self {
        let mut world = World::new();
        spawn_ground(&mut world);
        let geometry = StaticGeometry::collect(&world);

        let mut router = InputRouter::new();
        let slot = router.join(false);
        let controller = PlayerController::new(LocomotionConfig::default(), PlayerStats::neutral(), 0.0);
        // Sphere radius is 1, so this rests on the floor.
        let player = spawn_player(&mut world, Vec3::new(0.0, 1.0, 0.0), slot, controller);

        Self {
            world,
            geometry,
            router,
            player,
            rng: ChaCha12Rng::seed_from_u64(5),
            broken: Vec::new(),
            collected: Vec::new(),
        }
    }

    fn step(&mut self) {
        locomotion_system(&mut self.world, &self.geometry, &self.router, PHYSICS_DT);
        let contacts = physics_step(&mut self.world, &self.geometry, PHYSICS_DT);
        settle_falling(&mut self.world, &contacts);
        self.broken.extend(box_break_system(&mut self.world, &mut self.rng));
        self.collected
            .extend(pickup_system(&mut self.world).into_iter().map(|c| c.stat_type));
    }

    fn run(&mut self, seconds: f32) {
        let ticks = (seconds / PHYSICS_DT).round() as usize;
        for _ in 0..ticks {
            self.step();
        }
    }

    fn position(&self) -> Vec3 {
        self.world.get::<&LocalTransform>(self.player).unwrap().position
    }

    fn controller(&self) -> hecs::Ref<'_, Controller> {
        self.world.get::<&Controller>(self.player).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn player_lands_and_drives_forward() {
    let mut sim = Sim::new();
    sim.run(0.5);
    assert_eq!(sim.controller().0.kind(), LocomotionKind::Grounded);

    let before = sim.position();
    sim.run(1.0);
    let after = sim.position();
    assert!(after.z > before.z + 1.0, "{before:?} -> {after:?}");
    // Stays on the floor.
    assert!((after.y - 1.0).abs() < 0.05, "{after:?}");
    // Steering with zero input still zig-zags slightly because sign(0) = +1.
    assert!(after.x.abs() < 0.01 * (after.z - before.z), "{after:?}");
}

#[test]
fn driving_through_pickups_collects_them() {
    let mut sim = Sim::new();
    spawn_pickup(&mut sim.world, Vec3::new(0.0, 1.5, 8.0), StatType::TopSpeed);
    spawn_pickup(&mut sim.world, Vec3::new(0.0, 1.5, 14.0), StatType::Glide);

    sim.run(3.0);

    assert!(sim.position().z > 14.0, "{:?}", sim.position());
    assert_eq!(sim.collected, vec![StatType::TopSpeed, StatType::Glide]);
    assert_eq!(sim.world.query::<&Pickup>().iter().count(), 0);

    let controller = sim.controller();
    let stats = controller.0.stats();
    assert!(stats.top_speed() > PlayerStats::neutral().top_speed());
    assert!(stats.glide() > PlayerStats::neutral().glide());
}

#[test]
fn driving_into_a_box_breaks_it_into_pickups() {
    let mut sim = Sim::new();
    let template = BreakableBox {
        min_pickups: 2,
        max_pickups: 4,
        ..BreakableBox::default()
    };
    let crate_entity = spawn_breakable_box(&mut sim.world, Vec3::new(0.0, 2.5, 10.0), 45.0, template);

    // The box lands before the player gets there.
    sim.run(0.5);
    assert!(sim.world.get::<&Falling>(crate_entity).is_err());
    let resting = sim.world.get::<&LocalTransform>(crate_entity).unwrap().position;
    assert!((resting.y - template.radius).abs() < 0.05, "{resting:?}");
    assert!(sim.broken.is_empty());

    sim.run(2.5);

    assert_eq!(sim.broken.len(), 1);
    let broken = &sim.broken[0];
    assert_eq!(broken.player, sim.player);
    assert!(!sim.world.contains(crate_entity));
    assert!((2..4).contains(&broken.pickups.len()), "{}", broken.pickups.len());

    // Every pickup from the burst is either collected or still in the world.
    let remaining = sim.world.query::<&Pickup>().iter().count();
    assert_eq!(sim.collected.len() + remaining, broken.pickups.len());
}
