use glam::{Quat, Vec3};
use hecs::{Entity, World};

use crate::components::*;
use crate::engine::time::FIXED_DT;
use crate::locomotion::PlayerController;
use crate::math::{euler_deg, UP};
use crate::stats::StatType;

// ---------------------------------------------------------------------------
// Static geometry
// ---------------------------------------------------------------------------

/// Infinite floor at y = 0.
pub fn spawn_ground(world: &mut World) -> Entity {
    world.spawn((
        LocalTransform::new(Vec3::ZERO),
        Collider::Plane {
            normal: UP,
            offset: 0.0,
        },
        Static,
        CollisionLayer::DEFAULT,
    ))
}

/// Axis-aligned box resting on its center.
pub fn spawn_static_box(world: &mut World, center: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        LocalTransform::new(center),
        Collider::Box { half_extents },
        Static,
        CollisionLayer::TRACK,
    ))
}

/// Slab tilted by `rotation`, e.g. a ramp pitched up along its length.
pub fn spawn_ramp(world: &mut World, center: Vec3, half_extents: Vec3, rotation: Quat) -> Entity {
    world.spawn((
        LocalTransform::new(center).with_rotation(rotation),
        Collider::Box { half_extents },
        Static,
        CollisionLayer::TRACK,
    ))
}

// ---------------------------------------------------------------------------
// Dynamic entities
// ---------------------------------------------------------------------------

const PICKUP_RADIUS: f32 = 1.5;
const PICKUP_COLLIDER_RADIUS: f32 = 0.4;
const PICKUP_GRAVITY_SCALE: f32 = 0.5;

/// Stat pickup that drifts down until it lands.
pub fn spawn_pickup(world: &mut World, position: Vec3, stat_type: StatType) -> Entity {
    spawn_launched_pickup(world, position, stat_type, Vec3::ZERO)
}

/// Stat pickup thrown with `velocity`, e.g. out of a broken box.
pub fn spawn_launched_pickup(world: &mut World, position: Vec3, stat_type: StatType, velocity: Vec3) -> Entity {
    world.spawn((
        LocalTransform::new(position),
        Velocity(velocity),
        Collider::Sphere {
            radius: PICKUP_COLLIDER_RADIUS,
        },
        GravityScale(PICKUP_GRAVITY_SCALE),
        Falling,
        Pickup {
            stat_type,
            radius: PICKUP_RADIUS,
        },
    ))
}

/// Breakable box dropped at `position`, turned `yaw_degrees` around up.
pub fn spawn_breakable_box(world: &mut World, position: Vec3, yaw_degrees: f32, template: BreakableBox) -> Entity {
    world.spawn((
        LocalTransform::new(position).with_rotation(euler_deg(0.0, yaw_degrees, 0.0)),
        Velocity(-UP * template.initial_fall_speed * FIXED_DT),
        Collider::Sphere {
            radius: template.radius,
        },
        GravityScale(template.gravity_scale),
        Falling,
        template,
    ))
}

/// Box spawner entity; it has no body of its own.
pub fn spawn_box_spawner(world: &mut World, spawner: BoxSpawner) -> Entity {
    world.spawn((spawner,))
}

/// Player body. The collision sphere spans the configured collider height.
pub fn spawn_player(world: &mut World, position: Vec3, slot: usize, controller: PlayerController) -> Entity {
    let radius = controller.config().collider_height / 2.0;
    world.spawn((
        LocalTransform::new(position),
        Velocity(Vec3::ZERO),
        Collider::Sphere { radius },
        Player { slot },
        Controller(controller),
        MeshPose::default(),
        LastTick(None),
    ))
}
