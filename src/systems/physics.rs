use glam::Vec3;
use hecs::World;

use crate::components::{Collider, Contact, Falling, GravityScale, LocalTransform, Static, Velocity};
use crate::engine::time::FIXED_DT;

use super::raycast::{StaticGeometry, StaticShape};

pub const PHYSICS_DT: f32 = FIXED_DT;
const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Contacts whose normal is at least this upright count as landing.
const LANDING_NORMAL_Y: f32 = 0.5;

/// One rigidbody step for every dynamic body: semi-implicit Euler, then
/// sphere bodies are pushed out of static geometry and lose the velocity
/// component driving them into it. Returns the resolved contacts.
pub fn physics_step(world: &mut World, geometry: &StaticGeometry, dt: f32) -> Vec<Contact> {
    for (_entity, (local, vel, gravity, falling)) in world.query_mut::<(
        &mut LocalTransform,
        &mut Velocity,
        Option<&GravityScale>,
        Option<&Falling>,
    )>() {
        if let (Some(scale), Some(_)) = (gravity, falling) {
            vel.0 += GRAVITY * scale.0 * dt;
        }
        local.position += vel.0 * dt;
    }

    let mut contacts = Vec::new();
    for (entity, (local, vel, collider)) in
        world.query_mut::<(&mut LocalTransform, &mut Velocity, &Collider)>().without::<&Static>()
    {
        let Collider::Sphere { radius } = *collider else {
            continue;
        };
        for shape in geometry.shapes() {
            let Some((normal, depth)) = sphere_penetration(local.position, radius, shape) else {
                continue;
            };
            local.position += normal * depth;
            let vel_along_n = vel.0.dot(normal);
            if vel_along_n < 0.0 {
                vel.0 -= vel_along_n * normal;
            }
            contacts.push(Contact {
                entity,
                static_entity: shape.entity,
                normal,
                penetration_depth: depth,
            });
        }
    }

    contacts
}

/// Falling bodies (pickups, breakable boxes) that touched a floor-like
/// surface stop: gravity no longer applies and their velocity is cleared.
pub fn settle_falling(world: &mut World, contacts: &[Contact]) {
    for contact in contacts.iter().filter(|c| c.normal.y >= LANDING_NORMAL_Y) {
        if world.remove_one::<Falling>(contact.entity).is_err() {
            continue;
        }
        if let Ok(mut velocity) = world.get::<&mut Velocity>(contact.entity) {
            velocity.0 = Vec3::ZERO;
        }
    }
}

/// Push-out direction (away from the static) and depth, if overlapping.
fn sphere_penetration(center: Vec3, radius: f32, shape: &StaticShape) -> Option<(Vec3, f32)> {
    match shape.collider {
        Collider::Plane { normal, offset } => {
            let dist = center.dot(normal) - offset;
            let penetration = radius - dist;
            (penetration > 0.0).then_some((normal, penetration))
        }
        Collider::Sphere { radius: other } => {
            let diff = center - shape.position;
            let dist = diff.length();
            let penetration = (radius + other) - dist;
            let normal = if dist > 1e-6 { diff / dist } else { Vec3::Y };
            (penetration > 0.0).then_some((normal, penetration))
        }
        Collider::Box { half_extents } => {
            let inverse = shape.rotation.inverse();
            let local = inverse * (center - shape.position);
            let closest = local.clamp(-half_extents, half_extents);
            let diff = local - closest;
            let dist = diff.length();
            if dist > 1e-6 {
                let penetration = radius - dist;
                (penetration > 0.0).then(|| (shape.rotation * (diff / dist), penetration))
            } else {
                // Center inside the box: leave through the nearest face.
                let room = half_extents - local.abs();
                let (axis, depth) = if room.x <= room.y && room.x <= room.z {
                    (Vec3::X * local.x.signum(), room.x)
                } else if room.y <= room.z {
                    (Vec3::Y * local.y.signum(), room.y)
                } else {
                    (Vec3::Z * local.z.signum(), room.z)
                };
                Some((shape.rotation * axis, depth + radius))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::UP;
    use hecs::Entity;

    fn ground(world: &mut World) -> Entity {
        world.spawn((
            Static,
            Collider::Plane { normal: UP, offset: 0.0 },
            LocalTransform::new(Vec3::ZERO),
        ))
    }

    #[test]
    fn sphere_rests_on_plane() {
        let mut world = World::new();
        let floor = ground(&mut world);
        let ball = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 1.05, 0.0)),
            Velocity(Vec3::new(2.0, -5.0, 0.0)),
            Collider::Sphere { radius: 1.0 },
        ));
        let geometry = StaticGeometry::collect(&world);

        let contacts = physics_step(&mut world, &geometry, 0.02);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].static_entity, floor);

        let local = world.get::<&LocalTransform>(ball).unwrap();
        assert!((local.position.y - 1.0).abs() < 1e-5);
        let vel = world.get::<&Velocity>(ball).unwrap();
        assert_eq!(vel.0.y, 0.0);
        assert_eq!(vel.0.x, 2.0);
    }

    #[test]
    fn gravity_only_while_falling() {
        let mut world = World::new();
        let body = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 10.0, 0.0)),
            Velocity(Vec3::ZERO),
            GravityScale(2.0),
            Falling,
        ));
        let geometry = StaticGeometry::default();
        physics_step(&mut world, &geometry, 0.5);
        assert!((world.get::<&Velocity>(body).unwrap().0.y + 9.81).abs() < 1e-4);

        world.remove_one::<Falling>(body).unwrap();
        physics_step(&mut world, &geometry, 0.5);
        assert!((world.get::<&Velocity>(body).unwrap().0.y + 9.81).abs() < 1e-4);
    }

    #[test]
    fn falling_body_settles_on_floor_but_not_on_walls() {
        let mut world = World::new();
        ground(&mut world);
        world.spawn((
            Static,
            Collider::Plane {
                normal: Vec3::NEG_X,
                offset: -5.0,
            },
            LocalTransform::new(Vec3::ZERO),
        ));
        let dropped = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.6, 0.0)),
            Velocity(Vec3::new(1.0, 0.0, 0.0)),
            Collider::Sphere { radius: 0.5 },
            GravityScale(1.0),
            Falling,
        ));
        let sliding = world.spawn((
            LocalTransform::new(Vec3::new(4.6, 3.0, 0.0)),
            Velocity(Vec3::new(1.0, 0.0, 0.0)),
            Collider::Sphere { radius: 0.5 },
            GravityScale(1.0),
            Falling,
        ));
        let geometry = StaticGeometry::collect(&world);
        for _ in 0..20 {
            let contacts = physics_step(&mut world, &geometry, 0.02);
            settle_falling(&mut world, &contacts);
        }

        assert!(world.get::<&Falling>(dropped).is_err());
        assert_eq!(world.get::<&Velocity>(dropped).unwrap().0, Vec3::ZERO);
        let y = world.get::<&LocalTransform>(dropped).unwrap().position.y;
        assert!((y - 0.5).abs() < 1e-3);

        // Touching only the wall keeps it falling.
        assert!(world.get::<&Falling>(sliding).is_ok());
    }

    #[test]
    fn sphere_is_pushed_off_box_side() {
        let mut world = World::new();
        world.spawn((
            Static,
            Collider::Box {
                half_extents: Vec3::splat(1.0),
            },
            LocalTransform::new(Vec3::ZERO),
        ));
        let ball = world.spawn((
            LocalTransform::new(Vec3::new(1.5, 0.0, 0.0)),
            Velocity(Vec3::ZERO),
            Collider::Sphere { radius: 1.0 },
        ));
        let geometry = StaticGeometry::collect(&world);
        let contacts = physics_step(&mut world, &geometry, 0.02);
        assert_eq!(contacts.len(), 1);
        assert!((contacts[0].normal - Vec3::X).length() < 1e-6);
        let local = world.get::<&LocalTransform>(ball).unwrap();
        assert!((local.position.x - 2.0).abs() < 1e-5);
    }
}
