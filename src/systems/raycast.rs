use glam::{Quat, Vec3};
use hecs::{Entity, World};

use crate::components::{Collider, CollisionLayer, LocalTransform, Static};
use crate::locomotion::{GroundQuery, RayHit};

/// A static collider frozen in world space.
#[derive(Debug, Clone, Copy)]
pub struct StaticShape {
    pub entity: Entity,
    pub collider: Collider,
    pub position: Vec3,
    pub rotation: Quat,
    pub layer: u32,
}

/// Snapshot of every static collider, collected once per tick so locomotion
/// can query the world while the ECS is borrowed mutably.
#[derive(Debug, Clone, Default)]
pub struct StaticGeometry {
    shapes: Vec<StaticShape>,
}

impl StaticGeometry {
    pub fn collect(world: &World) -> Self {
        let shapes = world
            .query::<(&Static, &Collider, &LocalTransform, Option<&CollisionLayer>)>()
            .iter()
            .map(|(entity, (_, collider, local, layer))| StaticShape {
                entity,
                collider: *collider,
                position: local.position,
                rotation: local.rotation,
                layer: layer.copied().unwrap_or(CollisionLayer::DEFAULT).0,
            })
            .collect();
        Self { shapes }
    }

    pub fn shapes(&self) -> &[StaticShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl GroundQuery for StaticGeometry {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, layer_mask: u32) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let mut best: Option<RayHit> = None;

        for shape in self.shapes.iter().filter(|s| s.layer & layer_mask != 0) {
            let hit = match shape.collider {
                Collider::Sphere { radius } => ray_sphere_intersection(origin, dir, shape.position, radius)
                    .map(|t| (t, (origin + dir * t - shape.position).normalize_or_zero())),
                Collider::Plane { normal, offset } => ray_plane_intersection(origin, dir, normal, offset),
                Collider::Box { half_extents } => {
                    ray_obb_intersection(origin, dir, shape.position, shape.rotation, half_extents)
                }
            };

            if let Some((t, normal)) = hit {
                if t >= 0.0 && t <= max_distance {
                    let is_closer = best.as_ref().map_or(true, |b| t < b.distance);
                    if is_closer {
                        best = Some(RayHit {
                            normal,
                            point: origin + dir * t,
                            distance: t,
                        });
                    }
                }
            }
        }

        best
    }
}

fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = dir.dot(dir);
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

fn ray_plane_intersection(origin: Vec3, dir: Vec3, normal: Vec3, offset: f32) -> Option<(f32, Vec3)> {
    let denom = normal.dot(dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (offset - normal.dot(origin)) / denom;
    (t >= 0.0).then_some((t, normal))
}

/// Slab test in the box's local frame. The normal is the face whose slab
/// the hit point sits deepest against.
fn ray_obb_intersection(origin: Vec3, dir: Vec3, center: Vec3, rotation: Quat, half: Vec3) -> Option<(f32, Vec3)> {
    let inverse = rotation.inverse();
    let local_origin = inverse * (origin - center);
    let local_dir = inverse * dir;

    let t = ray_aabb_intersection(local_origin, local_dir, half)?;
    let local_point = local_origin + local_dir * t;
    let scaled = local_point / half;
    let abs = scaled.abs();
    let local_normal = if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::X * scaled.x.signum()
    } else if abs.y >= abs.z {
        Vec3::Y * scaled.y.signum()
    } else {
        Vec3::Z * scaled.z.signum()
    };
    Some((t, rotation * local_normal))
}

fn ray_aabb_intersection(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    let min = -half;
    let max = half;
    let inv_dir = Vec3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);

    let t1 = (min.x - origin.x) * inv_dir.x;
    let t2 = (max.x - origin.x) * inv_dir.x;
    let t3 = (min.y - origin.y) * inv_dir.y;
    let t4 = (max.y - origin.y) * inv_dir.y;
    let t5 = (min.z - origin.z) * inv_dir.z;
    let t6 = (max.z - origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }
    // Ray starts inside the box: report the exit.
    Some(if tmin < 0.0 { tmax } else { tmin })
}
