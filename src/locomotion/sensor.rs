use glam::{Quat, Vec3};

use crate::config::LocomotionConfig;
use crate::math::{angle_deg, approx_eq, euler_deg, FORWARD, UP};

/// Result of a single ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub normal: Vec3,
    pub point: Vec3,
    pub distance: f32,
}

/// Ray-intersection service provided by the host's physics world.
pub trait GroundQuery {
    /// Nearest hit along `direction` within `max_distance` against colliders
    /// whose layer is in `layer_mask`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, layer_mask: u32)
        -> Option<RayHit>;
}

impl<T: GroundQuery + ?Sized> GroundQuery for &T {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, layer_mask: u32) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance, layer_mask)
    }
}

/// A surface is climbable from `reference` when the angle between the two
/// normals is below `max_slope_angle` degrees.
pub fn is_surface_climbable(normal: Vec3, reference: Vec3, max_slope_angle: f32) -> bool {
    angle_deg(normal, reference) < max_slope_angle
}

/// One tick's center-ray result.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundProbe {
    pub hit: Option<RayHit>,
    /// The hit is close enough to the collider's bottom to stand on.
    pub counts_as_ground: bool,
}

impl GroundProbe {
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// Downward ground probe with one step of surface-normal history.
#[derive(Debug, Clone, Default)]
pub struct GroundSensor {
    /// Normal of the surface before the most recent surface change.
    pub last_normal: Vec3,
    pub current_normal: Vec3,
    probe: GroundProbe,
}

impl GroundSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_probe(&self) -> GroundProbe {
        self.probe
    }

    /// Cast straight down from `position + offset`. The airborne state passes
    /// its facing as `offset` to look ahead of travel.
    pub fn probe(
        &mut self,
        query: &impl GroundQuery,
        position: Vec3,
        offset: Vec3,
        config: &LocomotionConfig,
    ) -> GroundProbe {
        let origin = position + offset;
        let hit = query.raycast(
            origin,
            -UP,
            config.ground_ray_distance + offset.y,
            config.collidable_layers,
        );

        let mut counts_as_ground = false;
        if let Some(hit) = hit {
            if !approx_eq(self.current_normal, hit.normal) {
                self.last_normal = self.current_normal;
                self.current_normal = hit.normal;
            }
            counts_as_ground = origin.distance(hit.point) - config.collider_height / 2.0
                < config.distance_from_collider_to_count_as_ground_hit;
        }

        self.probe = GroundProbe {
            hit,
            counts_as_ground,
        };
        self.probe
    }

    /// The surface under the player changed since the previous change.
    pub fn surface_changed(&self) -> bool {
        !approx_eq(self.last_normal, self.current_normal)
    }

    /// Normal the player last stood on, or up when there is no history yet.
    pub fn reference_normal(&self) -> Vec3 {
        if self.last_normal == Vec3::ZERO {
            UP
        } else {
            self.last_normal
        }
    }

    pub fn reset_history(&mut self) {
        self.last_normal = Vec3::ZERO;
        self.current_normal = Vec3::ZERO;
    }

    /// Average `center_normal` with the normals found by a ring of downward
    /// rays around the player. Rays land at `facing * yaw(-i * 360/N) * FORWARD`
    /// from `position`; only surfaces climbable from the current surface are
    /// counted. The result is not normalized.
    pub fn average_normal(
        &self,
        query: &impl GroundQuery,
        position: Vec3,
        facing: Quat,
        center_normal: Vec3,
        config: &LocomotionConfig,
    ) -> Vec3 {
        let reference = if self.current_normal == Vec3::ZERO {
            UP
        } else {
            self.current_normal
        };
        let ray_length = config.ground_ray_distance + config.ground_rotation_ray_extra_distance;
        let increment = 360.0 / config.rotation_ray_count as f32;

        let mut sum = center_normal;
        let mut count = 1;
        for i in 0..config.rotation_ray_count {
            let offset = facing * euler_deg(0.0, -increment * i as f32, 0.0) * FORWARD;
            let Some(hit) = query.raycast(position + offset, -UP, ray_length, config.collidable_layers)
            else {
                continue;
            };
            if is_surface_climbable(hit.normal, reference, config.max_climbable_slope_angle) {
                sum += hit.normal;
                count += 1;
            }
        }
        sum / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal plane at `height` with a fixed reported normal.
    struct Floor {
        height: f32,
        normal: Vec3,
    }

    impl GroundQuery for Floor {
        fn raycast(&self, origin: Vec3, _direction: Vec3, max_distance: f32, _mask: u32) -> Option<RayHit> {
            let distance = origin.y - self.height;
            (distance >= 0.0 && distance <= max_distance).then(|| RayHit {
                normal: self.normal,
                point: Vec3::new(origin.x, self.height, origin.z),
                distance,
            })
        }
    }

    /// Flat on the right (`x >= 0`), steep wall normal on the left.
    struct HalfWall;

    impl GroundQuery for HalfWall {
        fn raycast(&self, origin: Vec3, _direction: Vec3, _max: f32, _mask: u32) -> Option<RayHit> {
            let normal = if origin.x >= 0.0 { UP } else { Vec3::X };
            Some(RayHit {
                normal,
                point: Vec3::new(origin.x, 0.0, origin.z),
                distance: origin.y,
            })
        }
    }

    #[test]
    fn near_hit_counts_as_ground() {
        let config = LocomotionConfig::default();
        let mut sensor = GroundSensor::new();
        let floor = Floor { height: 0.0, normal: UP };

        let probe = sensor.probe(&floor, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, &config);
        assert!(probe.is_hit());
        assert!(probe.counts_as_ground);

        // 2.4 - 1.0 is past the 1.3 proximity gate but within ray length.
        let probe = sensor.probe(&floor, Vec3::new(0.0, 2.4, 0.0), Vec3::ZERO, &config);
        assert!(probe.is_hit());
        assert!(!probe.counts_as_ground);
    }

    #[test]
    fn miss_leaves_history_untouched() {
        let config = LocomotionConfig::default();
        let mut sensor = GroundSensor::new();
        let floor = Floor { height: 0.0, normal: UP };
        sensor.probe(&floor, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, &config);

        let probe = sensor.probe(&floor, Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, &config);
        assert!(!probe.is_hit());
        assert!(!probe.counts_as_ground);
        assert_eq!(sensor.current_normal, UP);
    }

    #[test]
    fn history_shifts_only_on_normal_change() {
        let config = LocomotionConfig::default();
        let mut sensor = GroundSensor::new();
        let flat = Floor { height: 0.0, normal: UP };
        let tilted = Floor {
            height: 0.0,
            normal: Vec3::new(0.0, 1.0, 1.0).normalize(),
        };
        let pos = Vec3::new(0.0, 1.0, 0.0);

        sensor.probe(&flat, pos, Vec3::ZERO, &config);
        assert_eq!(sensor.last_normal, Vec3::ZERO);
        assert!(sensor.surface_changed());
        assert_eq!(sensor.reference_normal(), UP);

        sensor.probe(&flat, pos, Vec3::ZERO, &config);
        assert_eq!(sensor.last_normal, Vec3::ZERO);

        sensor.probe(&tilted, pos, Vec3::ZERO, &config);
        assert_eq!(sensor.last_normal, UP);
        assert_eq!(sensor.current_normal, tilted.normal);

        sensor.reset_history();
        assert!(!sensor.surface_changed());
    }

    #[test]
    fn look_ahead_offset_extends_ray() {
        let config = LocomotionConfig::default();
        let mut sensor = GroundSensor::new();
        let floor = Floor { height: 0.0, normal: UP };
        // Origin at y = 3.0 needs 3.0 of ray; 2.5 + 0.5 reaches exactly.
        let probe = sensor.probe(&floor, Vec3::new(0.0, 2.5, 0.0), Vec3::new(0.0, 0.5, 0.0), &config);
        assert!(probe.is_hit());
    }

    #[test]
    fn average_normal_skips_unclimbable_samples() {
        let mut config = LocomotionConfig::default();
        config.rotation_ray_count = 4;
        config.max_climbable_slope_angle = 45.0;
        let sensor = GroundSensor::new();

        // Rays at 0, -90, -180, -270 degrees: forward, left, back, right.
        // The left sample hits the wall normal and is rejected.
        let avg = sensor.average_normal(&HalfWall, Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY, UP, &config);
        assert!((avg - UP).length() < 1e-5);
    }

    #[test]
    fn average_normal_includes_center_sample() {
        let mut config = LocomotionConfig::default();
        config.rotation_ray_count = 2;
        let sensor = GroundSensor::new();
        let floor = Floor { height: 0.0, normal: UP };
        let center = Vec3::new(0.0, 1.0, 1.0).normalize();

        let avg = sensor.average_normal(&floor, Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY, center, &config);
        let expected = (center + UP * 2.0) / 3.0;
        assert!((avg - expected).length() < 1e-5);
    }

    #[test]
    fn climbable_is_strictly_below_limit() {
        assert!(is_surface_climbable(UP, UP, 80.0));
        assert!(!is_surface_climbable(Vec3::X, UP, 80.0));
        assert!(!is_surface_climbable(Vec3::X, UP, 90.0));
    }
}
