use glam::{Vec2, Vec3};

use crate::timer::Timer;

/// Crate that drops from the sky and bursts into stat pickups when a player
/// touches it. Collision uses the bounding sphere `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakableBox {
    /// Pickups per break, `min_pickups..max_pickups` (upper bound exclusive).
    pub min_pickups: u32,
    pub max_pickups: u32,
    pub gravity_scale: f32,
    pub initial_fall_speed: f32,
    /// Upward speed given to each spawned pickup.
    pub launch_speed: f32,
    /// Pickups appear at random points of this volume, relative to the box.
    pub spawn_center: Vec3,
    pub spawn_size: Vec3,
    pub radius: f32,
}

impl Default for BreakableBox {
    fn default() -> Self {
        Self {
            min_pickups: 2,
            max_pickups: 5,
            gravity_scale: 2.0,
            initial_fall_speed: 5.0,
            launch_speed: 5.0,
            spawn_center: Vec3::new(0.0, 1.5, 0.0),
            spawn_size: Vec3::new(2.0, 1.0, 2.0),
            radius: 1.0,
        }
    }
}

/// Drops batches of breakable boxes over a horizontal area on a randomly
/// re-armed timer. The first batch drops on the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSpawner {
    pub center: Vec3,
    /// Extent along x and z.
    pub area: Vec2,
    pub min_interval: f32,
    pub max_interval: f32,
    pub min_boxes: u32,
    pub max_boxes: u32,
    pub template: BreakableBox,
    pub timer: Option<Timer>,
}

impl BoxSpawner {
    pub fn new(center: Vec3, area: Vec2) -> Self {
        Self {
            center,
            area,
            min_interval: 4.0,
            max_interval: 8.0,
            min_boxes: 1,
            max_boxes: 3,
            template: BreakableBox::default(),
            timer: None,
        }
    }
}
