//! Two-state (grounded / airborne) arcade locomotion driven by an external
//! rigidbody integrator.

pub mod airborne;
pub mod charge;
pub mod controller;
pub mod grounded;
pub mod sensor;

use glam::{Quat, Vec3};

use crate::config::LocomotionConfig;
use crate::engine::input::PlayerInputs;
use crate::math::{euler_deg, to_euler_deg, FORWARD};
use crate::stats::StatMultipliers;

pub use airborne::AirborneData;
pub use charge::ChargeState;
pub use controller::{LocomotionKind, LocomotionState, PlayerController, TickOutput};
pub use grounded::GroundedData;
pub use sensor::{is_surface_climbable, GroundProbe, GroundQuery, GroundSensor, RayHit};

/// Motion intent owned by one controller and advanced once per fixed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionState {
    pub speed: f32,
    /// Travel heading. Its length may exceed 1 between ticks; it is
    /// normalized before use.
    pub velocity_direction: Vec3,
    pub gravity_speed: f32,
    pub horizontal_rotation: Quat,
    pub vertical_rotation: Quat,
    pub roll_rotation: Quat,
    pub final_rotation: Quat,
    /// `final_rotation * FORWARD`, cached after each rotation update.
    pub forward: Vec3,
    /// Extra force added by charging while airborne; consumed each tick.
    pub charge_force: Vec3,
}

impl MotionState {
    /// Facing `yaw_degrees` around up, level.
    pub fn new(yaw_degrees: f32) -> Self {
        let horizontal_rotation = euler_deg(0.0, yaw_degrees, 0.0);
        Self {
            speed: 0.0,
            velocity_direction: Vec3::ZERO,
            gravity_speed: 0.0,
            horizontal_rotation,
            vertical_rotation: Quat::IDENTITY,
            roll_rotation: Quat::IDENTITY,
            final_rotation: horizontal_rotation,
            forward: horizontal_rotation * FORWARD,
            charge_force: Vec3::ZERO,
        }
    }

    pub fn enter_grounded(&mut self) {
        self.gravity_speed = 0.0;
        self.velocity_direction = Vec3::ZERO;
        self.vertical_rotation = Quat::IDENTITY;
    }

    /// Split the current mesh orientation into pitch and roll so the
    /// airborne controls continue from the pose the player left the ground in.
    pub fn enter_airborne(&mut self) {
        let euler = to_euler_deg(self.final_rotation);
        self.vertical_rotation = euler_deg(euler.x, 0.0, 0.0);
        self.roll_rotation = euler_deg(0.0, 0.0, euler.z);
        self.gravity_speed = 0.0;
        self.velocity_direction = Vec3::ZERO;
    }
}

impl Default for MotionState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Read-only inputs shared by every step of one tick.
pub struct TickContext<'a> {
    pub config: &'a LocomotionConfig,
    pub multipliers: &'a StatMultipliers,
    pub input: &'a PlayerInputs,
    pub dt: f32,
}

/// Nominal ground top speed after stat scaling.
pub fn max_ground_speed(config: &LocomotionConfig, multipliers: &StatMultipliers) -> f32 {
    config.max_forward_ground_speed * multipliers.weight_speed * multipliers.top_speed
}
