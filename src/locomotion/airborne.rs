use glam::Vec3;

use crate::config::LocomotionConfig;
use crate::math::{angle_deg, euler_deg, rotate_towards, sign, FORWARD, UP};
use crate::stats::{PlayerStats, StatMultipliers};
use crate::timer::Timer;

use super::charge::ChargeState;
use super::grounded::accelerate;
use super::{MotionState, TickContext};

/// Per-state data for [`LocomotionState::Airborne`](super::LocomotionState).
#[derive(Debug, Clone, PartialEq)]
pub struct AirborneData {
    /// Time in the air before gravity starts accumulating.
    pub airborne_timer: Timer,
    /// Minimum time in the air before the player may land again.
    pub grounded_cooldown: Timer,
    /// Pitch as a fraction of the limit on its side: `0` level, `1` at
    /// either limit.
    pub vertical_reduction: f32,
}

impl AirborneData {
    pub fn new(config: &LocomotionConfig, stats: &PlayerStats, multipliers: &StatMultipliers) -> Self {
        Self {
            airborne_timer: Timer::new(airborne_duration(config, stats, multipliers)),
            grounded_cooldown: Timer::new(config.grounded_cooldown),
            vertical_reduction: 0.0,
        }
    }

    /// Rebuild the airborne timer for new stats. Time already spent in the
    /// air carries over unchanged.
    pub fn rescale(&mut self, config: &LocomotionConfig, stats: &PlayerStats, multipliers: &StatMultipliers) {
        self.airborne_timer = self
            .airborne_timer
            .rescaled(airborne_duration(config, stats, multipliers));
    }
}

/// The glide stat contributes whole seconds: `glide / 2` truncates.
pub fn airborne_duration(config: &LocomotionConfig, stats: &PlayerStats, multipliers: &StatMultipliers) -> f32 {
    config.max_air_time * multipliers.glide + (stats.glide() / 2) as f32
}

/// Interpolates between `floor` at `t = 0` and `1` at `t = 1`.
fn reduction_multiplier(floor: f32, t: f32) -> f32 {
    floor + (1.0 - floor) * t
}

/// Pitch with clamping, then yaw and roll scaled by how steep the pitch is.
fn rotate(data: &mut AirborneData, motion: &mut MotionState, ctx: &TickContext) {
    let config = ctx.config;
    let steer = ctx.input.direction.x;
    let pitch_input = ctx.input.direction.y;

    let pitch = config.look_air_vertical_rotation_degs_per_second * pitch_input * ctx.dt;
    let mut delta = euler_deg(pitch, 0.0, 0.0);
    let angle = 90.0 - angle_deg(motion.vertical_rotation * delta * FORWARD, UP);

    // Nose-down input dives twice as fast once already below level.
    if angle <= 0.0 && sign(pitch_input) > 0.0 {
        delta = euler_deg(pitch * 2.0, 0.0, 0.0);
    }

    if angle <= -config.min_airborne_angle {
        motion.vertical_rotation = euler_deg(config.min_airborne_angle, 0.0, 0.0);
    } else if angle >= config.max_airborne_angle {
        motion.vertical_rotation = euler_deg(-config.max_airborne_angle, 0.0, 0.0);
    } else {
        motion.vertical_rotation *= delta;
    }

    let limit = if sign(angle) >= 0.0 {
        config.max_airborne_angle
    } else {
        -config.min_airborne_angle
    };
    data.vertical_reduction = angle / limit;
    let multiplier = reduction_multiplier(
        config.look_air_max_rotational_based_speed_multiplier,
        data.vertical_reduction,
    );

    let yaw = config.look_air_horizontal_rotation_degs_per_second * multiplier * ctx.multipliers.turn * ctx.dt * steer;
    motion.horizontal_rotation *= euler_deg(0.0, yaw, 0.0);

    motion.roll_rotation = rotate_towards(
        motion.roll_rotation,
        euler_deg(
            0.0,
            0.0,
            config.look_air_roll_rotation_max_rotation_angle * -steer * multiplier,
        ),
        config.air_roll_rotation_angle_per_second * ctx.dt,
    );

    motion.final_rotation = motion.horizontal_rotation * motion.vertical_rotation * motion.roll_rotation;
    motion.forward = motion.final_rotation * FORWARD;
}

/// One airborne tick. Returns the velocity for the integrator, which
/// replaces its current velocity.
pub fn update(
    data: &mut AirborneData,
    motion: &mut MotionState,
    charge: &mut ChargeState,
    ctx: &TickContext,
) -> Vec3 {
    let config = ctx.config;
    let multipliers = ctx.multipliers;

    rotate(data, motion, ctx);
    motion.velocity_direction = motion.forward;

    // Climbing costs top speed in proportion to how steep the climb is.
    let climb_reduction = if motion.velocity_direction.y > 0.0 {
        reduction_multiplier(
            config.look_air_max_rotational_based_speed_multiplier,
            1.0 - data.vertical_reduction,
        )
    } else {
        1.0
    };
    let max_speed = config.max_forward_air_speed
        * multipliers.weight_speed
        * multipliers.top_speed
        * climb_reduction;
    accelerate(motion, max_speed, config.seconds_to_reach_full_air_speed, ctx);

    let direction = motion.velocity_direction.normalize_or_zero();
    let mut velocity = direction * motion.speed * ctx.dt;
    velocity += UP * multipliers.glide * ctx.dt;
    velocity -= UP * multipliers.weight_glide * ctx.dt;

    data.airborne_timer += ctx.dt;
    if config.use_gravity && data.airborne_timer.expired() {
        motion.gravity_speed += config.gravity_scale;
        if sign(direction.y) > 0.0 {
            velocity.y = 0.0;
        }
        velocity -= UP * motion.gravity_speed * ctx.dt;
    }

    charge.apply_airborne(motion, ctx);
    velocity += motion.charge_force * ctx.dt;
    motion.charge_force = Vec3::ZERO;

    velocity
}
