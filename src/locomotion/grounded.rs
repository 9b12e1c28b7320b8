use glam::Vec3;

use crate::math::{euler_deg, from_to_rotation, move_towards, rotate_towards, sign, signed_angle_y, FORWARD, UP};

use super::charge::ChargeState;
use super::{max_ground_speed, MotionState, TickContext};

/// Per-state data for [`LocomotionState::Grounded`](super::LocomotionState).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundedData {
    /// Smoothed terrain normal the vertical rotation follows.
    pub average_normal: Vec3,
}

impl Default for GroundedData {
    fn default() -> Self {
        Self { average_normal: UP }
    }
}

/// Heading, terrain-following pitch and cached forward.
fn rotate(data: &GroundedData, motion: &mut MotionState, ctx: &TickContext) {
    let config = ctx.config;
    let steer = ctx.input.direction.x;

    let mut yaw = config.look_grounded_rotation_degs_per_second * ctx.multipliers.turn * ctx.dt * steer;
    if ctx.input.is_charging {
        yaw += config.charge_rotation_speed_extra * ctx.dt * steer;
    }
    motion.horizontal_rotation *= euler_deg(0.0, yaw, 0.0);

    motion.vertical_rotation = rotate_towards(
        motion.vertical_rotation,
        from_to_rotation(UP, data.average_normal),
        config.follow_ground_rotation_angle_per_second * ctx.dt,
    );
    motion.final_rotation = motion.vertical_rotation * motion.horizontal_rotation;
    motion.forward = motion.final_rotation * FORWARD;
}

/// Pull the travel direction towards the heading. The correction is always
/// rotated 45/ride degrees past the heading, on the side that closes the gap,
/// so the kart drifts into turns instead of snapping.
fn steer_velocity(motion: &mut MotionState, ctx: &TickContext) {
    let config = ctx.config;
    let heading = motion.horizontal_rotation * FORWARD;
    let bias = 45.0 / (0.01 + config.ride_rotation_speed)
        * sign(signed_angle_y(motion.velocity_direction, heading));

    motion.velocity_direction += motion.horizontal_rotation
        * euler_deg(0.0, bias, 0.0)
        * FORWARD
        * config.ride_rotation_speed
        * ctx.multipliers.weight_turn
        * ctx.dt;
    motion.velocity_direction = motion
        .velocity_direction
        .clamp_length_max(config.max_turn_magnitude);
}

/// Linear acceleration towards `max_speed`, then a bounded pull back down
/// when above it. Returns this tick's acceleration.
pub(super) fn accelerate(motion: &mut MotionState, max_speed: f32, seconds_to_full: f32, ctx: &TickContext) -> f32 {
    let acceleration = ctx.dt / seconds_to_full * max_speed;
    motion.speed += acceleration;
    if motion.speed > max_speed {
        motion.speed = move_towards(
            motion.speed,
            max_speed,
            acceleration * ctx.config.speed_correction_factor,
        );
    }
    acceleration
}

/// One grounded tick. `data.average_normal` must already hold this tick's
/// sampled terrain normal. Returns the velocity for the integrator, which
/// replaces its current velocity.
pub fn update(
    data: &GroundedData,
    motion: &mut MotionState,
    charge: &mut ChargeState,
    ctx: &TickContext,
) -> Vec3 {
    rotate(data, motion, ctx);
    steer_velocity(motion, ctx);

    let max_speed = max_ground_speed(ctx.config, ctx.multipliers);
    let acceleration = accelerate(
        motion,
        max_speed,
        ctx.config.seconds_to_reach_full_ground_speed,
        ctx,
    );

    charge.apply_grounded(motion, acceleration, max_speed, ctx);

    motion.vertical_rotation * motion.velocity_direction.normalize_or_zero() * motion.speed * ctx.dt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocomotionConfig;
    use crate::engine::input::PlayerInputs;
    use crate::math::{angle_deg, RIGHT};
    use crate::stats::{PlayerStats, StatMultipliers};
    use glam::Vec2;

    const DT: f32 = 0.02;

    fn run(input: PlayerInputs, ticks: usize, normal: Vec3) -> (MotionState, Vec3) {
        let config = LocomotionConfig::default();
        let multipliers = StatMultipliers::from_stats(&PlayerStats::neutral());
        let mut charge = ChargeState::new(&config);
        let mut motion = MotionState::new(0.0);
        let data = GroundedData {
            average_normal: normal,
        };
        let mut velocity = Vec3::ZERO;
        for _ in 0..ticks {
            let ctx = TickContext {
                config: &config,
                multipliers: &multipliers,
                input: &input,
                dt: DT,
            };
            velocity = update(&data, &mut motion, &mut charge, &ctx);
        }
        (motion, velocity)
    }

    #[test]
    fn flat_ground_moves_forward() {
        let (motion, velocity) = run(PlayerInputs::default(), 50, UP);
        assert!(velocity.z > 0.0);
        assert!(velocity.y.abs() < 1e-4);
        assert!(angle_deg(velocity, FORWARD) < 15.0);
        assert!(motion.speed > 0.0);
    }

    #[test]
    fn steering_right_turns_heading_right() {
        let input = PlayerInputs {
            direction: Vec2::new(1.0, 0.0),
            ..PlayerInputs::default()
        };
        let (motion, _) = run(input, 10, UP);
        assert!(motion.forward.dot(RIGHT) > 0.0);
        // 50 deg/s for 0.2 s.
        let yaw = signed_angle_y(FORWARD, motion.forward);
        assert!((yaw - 10.0).abs() < 1e-2);
    }

    #[test]
    fn charging_adds_extra_yaw() {
        let input = PlayerInputs {
            direction: Vec2::new(1.0, 0.0),
            is_charging: true,
            ..PlayerInputs::default()
        };
        let (motion, _) = run(input, 10, UP);
        let yaw = signed_angle_y(FORWARD, motion.forward);
        assert!((yaw - 24.0).abs() < 1e-2);
    }

    #[test]
    fn pitch_follows_slope_at_bounded_rate() {
        let slope = euler_deg(-30.0, 0.0, 0.0) * UP;
        let (motion, _) = run(PlayerInputs::default(), 1, slope);
        let tilt = angle_deg(motion.vertical_rotation * UP, UP);
        // 110 deg/s for one 0.02 s tick.
        assert!((tilt - 2.2).abs() < 1e-2);

        let (motion, _) = run(PlayerInputs::default(), 50, slope);
        let tilt = angle_deg(motion.vertical_rotation * UP, UP);
        assert!((tilt - 30.0).abs() < 1e-2);
    }

    #[test]
    fn velocity_direction_is_bounded() {
        let input = PlayerInputs {
            direction: Vec2::new(1.0, 0.0),
            ..PlayerInputs::default()
        };
        let (motion, _) = run(input, 400, UP);
        assert!(motion.velocity_direction.length() <= 3.0 + 1e-4);
    }
}
