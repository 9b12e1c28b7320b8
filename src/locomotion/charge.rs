use glam::Vec3;

use crate::config::LocomotionConfig;
use crate::math::{move_towards, FORWARD, UP};
use crate::timer::Timer;
use crate::ui::ChargeGauge;

use super::{MotionState, TickContext};

/// Releasing a charge only boosts while speed is at most this multiple of the
/// nominal ground top speed.
const BOOST_SPEED_LIMIT: f32 = 1.5;

/// Hold-to-charge, release-to-boost, overhold-to-burn-out.
///
/// While grounded the charge fills with input and, once full, an expiration
/// window starts. Outlasting that window burns the charge out: the ratio drops
/// to zero and nothing can charge until the burnout window has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeState {
    pub charge_timer: Timer,
    pub expiration_timer: Timer,
    pub burnout_timer: Timer,
    pub ratio: f32,
}

impl ChargeState {
    pub fn new(config: &LocomotionConfig) -> Self {
        Self {
            charge_timer: Timer::new(config.charge_time),
            expiration_timer: Timer::new(config.charge_expiration_time),
            burnout_timer: Timer::new(config.charge_burnout_time),
            ratio: 0.0,
        }
    }

    fn reset_timers(&mut self) {
        self.charge_timer.reset();
        self.expiration_timer.reset();
        self.burnout_timer.reset();
    }

    pub fn burnout_active(&self) -> bool {
        self.expiration_timer.expired()
    }

    pub fn gauge(&self) -> ChargeGauge {
        if self.burnout_active() {
            ChargeGauge {
                fill_ratio: 1.0 - self.burnout_timer.ratio(),
                expiration_ratio: 0.0,
                burnout_active: true,
            }
        } else {
            ChargeGauge {
                fill_ratio: self.charge_timer.ratio(),
                expiration_ratio: self.expiration_timer.ratio(),
                burnout_active: false,
            }
        }
    }

    /// Grounded overlay. `acceleration` is the forward acceleration already
    /// added this tick and `max_speed` the nominal ground top speed.
    pub fn apply_grounded(
        &mut self,
        motion: &mut MotionState,
        acceleration: f32,
        max_speed: f32,
        ctx: &TickContext,
    ) {
        let config = ctx.config;
        let multipliers = ctx.multipliers;
        let charging = ctx.input.is_charging;
        let horizontal_direction = motion.horizontal_rotation * FORWARD;

        if charging {
            // Charging cancels this tick's acceleration and brakes, less so
            // while the heading and travel direction disagree.
            motion.speed -= acceleration;
            let alignment = horizontal_direction
                .normalize_or_zero()
                .dot(motion.velocity_direction.normalize_or_zero())
                .clamp(0.0, 1.0);
            let stop_on_turn = 1.0
                + config.charge_time_to_stop_when_turning_percentage_denominator * (1.0 - alignment);
            let max_delta =
                acceleration * config.ground_break_speed / stop_on_turn * multipliers.weight_charge;
            motion.speed = move_towards(motion.speed, 0.0, max_delta);
        } else if self.ratio != 0.0 {
            let boost = config.boost_speed * self.ratio.clamp(0.0, 1.0) * multipliers.boost;
            if motion.speed <= max_speed * BOOST_SPEED_LIMIT {
                motion.speed += boost;
            }
            motion.velocity_direction = horizontal_direction;
        }

        if charging && !self.expiration_timer.expired() {
            self.charge_timer += ctx.dt * multipliers.charge;
            self.ratio = self.charge_timer.ratio();
            if self.charge_timer.expired() {
                self.expiration_timer += ctx.dt;
            }
        } else if self.ratio != 0.0 {
            self.ratio = 0.0;
            self.reset_timers();
        }

        if self.expiration_timer.expired() {
            self.ratio = 0.0;
            self.burnout_timer += ctx.dt;
            if self.burnout_timer.expired() {
                self.reset_timers();
            }
        }
    }

    /// Airborne overlay: charging dives instead of braking, and the charge
    /// fills slowly on its own without ever expiring.
    pub fn apply_airborne(&mut self, motion: &mut MotionState, ctx: &TickContext) {
        if ctx.input.is_charging {
            motion.charge_force = airborne_charge_force(motion.speed, ctx.config.gravity_scale);
        }

        self.charge_timer += ctx.config.passive_air_charge_gain * ctx.dt;
        self.ratio = self.charge_timer.ratio();
        self.expiration_timer.reset();
    }
}

/// Downward pull charging applies while airborne.
pub fn airborne_charge_force(speed: f32, gravity_scale: f32) -> Vec3 {
    -UP * speed + -UP * gravity_scale * 2.0
}
