use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for one player's locomotion. Every field has a default, so a
/// TOML file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    // Ground probe
    pub ground_ray_distance: f32,
    pub ground_rotation_ray_extra_distance: f32,
    /// Max gap between the collider's bottom and the probe hit for the hit to
    /// count as ground.
    pub distance_from_collider_to_count_as_ground_hit: f32,
    pub collider_height: f32,
    pub rotation_ray_count: usize,
    pub collidable_layers: u32,
    pub max_climbable_slope_angle: f32,

    // Airborne
    pub max_air_time: f32,
    pub grounded_cooldown: f32,
    pub use_gravity: bool,
    pub gravity_scale: f32,

    // Velocity
    pub seconds_to_reach_full_ground_speed: f32,
    pub seconds_to_reach_full_air_speed: f32,
    pub max_forward_ground_speed: f32,
    pub max_forward_air_speed: f32,
    pub speed_correction_factor: f32,

    // Rotation (degrees)
    pub look_grounded_rotation_degs_per_second: f32,
    pub look_air_horizontal_rotation_degs_per_second: f32,
    pub look_air_vertical_rotation_degs_per_second: f32,
    pub look_air_roll_rotation_max_rotation_angle: f32,
    pub look_air_max_rotational_based_speed_multiplier: f32,
    pub ride_rotation_speed: f32,
    pub charge_rotation_speed_extra: f32,
    pub max_turn_magnitude: f32,
    pub max_airborne_angle: f32,
    pub min_airborne_angle: f32,
    pub follow_ground_rotation_angle_per_second: f32,
    pub air_roll_rotation_angle_per_second: f32,

    // Charge
    pub charge_time: f32,
    pub charge_time_to_stop_when_turning_percentage_denominator: f32,
    pub charge_expiration_time: f32,
    pub charge_burnout_time: f32,
    pub boost_speed: f32,
    pub ground_break_speed: f32,
    pub passive_air_charge_gain: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            ground_ray_distance: 2.5,
            ground_rotation_ray_extra_distance: 0.0,
            distance_from_collider_to_count_as_ground_hit: 1.3,
            collider_height: 2.0,
            rotation_ray_count: 10,
            collidable_layers: u32::MAX,
            max_climbable_slope_angle: 80.0,

            max_air_time: 0.75,
            grounded_cooldown: 0.2,
            use_gravity: true,
            gravity_scale: 2.5,

            seconds_to_reach_full_ground_speed: 1.0,
            seconds_to_reach_full_air_speed: 0.3,
            max_forward_ground_speed: 600.0,
            max_forward_air_speed: 750.0,
            speed_correction_factor: 10.0,

            look_grounded_rotation_degs_per_second: 50.0,
            look_air_horizontal_rotation_degs_per_second: 160.0,
            look_air_vertical_rotation_degs_per_second: 80.0,
            look_air_roll_rotation_max_rotation_angle: 45.0,
            look_air_max_rotational_based_speed_multiplier: 0.3,
            ride_rotation_speed: 4.0,
            charge_rotation_speed_extra: 70.0,
            max_turn_magnitude: 3.0,
            max_airborne_angle: 80.0,
            min_airborne_angle: 55.0,
            follow_ground_rotation_angle_per_second: 110.0,
            air_roll_rotation_angle_per_second: 360.0,

            charge_time: 1.5,
            charge_time_to_stop_when_turning_percentage_denominator: 20.0,
            charge_expiration_time: 2.0,
            charge_burnout_time: 3.0,
            boost_speed: 1000.0,
            ground_break_speed: 1.0,
            passive_air_charge_gain: 0.1,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is below {min}")))
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is outside [{min}, {max}]")))
    }
}

impl LocomotionConfig {
    /// Load and validate a TOML config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        info!("Loaded locomotion config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: LocomotionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("ground_ray_distance", self.ground_ray_distance, 0.0)?;
        at_least(
            "ground_rotation_ray_extra_distance",
            self.ground_rotation_ray_extra_distance,
            0.0,
        )?;
        at_least(
            "distance_from_collider_to_count_as_ground_hit",
            self.distance_from_collider_to_count_as_ground_hit,
            0.0,
        )?;
        at_least("collider_height", self.collider_height, 0.0)?;
        if self.rotation_ray_count == 0 {
            return Err(invalid("rotation_ray_count", "must sample at least one ray"));
        }
        in_range("max_climbable_slope_angle", self.max_climbable_slope_angle, 0.0, 180.0)?;

        at_least("max_air_time", self.max_air_time, 0.0)?;
        at_least("grounded_cooldown", self.grounded_cooldown, 0.0)?;
        at_least("gravity_scale", self.gravity_scale, 0.0)?;

        at_least(
            "seconds_to_reach_full_ground_speed",
            self.seconds_to_reach_full_ground_speed,
            0.01,
        )?;
        at_least(
            "seconds_to_reach_full_air_speed",
            self.seconds_to_reach_full_air_speed,
            0.01,
        )?;
        at_least("max_forward_ground_speed", self.max_forward_ground_speed, 0.0)?;
        at_least("max_forward_air_speed", self.max_forward_air_speed, 0.01)?;
        at_least("speed_correction_factor", self.speed_correction_factor, 0.01)?;

        at_least(
            "look_grounded_rotation_degs_per_second",
            self.look_grounded_rotation_degs_per_second,
            0.0,
        )?;
        at_least(
            "look_air_horizontal_rotation_degs_per_second",
            self.look_air_horizontal_rotation_degs_per_second,
            0.0,
        )?;
        at_least(
            "look_air_vertical_rotation_degs_per_second",
            self.look_air_vertical_rotation_degs_per_second,
            0.0,
        )?;
        in_range(
            "look_air_roll_rotation_max_rotation_angle",
            self.look_air_roll_rotation_max_rotation_angle,
            0.0,
            90.0,
        )?;
        in_range(
            "look_air_max_rotational_based_speed_multiplier",
            self.look_air_max_rotational_based_speed_multiplier,
            0.0,
            1.0,
        )?;
        at_least("ride_rotation_speed", self.ride_rotation_speed, 0.0)?;
        at_least("charge_rotation_speed_extra", self.charge_rotation_speed_extra, 0.0)?;
        at_least("max_turn_magnitude", self.max_turn_magnitude, 0.01)?;
        // Both bounds must be non-zero: the airborne pitch ratio divides by them.
        in_range("max_airborne_angle", self.max_airborne_angle, 0.01, 80.0)?;
        in_range("min_airborne_angle", self.min_airborne_angle, 0.01, 80.0)?;
        at_least(
            "follow_ground_rotation_angle_per_second",
            self.follow_ground_rotation_angle_per_second,
            0.0,
        )?;
        at_least(
            "air_roll_rotation_angle_per_second",
            self.air_roll_rotation_angle_per_second,
            0.0,
        )?;

        at_least("charge_time", self.charge_time, 0.0)?;
        at_least(
            "charge_time_to_stop_when_turning_percentage_denominator",
            self.charge_time_to_stop_when_turning_percentage_denominator,
            0.0,
        )?;
        at_least("charge_expiration_time", self.charge_expiration_time, 0.0)?;
        at_least("charge_burnout_time", self.charge_burnout_time, 0.0)?;
        at_least("boost_speed", self.boost_speed, 0.0)?;
        at_least("ground_break_speed", self.ground_break_speed, 0.01)?;
        at_least("passive_air_charge_gain", self.passive_air_charge_gain, 0.0)?;
        Ok(())
    }
}
