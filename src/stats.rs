use std::ops::{Add, AddAssign};

use serde::Serialize;

pub const MAX_STAT_VALUE: i32 = 18;
pub const MIN_STAT_VALUE: i32 = -14;

/// The stat value every multiplier is neutral at.
pub const DEFAULT_STAT_VALUE: i32 = 2;

/// Floor for stat-derived multipliers. The over-default branch is negative
/// for very low stats on heavy players.
pub const MIN_MULTIPLIER: f32 = 0.05;

// (over_default, under_default) pairs per derived multiplier.
const TOP_SPEED_DEFAULTS: (i32, i32) = (8, 20);
const BOOST_DEFAULTS: (i32, i32) = (8, 20);
const CHARGE_DEFAULTS: (i32, i32) = (8, 20);
const TURN_DEFAULTS: (i32, i32) = (6, 20);
const GLIDE_DEFAULTS: (i32, i32) = (16, 32);
const WEIGHT_CHARGE_DEFAULTS: (i32, i32) = (8, 20);
const WEIGHT_GLIDE_DEFAULTS: (i32, i32) = (32, 64);
const WEIGHT_TURN_DEFAULTS: (i32, i32) = (4, 16);

fn clamp_stat(value: i32) -> i32 {
    value.clamp(MIN_STAT_VALUE, MAX_STAT_VALUE)
}

/// Nine bounded player stats. Every field stays within
/// `[MIN_STAT_VALUE, MAX_STAT_VALUE]`; addition saturates per field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerStats {
    boost: i32,
    charge: i32,
    defence: i32,
    glide: i32,
    health: i32,
    offence: i32,
    top_speed: i32,
    turn: i32,
    weight: i32,
}

macro_rules! stat_accessors {
    ($($field:ident, $setter:ident;)*) => {
        $(
            pub fn $field(&self) -> i32 {
                self.$field
            }

            pub fn $setter(&mut self, value: i32) {
                self.$field = clamp_stat(value);
            }
        )*
    };
}

impl PlayerStats {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        boost: i32,
        charge: i32,
        defence: i32,
        glide: i32,
        health: i32,
        offence: i32,
        top_speed: i32,
        turn: i32,
        weight: i32,
    ) -> Self {
        Self {
            boost: clamp_stat(boost),
            charge: clamp_stat(charge),
            defence: clamp_stat(defence),
            glide: clamp_stat(glide),
            health: clamp_stat(health),
            offence: clamp_stat(offence),
            top_speed: clamp_stat(top_speed),
            turn: clamp_stat(turn),
            weight: clamp_stat(weight),
        }
    }

    /// Every stat at the value where all multipliers are exactly `1.0`.
    pub fn neutral() -> Self {
        Self::splat(DEFAULT_STAT_VALUE)
    }

    pub fn splat(value: i32) -> Self {
        Self::new(value, value, value, value, value, value, value, value, value)
    }

    stat_accessors! {
        boost, set_boost;
        charge, set_charge;
        defence, set_defence;
        glide, set_glide;
        health, set_health;
        offence, set_offence;
        top_speed, set_top_speed;
        turn, set_turn;
        weight, set_weight;
    }
}

impl Add for PlayerStats {
    type Output = PlayerStats;

    fn add(self, rhs: PlayerStats) -> PlayerStats {
        PlayerStats::new(
            self.boost + rhs.boost,
            self.charge + rhs.charge,
            self.defence + rhs.defence,
            self.glide + rhs.glide,
            self.health + rhs.health,
            self.offence + rhs.offence,
            self.top_speed + rhs.top_speed,
            self.turn + rhs.turn,
            self.weight + rhs.weight,
        )
    }
}

impl AddAssign for PlayerStats {
    fn add_assign(&mut self, rhs: PlayerStats) {
        *self = *self + rhs;
    }
}

/// Kind of stat a pickup grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatType {
    All,
    Boost,
    Charge,
    Defence,
    Glide,
    Health,
    Offence,
    TopSpeed,
    Turn,
    Weight,
}

impl StatType {
    pub const ALL: [StatType; 10] = [
        StatType::All,
        StatType::Boost,
        StatType::Charge,
        StatType::Defence,
        StatType::Glide,
        StatType::Health,
        StatType::Offence,
        StatType::TopSpeed,
        StatType::Turn,
        StatType::Weight,
    ];

    /// Stat delta a pickup of this kind adds to its collector.
    pub fn pickup_stats(self) -> PlayerStats {
        let mut stats = PlayerStats::default();
        match self {
            StatType::All => stats = PlayerStats::splat(1),
            StatType::Boost => stats.set_boost(1),
            StatType::Charge => stats.set_charge(1),
            StatType::Defence => stats.set_defence(1),
            StatType::Glide => stats.set_glide(1),
            StatType::Health => stats.set_health(1),
            StatType::Offence => stats.set_offence(1),
            StatType::TopSpeed => stats.set_top_speed(1),
            StatType::Turn => stats.set_turn(1),
            StatType::Weight => stats.set_weight(1),
        }
        stats
    }
}

/// Map a stat to a velocity/rotation scalar.
///
/// The branch is chosen by `weight_stat` while the numerator uses `stat`:
/// weight decides which scale every other stat is read on. A weight of
/// exactly [`DEFAULT_STAT_VALUE`] yields `1.0` regardless of `stat`.
///
/// The [`MIN_MULTIPLIER`] floor only bites on heavy players (`weight_stat`
/// above the default) whose `stat` is far below the default, e.g. top speed
/// at `-6` or less, plus the weight-turn pair at the minimum weight.
pub fn stat_multiplier(stat: i32, over_default: i32, under_default: i32, weight_stat: i32) -> f32 {
    let multiplier = if weight_stat > DEFAULT_STAT_VALUE {
        (over_default - DEFAULT_STAT_VALUE + stat) as f32 / over_default as f32
    } else if weight_stat < DEFAULT_STAT_VALUE {
        (under_default - DEFAULT_STAT_VALUE + stat) as f32 / under_default as f32
    } else {
        1.0
    };
    multiplier.max(MIN_MULTIPLIER)
}

/// Direct weight-to-speed scalar; does not go through [`stat_multiplier`].
pub fn weight_speed_multiplier(weight: i32) -> f32 {
    if weight > DEFAULT_STAT_VALUE {
        (30.0 + weight as f32) / 32.0
    } else if weight < DEFAULT_STAT_VALUE {
        (62.0 + weight as f32) / 64.0
    } else {
        1.0
    }
}

/// Every multiplier the locomotion code reads, derived once per stat change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatMultipliers {
    pub top_speed: f32,
    pub boost: f32,
    pub charge: f32,
    pub turn: f32,
    pub glide: f32,
    pub weight_speed: f32,
    pub weight_charge: f32,
    pub weight_glide: f32,
    pub weight_turn: f32,
}

impl StatMultipliers {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        let w = stats.weight();
        let derive = |stat: i32, (over, under): (i32, i32)| stat_multiplier(stat, over, under, w);
        Self {
            top_speed: derive(stats.top_speed(), TOP_SPEED_DEFAULTS),
            boost: derive(stats.boost(), BOOST_DEFAULTS),
            charge: derive(stats.charge(), CHARGE_DEFAULTS),
            turn: derive(stats.turn(), TURN_DEFAULTS),
            glide: derive(stats.glide(), GLIDE_DEFAULTS),
            weight_speed: weight_speed_multiplier(w),
            weight_charge: derive(w, WEIGHT_CHARGE_DEFAULTS),
            weight_glide: derive(w, WEIGHT_GLIDE_DEFAULTS),
            weight_turn: derive(w, WEIGHT_TURN_DEFAULTS),
        }
    }
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self::from_stats(&PlayerStats::default())
    }
}
