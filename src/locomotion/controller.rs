use glam::{Quat, Vec3};
use log::{debug, trace};
use serde::Serialize;

use crate::config::LocomotionConfig;
use crate::engine::input::PlayerInputs;
use crate::fsm::StateMachine;
use crate::math::{FORWARD, UP};
use crate::stats::{PlayerStats, StatMultipliers};
use crate::ui::{ChargeGauge, ChargeGaugeSink};

use super::airborne::{self, AirborneData};
use super::charge::ChargeState;
use super::grounded::{self, GroundedData};
use super::sensor::{is_surface_climbable, GroundProbe, GroundQuery, GroundSensor};
use super::{MotionState, TickContext};

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// The two locomotion states, each carrying its own per-state data.
#[derive(Debug, Clone, PartialEq)]
pub enum LocomotionState {
    Grounded(GroundedData),
    Airborne(AirborneData),
}

/// Data-free tag of a [`LocomotionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocomotionKind {
    Grounded,
    Airborne,
}

impl LocomotionState {
    pub fn kind(&self) -> LocomotionKind {
        match self {
            Self::Grounded(_) => LocomotionKind::Grounded,
            Self::Airborne(_) => LocomotionKind::Airborne,
        }
    }
}

/// Everything the host applies after one fixed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// New rigidbody velocity. `None` on a transition tick: the integrator
    /// keeps whatever velocity it had.
    pub velocity: Option<Vec3>,
    pub mesh_rotation: Quat,
    /// Mesh position relative to the body.
    pub mesh_offset: Vec3,
    pub gauge: ChargeGauge,
    /// Set when this tick changed state.
    pub transitioned: Option<LocomotionKind>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// One player's locomotion: state machine, motion, charge and ground history.
///
/// The host calls [`fixed_update`](Self::fixed_update) once per physics tick
/// with a ray query over its world and the input snapshot for that tick, then
/// writes the returned velocity and mesh pose. Starts airborne.
pub struct PlayerController {
    fsm: StateMachine<LocomotionState>,
    motion: MotionState,
    charge: ChargeState,
    sensor: GroundSensor,
    config: LocomotionConfig,
    stats: PlayerStats,
    multipliers: StatMultipliers,
    mesh_pivot: Vec3,
    gauge_sink: Option<Box<dyn ChargeGaugeSink + Send + Sync>>,
}

impl PlayerController {
    pub fn new(config: LocomotionConfig, stats: PlayerStats, yaw_degrees: f32) -> Self {
        let multipliers = StatMultipliers::from_stats(&stats);
        let airborne = AirborneData::new(&config, &stats, &multipliers);
        Self {
            fsm: StateMachine::new(LocomotionState::Airborne(airborne)),
            motion: MotionState::new(yaw_degrees),
            charge: ChargeState::new(&config),
            sensor: GroundSensor::new(),
            config,
            stats,
            multipliers,
            mesh_pivot: Vec3::ZERO,
            gauge_sink: None,
        }
    }

    /// Offset of the visual mesh from the body, in the body's unrotated frame.
    pub fn with_mesh_pivot(mut self, pivot: Vec3) -> Self {
        self.mesh_pivot = pivot;
        self
    }

    pub fn with_gauge_sink(mut self, sink: Box<dyn ChargeGaugeSink + Send + Sync>) -> Self {
        self.gauge_sink = Some(sink);
        self
    }

    pub fn state(&self) -> &LocomotionState {
        &self.fsm.state
    }

    pub fn kind(&self) -> LocomotionKind {
        self.fsm.state.kind()
    }

    pub fn is_grounded(&self) -> bool {
        self.kind() == LocomotionKind::Grounded
    }

    /// Seconds since the last transition.
    pub fn time_in_state(&self) -> f32 {
        self.fsm.elapsed
    }

    pub fn airborne_data(&self) -> Option<&AirborneData> {
        match &self.fsm.state {
            LocomotionState::Airborne(data) => Some(data),
            LocomotionState::Grounded(_) => None,
        }
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Host-side overrides such as respawning.
    pub fn motion_mut(&mut self) -> &mut MotionState {
        &mut self.motion
    }

    pub fn charge(&self) -> &ChargeState {
        &self.charge
    }

    pub fn charge_mut(&mut self) -> &mut ChargeState {
        &mut self.charge
    }

    pub fn sensor(&self) -> &GroundSensor {
        &self.sensor
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn multipliers(&self) -> &StatMultipliers {
        &self.multipliers
    }

    /// Replace the stats snapshot. Multipliers are re-derived and, while
    /// airborne, the airborne timer is rebuilt keeping its elapsed time.
    pub fn set_stats(&mut self, stats: PlayerStats) {
        self.stats = stats;
        self.multipliers = StatMultipliers::from_stats(&stats);
        if let LocomotionState::Airborne(data) = &mut self.fsm.state {
            data.rescale(&self.config, &self.stats, &self.multipliers);
        }
        debug!("Stats changed: {:?}", self.stats);
    }

    /// Saturating add, e.g. from a pickup.
    pub fn add_stats(&mut self, delta: PlayerStats) {
        self.set_stats(self.stats + delta);
    }

    /// Leave the ground now. No-op while already airborne, so the landing
    /// cooldown keeps running.
    pub fn force_airborne(&mut self) -> bool {
        self.enter(LocomotionKind::Airborne)
    }

    pub fn fixed_update(
        &mut self,
        query: &impl GroundQuery,
        position: Vec3,
        input: &PlayerInputs,
        dt: f32,
    ) -> TickOutput {
        let offset = match self.fsm.state {
            LocomotionState::Airborne(_) => self.motion.final_rotation * FORWARD,
            LocomotionState::Grounded(_) => Vec3::ZERO,
        };
        let probe = self.sensor.probe(query, position, offset, &self.config);

        let transitioned = self.check_transition(&probe, dt);
        if let Some(next) = transitioned {
            self.enter(next);
        }

        let velocity = if transitioned.is_some() {
            None
        } else {
            let velocity = self.advance(query, position, &probe, input, dt);
            self.fsm.tick(dt);
            Some(velocity)
        };

        let gauge = self.charge.gauge();
        if let Some(sink) = self.gauge_sink.as_mut() {
            sink.present(&gauge);
        }

        trace!(
            "{:?} speed={:.2} gravity={:.2} velocity={:?}",
            self.kind(),
            self.motion.speed,
            self.motion.gravity_speed,
            velocity
        );

        TickOutput {
            velocity,
            mesh_rotation: self.motion.final_rotation,
            mesh_offset: self.motion.final_rotation * self.mesh_pivot,
            gauge,
            transitioned,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_transition(&mut self, probe: &GroundProbe, dt: f32) -> Option<LocomotionKind> {
        let max_slope = self.config.max_climbable_slope_angle;
        match &mut self.fsm.state {
            LocomotionState::Grounded(_) => {
                let Some(hit) = probe.hit else {
                    return Some(LocomotionKind::Airborne);
                };
                let too_steep = self.sensor.surface_changed()
                    && !is_surface_climbable(hit.normal, self.sensor.reference_normal(), max_slope);
                too_steep.then_some(LocomotionKind::Airborne)
            }
            LocomotionState::Airborne(data) => {
                data.grounded_cooldown += dt;
                let can_land = data.grounded_cooldown.expired()
                    && probe.counts_as_ground
                    && probe
                        .hit
                        .is_some_and(|hit| is_surface_climbable(hit.normal, UP, max_slope));
                can_land.then_some(LocomotionKind::Grounded)
            }
        }
    }

    /// Run exit/enter hooks for `next`. Returns `false` when already there.
    fn enter(&mut self, next: LocomotionKind) -> bool {
        let from = self.kind();
        if from == next {
            return false;
        }

        let state = match next {
            LocomotionKind::Airborne => {
                self.sensor.reset_history();
                self.motion.enter_airborne();
                LocomotionState::Airborne(AirborneData::new(&self.config, &self.stats, &self.multipliers))
            }
            LocomotionKind::Grounded => {
                self.motion.enter_grounded();
                LocomotionState::Grounded(GroundedData::default())
            }
        };
        self.fsm.go(state);
        debug!("Locomotion {:?} -> {:?} (speed {:.2})", from, next, self.motion.speed);
        true
    }

    fn advance(
        &mut self,
        query: &impl GroundQuery,
        position: Vec3,
        probe: &GroundProbe,
        input: &PlayerInputs,
        dt: f32,
    ) -> Vec3 {
        let ctx = TickContext {
            config: &self.config,
            multipliers: &self.multipliers,
            input,
            dt,
        };
        match &mut self.fsm.state {
            LocomotionState::Grounded(data) => {
                let center = probe.hit.map_or(UP, |hit| hit.normal);
                data.average_normal = self.sensor.average_normal(
                    query,
                    position,
                    self.motion.final_rotation,
                    center,
                    &self.config,
                );
                grounded::update(data, &mut self.motion, &mut self.charge, &ctx)
            }
            LocomotionState::Airborne(data) => {
                airborne::update(data, &mut self.motion, &mut self.charge, &ctx)
            }
        }
    }
}
