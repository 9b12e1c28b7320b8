use glam::Vec2;
use log::{debug, warn};

/// Device-neutral input snapshot consumed once per fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInputs {
    /// `x` steers (positive = right). `y` pitches while airborne
    /// (positive = nose down).
    pub direction: Vec2,
    pub is_charging: bool,
    /// Carried for the host; locomotion does not brake on it.
    pub is_breaking: bool,
}

/// Raw action callbacks coming from a platform input backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Move(Vec2),
    Charge(f32),
    Brake(f32),
    Pause(f32),
}

struct InputSlot {
    reversed_fly_controls: bool,
    inputs: PlayerInputs,
}

/// Routes raw input events from local devices to per-player snapshots.
///
/// Slots are assigned in join order; a slot's index is the player index.
/// Events update the buffered snapshot immediately, while the simulation only
/// ever reads a copy taken at the start of a tick.
#[derive(Default)]
pub struct InputRouter {
    slots: Vec<InputSlot>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new local device and return its player index.
    pub fn join(&mut self, reversed_fly_controls: bool) -> usize {
        let index = self.slots.len();
        self.slots.push(InputSlot {
            reversed_fly_controls,
            inputs: PlayerInputs::default(),
        });
        debug!("Input slot {} joined (reversed fly controls: {})", index, reversed_fly_controls);
        index
    }

    pub fn player_count(&self) -> usize {
        self.slots.len()
    }

    pub fn dispatch(&mut self, player_index: usize, event: InputEvent) {
        let Some(slot) = self.slots.get_mut(player_index) else {
            warn!("Dropping {:?} for unknown input slot {}", event, player_index);
            return;
        };

        match event {
            InputEvent::Move(raw) => {
                let fly_sign = if slot.reversed_fly_controls { -1.0 } else { 1.0 };
                slot.inputs.direction = Vec2::new(raw.x, -raw.y * fly_sign);
            }
            InputEvent::Charge(value) => slot.inputs.is_charging = value > 0.0,
            InputEvent::Brake(value) => slot.inputs.is_breaking = value > 0.0,
            // Pausing is handled outside the simulation.
            InputEvent::Pause(_) => {}
        }
    }

    /// Copy of the player's current inputs, stable for the whole tick.
    /// Unknown slots read as neutral input.
    pub fn snapshot(&self, player_index: usize) -> PlayerInputs {
        self.slots
            .get(player_index)
            .map(|slot| slot.inputs)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_up_pitches_nose_up() {
        let mut router = InputRouter::new();
        let p = router.join(false);
        router.dispatch(p, InputEvent::Move(Vec2::new(0.5, 1.0)));
        assert_eq!(router.snapshot(p).direction, Vec2::new(0.5, -1.0));
    }

    #[test]
    fn reversed_fly_controls_flip_pitch_only() {
        let mut router = InputRouter::new();
        let p = router.join(true);
        router.dispatch(p, InputEvent::Move(Vec2::new(-1.0, 1.0)));
        assert_eq!(router.snapshot(p).direction, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn triggers_map_to_flags() {
        let mut router = InputRouter::new();
        let p = router.join(false);
        router.dispatch(p, InputEvent::Charge(0.8));
        router.dispatch(p, InputEvent::Brake(1.0));
        let inputs = router.snapshot(p);
        assert!(inputs.is_charging && inputs.is_breaking);

        router.dispatch(p, InputEvent::Charge(0.0));
        assert!(!router.snapshot(p).is_charging);
    }

    #[test]
    fn slots_are_independent_and_unknown_slots_are_ignored() {
        let mut router = InputRouter::new();
        let a = router.join(false);
        let b = router.join(false);
        router.dispatch(b, InputEvent::Charge(1.0));
        router.dispatch(7, InputEvent::Charge(1.0));
        assert!(!router.snapshot(a).is_charging);
        assert!(router.snapshot(b).is_charging);
        assert_eq!(router.snapshot(7), PlayerInputs::default());
        assert_eq!(router.player_count(), 2);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut router = InputRouter::new();
        let p = router.join(false);
        router.dispatch(p, InputEvent::Charge(1.0));
        let taken = router.snapshot(p);
        router.dispatch(p, InputEvent::Charge(0.0));
        assert!(taken.is_charging);
    }
}
