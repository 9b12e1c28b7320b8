//! Arcade kart/flight locomotion: a grounded/airborne state machine with a
//! charge-and-boost mechanic, plus a small ECS host that drives it headless.

pub mod components;
pub mod config;
pub mod engine;
pub mod fsm;
pub mod locomotion;
pub mod math;
pub mod recording;
pub mod scene;
pub mod stats;
pub mod systems;
pub mod timer;
pub mod ui;

pub use config::{ConfigError, LocomotionConfig};
pub use engine::input::{InputEvent, InputRouter, PlayerInputs};
pub use locomotion::{GroundQuery, LocomotionKind, PlayerController, RayHit, TickOutput};
pub use stats::{PlayerStats, StatMultipliers, StatType};
pub use timer::Timer;
