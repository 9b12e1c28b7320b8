mod boxes;
mod physics;
mod pickup;
mod player;
mod raycast;

pub use boxes::{box_break_system, box_spawner_system, BoxBroken};
pub use physics::{physics_step, settle_falling, PHYSICS_DT};
pub use pickup::{pickup_system, Collected};
pub use player::locomotion_system;
pub use raycast::{StaticGeometry, StaticShape};
