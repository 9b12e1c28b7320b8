use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Vec2, Vec3};
use hecs::World;
use log::{info, LevelFilter};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use simple_logger::SimpleLogger;

use kartflight::components::{Controller, LocalTransform, Velocity};
use kartflight::engine::time::FixedTimestep;
use kartflight::recording::{Recorder, TickRecord};
use kartflight::scene::test_scene::load_test_scene;
use kartflight::systems::{
    box_break_system, box_spawner_system, locomotion_system, physics_step, pickup_system, settle_falling,
    StaticGeometry, PHYSICS_DT,
};
use kartflight::ui::ChargeHud;
use kartflight::{InputEvent, InputRouter, LocomotionConfig, PlayerController, PlayerStats};

/// Render frame length the headless loop pretends to run at.
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "kartflight", about = "Headless kart/flight locomotion simulation")]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 10.0)]
    seconds: f32,

    /// Locomotion tuning file (TOML); defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Constant steering input, -1 (left) to 1 (right)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    steer: f32,

    /// Constant pitch input while airborne, -1 (climb) to 1 (dive)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pitch: f32,

    /// Start holding charge at this time (seconds)
    #[arg(long)]
    charge_at: Option<f32>,

    /// Release charge at this time (seconds)
    #[arg(long)]
    release_at: Option<f32>,

    /// Starting weight stat
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    weight: i32,

    /// Starting top speed stat
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    top_speed: i32,

    /// Starting glide stat
    #[arg(long, default_value_t = 2, allow_hyphen_values = true)]
    glide: i32,

    /// Seed for box drops and box contents
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Write per-tick JSON-lines telemetry to this file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn charging_at(&self, time: f32) -> bool {
        match (self.charge_at, self.release_at) {
            (Some(start), Some(end)) => time >= start && time < end,
            (Some(start), None) => time >= start,
            _ => false,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    SimpleLogger::new().with_level(args.log_level).init()?;

    let config = match &args.config {
        Some(path) => LocomotionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LocomotionConfig::default(),
    };

    let mut stats = PlayerStats::neutral();
    stats.set_weight(args.weight);
    stats.set_top_speed(args.top_speed);
    stats.set_glide(args.glide);

    let mut router = InputRouter::new();
    let slot = router.join(false);

    let controller = PlayerController::new(config, stats, 0.0).with_gauge_sink(Box::new(ChargeHud::new(format!("p{slot}"))));
    let mut world = World::new();
    let player = load_test_scene(&mut world, slot, controller);
    let geometry = StaticGeometry::collect(&world);
    info!("Scene loaded: {} static colliders", geometry.len());

    let mut recorder = match &args.record {
        Some(path) => Some(
            Recorder::create(path).with_context(|| format!("creating telemetry file {}", path.display()))?,
        ),
        None => None,
    };

    let mut rng = ChaCha12Rng::seed_from_u64(args.seed);
    let mut timestep = FixedTimestep::new(PHYSICS_DT);
    let mut tick: u64 = 0;
    let mut time = 0.0_f32;
    let mut collected = 0;
    let mut boxes_broken = 0;

    info!("Simulating {:.1}s at {:.0} Hz", args.seconds, 1.0 / PHYSICS_DT);
    while time < args.seconds {
        for _ in 0..timestep.advance(FRAME_DT) {
            router.dispatch(slot, InputEvent::Move(Vec2::new(args.steer, -args.pitch)));
            let charge = if args.charging_at(time) { 1.0 } else { 0.0 };
            router.dispatch(slot, InputEvent::Charge(charge));

            locomotion_system(&mut world, &geometry, &router, PHYSICS_DT);
            let contacts = physics_step(&mut world, &geometry, PHYSICS_DT);
            settle_falling(&mut world, &contacts);
            box_spawner_system(&mut world, &mut rng, PHYSICS_DT);
            boxes_broken += box_break_system(&mut world, &mut rng).len();
            collected += pickup_system(&mut world).len();

            if let Some(recorder) = recorder.as_mut() {
                let position = world.get::<&LocalTransform>(player)?.position;
                let velocity = world.get::<&Velocity>(player).map_or(Vec3::ZERO, |v| v.0);
                let controller = world.get::<&Controller>(player)?;
                recorder.record(&TickRecord::capture(tick, time, &controller.0, position, velocity))?;
            }

            tick += 1;
            time += PHYSICS_DT;
        }
    }

    let position = world.get::<&LocalTransform>(player)?.position;
    let controller = world.get::<&Controller>(player)?;
    info!(
        "Done after {} ticks: {:?} at {:?}, speed {:.1}, {} boxes broken, {} pickups, stats {:?}",
        tick,
        controller.0.kind(),
        position,
        controller.0.motion().speed,
        boxes_broken,
        collected,
        controller.0.stats()
    );

    if let Some(recorder) = recorder {
        let records = recorder.records();
        recorder.finish()?;
        info!("Wrote {} telemetry records", records);
    }
    Ok(())
}
