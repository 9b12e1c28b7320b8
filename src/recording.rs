use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use serde::Serialize;
use thiserror::Error;

use crate::locomotion::{LocomotionKind, PlayerController};
use crate::ui::ChargeGauge;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("telemetry I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode tick record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub tick: u64,
    pub time: f32,
    pub state: LocomotionKind,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub speed: f32,
    pub gravity_speed: f32,
    pub charge_ratio: f32,
    pub gauge: ChargeGauge,
}

impl TickRecord {
    pub fn capture(tick: u64, time: f32, controller: &PlayerController, position: Vec3, velocity: Vec3) -> Self {
        let motion = controller.motion();
        Self {
            tick,
            time,
            state: controller.kind(),
            position: position.to_array(),
            velocity: velocity.to_array(),
            speed: motion.speed,
            gravity_speed: motion.gravity_speed,
            charge_ratio: controller.charge().ratio,
            gauge: controller.charge().gauge(),
        }
    }
}

/// Writes one JSON object per line.
pub struct Recorder<W: Write> {
    out: BufWriter<W>,
    records: u64,
}

impl Recorder<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            out: BufWriter::new(writer),
            records: 0,
        }
    }

    pub fn record(&mut self, record: &TickRecord) -> Result<(), RecordError> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W, RecordError> {
        self.out.into_inner().map_err(|e| RecordError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocomotionConfig;
    use crate::stats::PlayerStats;

    #[test]
    fn writes_one_json_object_per_line() {
        let controller = PlayerController::new(LocomotionConfig::default(), PlayerStats::neutral(), 0.0);
        let mut recorder = Recorder::new(Vec::new());
        for tick in 0..3 {
            let record = TickRecord::capture(tick, tick as f32 * 0.02, &controller, Vec3::Y, Vec3::ZERO);
            recorder.record(&record).unwrap();
        }
        assert_eq!(recorder.records(), 3);

        let bytes = recorder.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let value: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(value["tick"], 2);
        assert_eq!(value["state"], "Airborne");
        assert_eq!(value["gauge"]["burnout_active"], false);
    }
}
