/// Fixed step of the host's physics scheduler (50 Hz).
pub const FIXED_DT: f32 = 1.0 / 50.0;

/// Accumulates variable frame time and hands out whole fixed steps.
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add `frame_dt` seconds and return how many fixed steps are now due.
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FIXED_DT)
    }
}
