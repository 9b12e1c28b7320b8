use std::ops::AddAssign;

/// Count-up timer used for cooldowns and charge windows.
///
/// `add` never clamps; callers reset the timer once they are done with it.
/// A zero-length timer is expired from the start and reports a ratio of `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds accumulated since the last reset.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn add(&mut self, delta: f32) {
        self.elapsed += delta.max(0.0);
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Progress in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Build a timer with a new duration that keeps the absolute elapsed time.
    /// Used when a stat change re-derives a timer's length mid-flight.
    pub fn rescaled(&self, duration: f32) -> Self {
        let mut timer = Timer::new(duration);
        timer.add(self.elapsed);
        timer
    }
}

impl AddAssign<f32> for Timer {
    fn add_assign(&mut self, delta: f32) {
        self.add(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_expired_with_full_ratio() {
        let timer = Timer::new(0.0);
        assert!(timer.expired());
        assert_eq!(timer.ratio(), 1.0);
    }

    #[test]
    fn expires_exactly_at_duration() {
        let mut timer = Timer::new(0.5);
        timer += 0.25;
        assert!(!timer.expired());
        assert!((timer.ratio() - 0.5).abs() < 1e-6);
        timer += 0.25;
        assert!(timer.expired());
    }

    #[test]
    fn ratio_stays_in_unit_range_past_duration() {
        let mut timer = Timer::new(1.0);
        timer.add(3.0);
        assert_eq!(timer.ratio(), 1.0);
        assert_eq!(timer.elapsed(), 3.0);
    }

    #[test]
    fn reset_clears_elapsed_only() {
        let mut timer = Timer::new(2.0);
        timer.add(1.5);
        timer.reset();
        assert_eq!(timer.elapsed(), 0.0);
        assert_eq!(timer.duration(), 2.0);
        assert!(!timer.expired());
    }

    #[test]
    fn rescale_keeps_absolute_elapsed() {
        let mut timer = Timer::new(1.0);
        timer.add(0.4);
        let rescaled = timer.rescaled(2.0);
        assert_eq!(rescaled.elapsed(), 0.4);
        assert_eq!(rescaled.duration(), 2.0);
        assert!((rescaled.ratio() - 0.2).abs() < 1e-6);
    }
}
