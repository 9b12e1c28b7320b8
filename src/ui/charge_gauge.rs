use log::info;
use serde::Serialize;

/// Values the charge meter presentation layer renders each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChargeGauge {
    /// Meter fill: charge progress, or remaining burnout while burnt out.
    pub fill_ratio: f32,
    /// How long full charge has been held; `0` once burnout starts.
    pub expiration_ratio: f32,
    pub burnout_active: bool,
}

/// Optional presentation sink a controller pushes its gauge to once per tick.
pub trait ChargeGaugeSink {
    fn present(&mut self, gauge: &ChargeGauge);
}

/// Headless meter: keeps the latest gauge and logs burnout edges.
#[derive(Debug, Default)]
pub struct ChargeHud {
    label: String,
    last: ChargeGauge,
    burnouts: u32,
}

impl ChargeHud {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn last(&self) -> ChargeGauge {
        self.last
    }

    pub fn burnouts(&self) -> u32 {
        self.burnouts
    }
}

impl ChargeGaugeSink for ChargeHud {
    fn present(&mut self, gauge: &ChargeGauge) {
        if gauge.burnout_active && !self.last.burnout_active {
            self.burnouts += 1;
            info!("[{}] charge burnt out", self.label);
        } else if !gauge.burnout_active && self.last.burnout_active {
            info!("[{}] burnout recovered", self.label);
        }
        self.last = *gauge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_burnout_edges_once() {
        let mut hud = ChargeHud::new("p0");
        let burnt = ChargeGauge {
            fill_ratio: 1.0,
            expiration_ratio: 0.0,
            burnout_active: true,
        };
        hud.present(&burnt);
        hud.present(&burnt);
        assert_eq!(hud.burnouts(), 1);
        hud.present(&ChargeGauge::default());
        assert!(!hud.last().burnout_active);
    }
}
