mod charge_gauge;

pub use charge_gauge::{ChargeGauge, ChargeGaugeSink, ChargeHud};
