/// Gameplay tuning for booms.

#[derive(Debug, Clone, Copy)]
pub struct BoomTuning {
    /// Max radius in pixels of a boom triggered at full charge.
    pub radius_per_charge: f64,

    /// Radius growth in pixels per second.
    pub growth_rate: f64,
}

impl Default for BoomTuning {
    fn default() -> Self {
        Self {
            radius_per_charge: 128.0,
            growth_rate: 15.0,
        }
    }
}
