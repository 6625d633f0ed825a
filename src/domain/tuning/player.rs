/// Gameplay tuning for chat-controlled players.
///
/// Keep this separate from runtime/server configuration (tick rates, buffer sizes, etc.).
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct PlayerTuning {
    /// Travel speed in pixels per second.
    pub speed: f64,

    /// Sprite extents in pixels; the motion bounds shrink by these.
    pub sprite_width: f64,
    pub sprite_height: f64,

    /// Charge a player starts with when they join.
    pub starting_charge: f64,

    /// Charge gained per second at the start of a match.
    pub base_charge_rate: f64,

    /// Added to the charge rate once per `charge_ramp_interval` of match time.
    pub charge_rate_step: f64,
    pub charge_ramp_interval: Duration,
}

impl PlayerTuning {
    /// Global charge rate after `elapsed_ms` of match time.
    pub fn charge_rate_at(&self, elapsed_ms: f64) -> f64 {
        let interval_ms = self.charge_ramp_interval.as_secs_f64() * 1000.0;
        if interval_ms <= 0.0 {
            return self.base_charge_rate;
        }
        let steps = (elapsed_ms / interval_ms).floor().max(0.0);
        self.base_charge_rate + self.charge_rate_step * steps
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 500.0,
            sprite_width: 24.0,
            sprite_height: 24.0,
            starting_charge: 0.5,
            base_charge_rate: 0.03,
            charge_rate_step: 0.01,
            charge_ramp_interval: Duration::from_secs(10),
        }
    }
}
