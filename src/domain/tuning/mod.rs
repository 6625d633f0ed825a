// Gameplay tuning, kept apart from runtime/server configuration.

pub mod boom;
pub mod player;

pub use boom::BoomTuning;
pub use player::PlayerTuning;
