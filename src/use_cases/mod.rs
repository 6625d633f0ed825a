// Use cases layer: application workflows for the match server.

pub mod game;
pub mod session;
pub mod types;

pub use session::{MatchHandle, MatchSettings, spawn_match};
pub use types::{BoomSnapshot, GameEvent, PlayerSnapshot, WorldUpdate};
