// Domain layer: core simulation types and rules.

pub mod geometry;
pub mod ports;
pub mod state;
pub mod systems;
pub mod tuning;

pub use geometry::{BoundingBox, Circle, Point, ScanBounds};
pub use ports::{PortError, PredictionDetails, PredictionOutcome, PredictionService, RandomSource};
pub use state::{Arena, Boom, GameStage, GameState, Player, Team, TeamPair, TeamPalette};
