// Use-case level inputs/outputs for the match loop.

use crate::domain::{Boom, GameStage, GameState, Player, PredictionDetails, Team, TeamPair};

/// Everything that can reach the match from outside, queued and applied
/// between frames in arrival order.
#[derive(Debug, Clone)]
pub enum GameEvent {
    PlayerJoined {
        name: String,
        team_hint: Option<Team>,
    },
    BoomTriggered {
        name: String,
    },
    PredictionOpened(PredictionDetails),
}

#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub charge: f64,
    pub team: Option<Team>,
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct BoomSnapshot {
    pub player_name: String,
    pub team: Team,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub max_radius: f64,
    pub complete: bool,
    pub z_index: usize,
    pub color: &'static str,
}

/// Read-only view of the match, published once per frame.
#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub frame: u64,
    pub stage: GameStage,
    pub players: Vec<PlayerSnapshot>,
    pub booms: Vec<BoomSnapshot>,
    pub scores: TeamPair<f64>,
    pub target_score: f64,
    pub winner: Option<Team>,
}

impl WorldUpdate {
    pub fn capture(frame: u64, state: &GameState) -> Self {
        Self {
            frame,
            stage: state.stage,
            players: state.players.iter().map(PlayerSnapshot::from).collect(),
            booms: state.booms.iter().map(BoomSnapshot::from).collect(),
            scores: state.scores,
            target_score: state.target_score,
            winner: state.winner,
        }
    }
}

impl From<&Player> for PlayerSnapshot {
    fn from(p: &Player) -> Self {
        Self {
            name: p.name.clone(),
            x: p.position.x,
            y: p.position.y,
            angle: p.angle,
            charge: p.charge,
            team: p.team,
            color: p.palette.map(|palette| palette.player),
        }
    }
}

impl From<&Boom> for BoomSnapshot {
    fn from(b: &Boom) -> Self {
        Self {
            player_name: b.player_name.clone(),
            team: b.team,
            x: b.origin.x,
            y: b.origin.y,
            radius: b.radius,
            max_radius: b.max_radius,
            complete: b.complete,
            z_index: b.z_index,
            color: b.color,
        }
    }
}
