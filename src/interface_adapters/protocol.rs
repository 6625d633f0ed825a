// Wire protocol DTOs and conversions for public viewer messages.
// Chat and prediction service DTOs live with their clients.

use crate::domain::{GameStage, Team, TeamPair};
use crate::use_cases::{BoomSnapshot, PlayerSnapshot, WorldUpdate};
use serde::Serialize;

/// Messages the server sends to connected viewers over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // Snapshot of the match for a given frame.
    WorldUpdate(WorldUpdateDto),
    // Stage transitions (wagering, signup, playing, game over).
    Stage(StageDto),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageDto {
    Wagering,
    Signup,
    Playing,
    GameOver,
}

impl From<GameStage> for StageDto {
    fn from(stage: GameStage) -> Self {
        match stage {
            GameStage::Wagering => StageDto::Wagering,
            GameStage::Signup => StageDto::Signup,
            GameStage::Playing => StageDto::Playing,
            GameStage::GameOver => StageDto::GameOver,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub frame: u64,
    pub stage: StageDto,
    pub players: Vec<PlayerStateDto>,
    pub booms: Vec<BoomStateDto>,
    pub scores: ScoresDto,
    pub target_score: f64,
    pub winner: Option<&'static str>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            frame: update.frame,
            stage: update.stage.into(),
            players: update.players.iter().map(PlayerStateDto::from).collect(),
            booms: update.booms.iter().map(BoomStateDto::from).collect(),
            scores: update.scores.into(),
            target_score: update.target_score,
            winner: update.winner.map(Team::as_str),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerStateDto {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub charge: f64,
    pub team: Option<&'static str>,
    pub color: Option<&'static str>,
}

impl From<&PlayerSnapshot> for PlayerStateDto {
    fn from(player: &PlayerSnapshot) -> Self {
        Self {
            name: player.name.clone(),
            x: player.x,
            y: player.y,
            angle: player.angle,
            charge: player.charge,
            team: player.team.map(Team::as_str),
            color: player.color,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoomStateDto {
    pub player_name: String,
    pub team: &'static str,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub max_radius: f64,
    pub complete: bool,
    pub z_index: usize,
    pub color: &'static str,
}

impl From<&BoomSnapshot> for BoomStateDto {
    fn from(boom: &BoomSnapshot) -> Self {
        Self {
            player_name: boom.player_name.clone(),
            team: boom.team.as_str(),
            x: boom.x,
            y: boom.y,
            radius: boom.radius,
            max_radius: boom.max_radius,
            complete: boom.complete,
            z_index: boom.z_index,
            color: boom.color,
        }
    }
}

/// Normalized team scores in `[0, 1]`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoresDto {
    pub red: f64,
    pub blue: f64,
}

impl From<TeamPair<f64>> for ScoresDto {
    fn from(scores: TeamPair<f64>) -> Self {
        Self {
            red: scores.red,
            blue: scores.blue,
        }
    }
}
