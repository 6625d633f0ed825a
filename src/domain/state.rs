// Domain-level simulation entities and the owned match state.

use crate::domain::geometry::{Circle, Point};
use crate::domain::ports::{PredictionDetails, RandomSource};
use crate::domain::systems::{booms, motion, scoring, teams};
use crate::domain::tuning::{BoomTuning, PlayerTuning};
use std::f64::consts::{PI, TAU};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Blue => "Blue",
        }
    }

    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Parses an exact team title ("Red" or "Blue").
    pub fn from_title(title: &str) -> Option<Team> {
        match title.trim() {
            "Red" => Some(Team::Red),
            "Blue" => Some(Team::Blue),
            _ => None,
        }
    }

    pub fn palette(self) -> TeamPalette {
        match self {
            Team::Red => TeamPalette {
                player: "#FFCCCC",
                boom: "#FF0000",
            },
            Team::Blue => TeamPalette {
                player: "#66CCFF",
                boom: "#0066FF",
            },
        }
    }
}

/// Display colors for a team's players and booms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamPalette {
    pub player: &'static str,
    pub boom: &'static str,
}

/// One value per team.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TeamPair<T> {
    pub red: T,
    pub blue: T,
}

impl<T> TeamPair<T> {
    pub fn get(&self, team: Team) -> &T {
        match team {
            Team::Red => &self.red,
            Team::Blue => &self.blue,
        }
    }

    pub fn get_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Red => &mut self.red,
            Team::Blue => &mut self.blue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStage {
    Wagering,
    Signup,
    Playing,
    GameOver,
}

impl GameStage {
    pub fn accepts_players(self) -> bool {
        matches!(self, GameStage::Signup | GameStage::Playing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Chat display name; unique within a match.
    pub name: String,
    /// Upper left corner of the sprite.
    pub position: Point,
    /// Heading in radians, 0 = +x, counter-clockwise on screen.
    pub angle: f64,
    // Travel-direction signs (+1/-1); only used to pick reflection formulas.
    pub x_dir: f64,
    pub y_dir: f64,
    pub sprite_width: f64,
    pub sprite_height: f64,
    /// Readiness in `[0, 1]`; sizes the next boom.
    pub charge: f64,
    pub team: Option<Team>,
    pub palette: Option<TeamPalette>,
}

impl Player {
    /// Spawns a player at a random position and heading inside the arena.
    pub fn spawn(
        name: String,
        team: Option<Team>,
        arena: Arena,
        tuning: &PlayerTuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let max_x = (arena.width - tuning.sprite_width).max(0.0);
        let max_y = (arena.height - tuning.sprite_height).max(0.0);
        let x = rng.next_f64() * max_x;
        let y = rng.next_f64() * max_y;
        let angle = TAU * rng.next_f64();

        let x_dir = if (PI / 2.0..3.0 * PI / 2.0).contains(&angle) {
            -1.0
        } else {
            1.0
        };
        let y_dir = if angle <= PI { -1.0 } else { 1.0 };

        Self {
            name,
            position: Point::new(x, y),
            angle,
            x_dir,
            y_dir,
            sprite_width: tuning.sprite_width,
            sprite_height: tuning.sprite_height,
            charge: tuning.starting_charge,
            team,
            palette: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boom {
    pub player_name: String,
    pub team: Team,
    pub origin: Point,
    pub radius: f64,
    pub max_radius: f64,
    /// Radius growth in pixels per second.
    pub growth_rate: f64,
    pub complete: bool,
    /// Render order only.
    pub z_index: usize,
    pub color: &'static str,
    /// Indices of earlier booms this one overlapped when it was created.
    /// Earlier booms occlude this one, so a later boom never takes over area
    /// that is already claimed.
    pub overlaps: Vec<usize>,
}

impl Boom {
    pub fn circle(&self) -> Circle {
        Circle::new(self.origin, self.radius)
    }
}

/// The whole match, owned by a single task and mutated only through the
/// methods below.
pub struct GameState {
    pub stage: GameStage,
    pub arena: Arena,
    pub players: Vec<Player>,
    pub booms: Vec<Boom>,
    pub team_counts: TeamPair<u32>,
    /// Normalized by arena area, in `[0, 1]`.
    pub scores: TeamPair<f64>,
    /// Percentage of the arena a team needs to win.
    pub target_score: f64,
    pub winner: Option<Team>,
    pub prediction: Option<PredictionDetails>,
    /// Match time in ms since `Playing` began.
    pub elapsed_ms: f64,
    /// Length of the last frame in ms.
    pub progress_ms: f64,
    player_tuning: PlayerTuning,
    boom_tuning: BoomTuning,
    rng: Box<dyn RandomSource>,
}

impl GameState {
    pub fn new(
        arena: Arena,
        player_tuning: PlayerTuning,
        boom_tuning: BoomTuning,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            stage: GameStage::Wagering,
            arena,
            players: Vec::new(),
            booms: Vec::new(),
            team_counts: TeamPair::default(),
            scores: TeamPair::default(),
            target_score: teams::BASE_TARGET_SCORE,
            winner: None,
            prediction: None,
            elapsed_ms: 0.0,
            progress_ms: 0.0,
            player_tuning,
            boom_tuning,
            rng,
        }
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn set_prediction(&mut self, details: PredictionDetails) {
        self.prediction = Some(details);
    }

    /// Wagering -> Signup. Returns false from any other stage.
    pub fn open_signup(&mut self) -> bool {
        if self.stage != GameStage::Wagering {
            return false;
        }
        self.stage = GameStage::Signup;
        info!("signup open");
        true
    }

    /// Signup -> Playing: balances teams once and resets the match clock.
    pub fn start_playing(&mut self) -> bool {
        if self.stage != GameStage::Signup {
            return false;
        }
        self.rebalance();
        self.stage = GameStage::Playing;
        self.elapsed_ms = 0.0;
        self.progress_ms = 0.0;
        info!(
            players = self.players.len(),
            red = self.team_counts.red,
            blue = self.team_counts.blue,
            target_score = self.target_score,
            "match started"
        );
        true
    }

    /// Adds a player on their first qualifying join. Returns false when the
    /// stage does not accept players or the name is already taken.
    pub fn add_player(&mut self, name: &str, team_hint: Option<Team>) -> bool {
        if !self.stage.accepts_players() || self.player(name).is_some() {
            return false;
        }

        let player = Player::spawn(
            name.to_string(),
            team_hint,
            self.arena,
            &self.player_tuning,
            self.rng.as_mut(),
        );
        info!(player = %name, team_hint = ?team_hint.map(Team::as_str), "player joined");
        self.players.push(player);

        if self.stage == GameStage::Playing {
            self.rebalance();
        }
        true
    }

    /// Creates a boom for the named player. Ignored outside `Playing` and for
    /// unknown players.
    pub fn trigger_boom(&mut self, name: &str) -> Option<usize> {
        if self.stage != GameStage::Playing {
            return None;
        }
        let player = self.players.iter_mut().find(|p| p.name == name)?;
        let boom = booms::trigger(player, &self.booms, self.team_counts, &self.boom_tuning)?;
        debug!(
            player = %boom.player_name,
            team = boom.team.as_str(),
            max_radius = boom.max_radius,
            overlaps = boom.overlaps.len(),
            "boom triggered"
        );
        self.booms.push(boom);
        Some(self.booms.len() - 1)
    }

    /// Advances one frame of `progress_ms` and evaluates the win condition.
    /// Returns the winner when this frame ended the match.
    pub fn step(&mut self, progress_ms: f64) -> Option<Team> {
        if self.stage != GameStage::Playing {
            return None;
        }
        let progress_ms = progress_ms.max(0.0);
        self.progress_ms = progress_ms;
        self.elapsed_ms += progress_ms;

        let motion_cfg = motion::MotionConfig {
            speed: self.player_tuning.speed,
            arena_width: self.arena.width,
            arena_height: self.arena.height,
        };
        let charge_rate = self.player_tuning.charge_rate_at(self.elapsed_ms);
        for player in &mut self.players {
            motion::advance(player, progress_ms, motion_cfg, self.rng.as_mut());
            motion::accumulate_charge(player, progress_ms, charge_rate);
        }

        for boom in self.booms.iter_mut().filter(|b| !b.complete) {
            booms::grow(boom, progress_ms);
        }

        self.scores = scoring::team_scores(&self.booms, self.arena.area());

        let winner = self.leading_team()?;
        self.winner = Some(winner);
        self.stage = GameStage::GameOver;
        info!(
            winner = winner.as_str(),
            red = self.scores.red,
            blue = self.scores.blue,
            elapsed_ms = self.elapsed_ms,
            "match over"
        );
        Some(winner)
    }

    /// First team, in evaluation order, at or over the target.
    fn leading_team(&self) -> Option<Team> {
        let threshold = self.target_score / 100.0;
        Team::ALL
            .into_iter()
            .find(|team| *self.scores.get(*team) >= threshold)
    }

    fn rebalance(&mut self) {
        self.team_counts = teams::assign(&mut self.players, self.rng.as_mut());
        let total = self.team_counts.red + self.team_counts.blue;
        self.target_score = teams::target_score(total);
    }
}
