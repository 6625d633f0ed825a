use crate::domain::ports::RandomSource;
use crate::domain::state::{Player, Team, TeamPair};
use tracing::debug;

/// Target score (percent of the arena) with four or fewer players.
pub const BASE_TARGET_SCORE: f64 = 40.0;
/// Extra percent per two players above the baseline.
pub const TARGET_STEP_PER_TWO_PLAYERS: f64 = 5.0;
pub const MAX_TARGET_BONUS: f64 = 30.0;
const BASELINE_PLAYERS: f64 = 4.0;

/// Puts every unassigned player on the smaller team, in arrival order, and
/// refreshes everyone's colors. Ties go to a coin flip from `rng`.
///
/// Returns the resulting team sizes.
pub fn assign(players: &mut [Player], rng: &mut dyn RandomSource) -> TeamPair<u32> {
    let mut counts = TeamPair::<u32>::default();
    for team in players.iter().filter_map(|p| p.team) {
        *counts.get_mut(team) += 1;
    }

    for player in players.iter_mut().filter(|p| p.team.is_none()) {
        let team = if counts.blue > counts.red {
            Team::Red
        } else if counts.red > counts.blue {
            Team::Blue
        } else if rng.next_f64() > 0.5 {
            Team::Blue
        } else {
            Team::Red
        };
        *counts.get_mut(team) += 1;
        player.team = Some(team);
        debug!(player = %player.name, team = team.as_str(), "team assigned");
    }

    for player in players.iter_mut() {
        player.palette = player.team.map(Team::palette);
    }

    counts
}

/// Score (percent of the arena) needed to win with `player_count` players.
pub fn target_score(player_count: u32) -> f64 {
    let extra = (f64::from(player_count) - BASELINE_PLAYERS) / 2.0 * TARGET_STEP_PER_TWO_PLAYERS;
    BASE_TARGET_SCORE + extra.clamp(0.0, MAX_TARGET_BONUS)
}
