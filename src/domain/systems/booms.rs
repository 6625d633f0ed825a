use crate::domain::state::{Boom, Player, TeamPair};
use crate::domain::tuning::BoomTuning;

/// Spawns a boom at the player's position and spends their charge.
///
/// Returns `None` for players without a team.
pub fn trigger(
    player: &mut Player,
    booms: &[Boom],
    team_counts: TeamPair<u32>,
    tuning: &BoomTuning,
) -> Option<Boom> {
    let team = player.team?;
    let charge = player.charge;
    player.charge = 0.0;

    let unscaled_radius = charge * tuning.radius_per_charge;

    // A team that outnumbers the other gets proportionally smaller booms.
    // With no opponents the ratio is infinite and the boom collapses to zero.
    let own = f64::from(*team_counts.get(team));
    let opposing = f64::from(*team_counts.get(team.other()));
    let team_ratio = own / opposing;
    let area_scale = (1.0 / team_ratio).min(1.0);
    let max_radius = (area_scale * unscaled_radius * unscaled_radius).sqrt();

    // Membership uses the unscaled radius of the new boom.
    let origin = player.position;
    let overlaps = booms
        .iter()
        .enumerate()
        .filter(|(_, existing)| {
            let reach = existing.max_radius + unscaled_radius;
            existing.origin.distance_sq(origin) < reach * reach
        })
        .map(|(index, _)| index)
        .collect();

    Some(Boom {
        player_name: player.name.clone(),
        team,
        origin,
        radius: 0.0,
        max_radius,
        growth_rate: tuning.growth_rate,
        complete: false,
        z_index: booms.len() + 1,
        color: team.palette().boom,
        overlaps,
    })
}

/// Grows an incomplete boom by `elapsed_ms` worth of its growth rate.
pub fn grow(boom: &mut Boom, elapsed_ms: f64) {
    if boom.complete {
        return;
    }
    boom.radius = (boom.radius + (elapsed_ms / 1000.0) * boom.growth_rate).min(boom.max_radius);
    if boom.radius >= boom.max_radius {
        boom.complete = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Point;
    use crate::domain::state::Team;

    fn player(name: &str, team: Team, x: f64, y: f64, charge: f64) -> Player {
        Player {
            name: name.to_string(),
            position: Point::new(x, y),
            angle: 0.0,
            x_dir: 1.0,
            y_dir: -1.0,
            sprite_width: 24.0,
            sprite_height: 24.0,
            charge,
            team: Some(team),
            palette: Some(team.palette()),
        }
    }

    const EVEN: TeamPair<u32> = TeamPair { red: 2, blue: 2 };

    #[test]
    fn full_charge_on_even_teams_reaches_full_radius() {
        let mut p = player("a", Team::Red, 100.0, 100.0, 1.0);
        let boom = trigger(&mut p, &[], EVEN, &BoomTuning::default()).expect("boom");

        assert_eq!(boom.max_radius, 128.0);
        assert_eq!(boom.radius, 0.0);
        assert_eq!(boom.z_index, 1);
        assert_eq!(boom.color, "#FF0000");
        assert!(boom.overlaps.is_empty());
        assert_eq!(p.charge, 0.0);
    }

    #[test]
    fn outnumbering_team_gets_smaller_booms() {
        let mut p = player("a", Team::Blue, 0.0, 0.0, 1.0);
        let counts = TeamPair { red: 1, blue: 4 };
        let boom = trigger(&mut p, &[], counts, &BoomTuning::default()).expect("boom");

        // sqrt(1/4) of the full radius.
        assert!((boom.max_radius - 64.0).abs() < 1e-9);
    }

    #[test]
    fn outnumbered_team_is_not_boosted() {
        let mut p = player("a", Team::Red, 0.0, 0.0, 0.5);
        let counts = TeamPair { red: 1, blue: 4 };
        let boom = trigger(&mut p, &[], counts, &BoomTuning::default()).expect("boom");
        assert!((boom.max_radius - 64.0).abs() < 1e-9);
    }

    #[test]
    fn unassigned_player_cannot_trigger() {
        let mut p = player("a", Team::Red, 0.0, 0.0, 1.0);
        p.team = None;
        assert!(trigger(&mut p, &[], EVEN, &BoomTuning::default()).is_none());
        assert_eq!(p.charge, 1.0);
    }

    #[test]
    fn overlap_set_lists_only_earlier_intersecting_booms() {
        let tuning = BoomTuning::default();
        let mut booms = Vec::new();

        let mut a = player("a", Team::Red, 0.0, 0.0, 1.0);
        booms.push(trigger(&mut a, &booms, EVEN, &tuning).expect("boom"));

        let mut far = player("far", Team::Blue, 1000.0, 0.0, 1.0);
        booms.push(trigger(&mut far, &booms, EVEN, &tuning).expect("boom"));

        // 200px from `a`: inside 128 + 128, outside reach of `far`.
        let mut b = player("b", Team::Blue, 200.0, 0.0, 1.0);
        let boom = trigger(&mut b, &booms, EVEN, &tuning).expect("boom");

        assert_eq!(boom.overlaps, vec![0]);
        assert!(booms.iter().all(|existing| existing.overlaps.is_empty()));
    }

    #[test]
    fn membership_uses_the_unscaled_radius() {
        let tuning = BoomTuning::default();
        let mut a = player("a", Team::Red, 0.0, 0.0, 1.0);
        let first = trigger(&mut a, &[], EVEN, &tuning).expect("boom");

        // Blue outnumbers red 4:1 so the new boom scales to 64px, but the
        // 250px gap is still within 128 + 128.
        let mut b = player("b", Team::Blue, 250.0, 0.0, 1.0);
        let counts = TeamPair { red: 1, blue: 4 };
        let boom = trigger(&mut b, &[first], counts, &tuning).expect("boom");

        assert!((boom.max_radius - 64.0).abs() < 1e-9);
        assert_eq!(boom.overlaps, vec![0]);
    }

    #[test]
    fn growth_is_monotonic_and_completes_once() {
        let mut p = player("a", Team::Red, 0.0, 0.0, 0.25);
        let mut boom = trigger(&mut p, &[], EVEN, &BoomTuning::default()).expect("boom");
        assert_eq!(boom.max_radius, 32.0);

        let mut last = boom.radius;
        let mut completions = 0;
        for _ in 0..200 {
            let was_complete = boom.complete;
            grow(&mut boom, 16.0);
            assert!(boom.radius >= last);
            assert!(boom.radius <= boom.max_radius);
            if boom.complete && !was_complete {
                completions += 1;
                assert_eq!(boom.radius, boom.max_radius);
            }
            last = boom.radius;
        }
        assert_eq!(completions, 1);
        assert!(boom.complete);
    }

    #[test]
    fn zero_radius_boom_completes_on_first_grow() {
        let mut p = player("a", Team::Red, 0.0, 0.0, 0.0);
        let mut boom = trigger(&mut p, &[], EVEN, &BoomTuning::default()).expect("boom");
        grow(&mut boom, 16.0);
        assert!(boom.complete);
        assert_eq!(boom.radius, 0.0);
    }
}
