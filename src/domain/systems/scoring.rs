use crate::domain::geometry::{Circle, ScanBounds};
use crate::domain::state::{Boom, Team, TeamPair};

/// Scan-line spacing used for scoring, in pixels.
pub const DEFAULT_BIN_SIZE: f64 = 1.0;

/// Estimates the area of `circle` not covered by any of `occluders`.
///
/// Sums horizontal chord lengths every `bin_size` pixels from the top of the
/// circle's bounding box to the bottom. On each line the occluders' chords are
/// clipped to the circle's chord, merged, and subtracted. The error is bounded
/// by the bin size.
pub fn estimate_compound_area(circle: &Circle, occluders: &[Circle], bin_size: f64) -> f64 {
    if !(bin_size > 0.0) || !(circle.r >= 0.0) {
        return 0.0;
    }

    let bb = circle.bounding_box();
    let lines = ((bb.max.y - bb.min.y) / bin_size).floor() as usize;
    let mut covered: Vec<ScanBounds> = Vec::with_capacity(occluders.len());
    let mut area = 0.0;

    for line in 0..=lines {
        let y = bb.min.y + line as f64 * bin_size;
        let Some(chord) = circle.scan_line_bounds(y) else {
            continue;
        };

        covered.clear();
        covered.extend(
            occluders
                .iter()
                .filter(|occluder| occluder.spans_y(y))
                .filter_map(|occluder| occluder.scan_line_bounds(y))
                .filter(|bounds| bounds.intersects(&chord))
                .map(|bounds| bounds.clipped_to(&chord)),
        );

        let remainder = chord.len() - merged_length(&mut covered);
        area += remainder.max(0.0) * bin_size;
    }

    area
}

/// Total length of the union of `intervals`. Sorts in place.
fn merged_length(intervals: &mut [ScanBounds]) -> f64 {
    intervals.sort_by(|a, b| a.x_min.total_cmp(&b.x_min));

    let mut total = 0.0;
    let mut run: Option<ScanBounds> = None;
    for next in intervals.iter() {
        run = match run {
            Some(mut open) if next.x_min <= open.x_max => {
                open.x_max = open.x_max.max(next.x_max);
                Some(open)
            }
            Some(closed) => {
                total += closed.len();
                Some(*next)
            }
            None => Some(*next),
        };
    }
    if let Some(open) = run {
        total += open.len();
    }
    total
}

/// Area a boom adds on top of the earlier booms it overlaps.
pub fn boom_contribution(booms: &[Boom], index: usize) -> f64 {
    let Some(boom) = booms.get(index) else {
        return 0.0;
    };
    let occluders: Vec<Circle> = boom
        .overlaps
        .iter()
        .filter_map(|&earlier| booms.get(earlier))
        .map(Boom::circle)
        .collect();
    estimate_compound_area(&boom.circle(), &occluders, DEFAULT_BIN_SIZE)
}

/// Per-team claimed area as a fraction of the arena, clamped to `[0, 1]`.
pub fn team_scores(booms: &[Boom], arena_area: f64) -> TeamPair<f64> {
    let mut scores = TeamPair::default();
    if !(arena_area > 0.0) {
        return scores;
    }
    for (index, boom) in booms.iter().enumerate() {
        *scores.get_mut(boom.team) += boom_contribution(booms, index);
    }
    for team in Team::ALL {
        let score = scores.get_mut(team);
        *score = (*score / arena_area).clamp(0.0, 1.0);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Point;
    use std::f64::consts::PI;

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point::new(x, y), r)
    }

    fn boom(team: Team, x: f64, y: f64, radius: f64, overlaps: Vec<usize>) -> Boom {
        Boom {
            player_name: "p".to_string(),
            team,
            origin: Point::new(x, y),
            radius,
            max_radius: radius,
            growth_rate: 15.0,
            complete: true,
            z_index: 1,
            color: team.palette().boom,
            overlaps,
        }
    }

    #[test]
    fn lone_circle_matches_analytic_area() {
        let area = estimate_compound_area(&circle(300.0, 200.0, 50.0), &[], 1.0);
        let exact = PI * 50.0 * 50.0;
        assert!((area - exact).abs() / exact < 0.01, "area {area}");
    }

    #[test]
    fn fractional_center_still_within_bin_error() {
        let area = estimate_compound_area(&circle(10.3, 7.6, 128.0), &[], 1.0);
        let exact = PI * 128.0 * 128.0;
        assert!((area - exact).abs() / exact < 0.01, "area {area}");
    }

    #[test]
    fn zero_radius_has_no_area() {
        assert_eq!(estimate_compound_area(&circle(0.0, 0.0, 0.0), &[], 1.0), 0.0);
    }

    #[test]
    fn coincident_occluder_covers_everything() {
        let c = circle(100.0, 100.0, 40.0);
        let area = estimate_compound_area(&c, &[c], 1.0);
        assert!(area.abs() < 1e-9, "area {area}");
    }

    #[test]
    fn disjoint_occluder_changes_nothing() {
        let c = circle(100.0, 100.0, 40.0);
        let alone = estimate_compound_area(&c, &[], 1.0);
        let with_far = estimate_compound_area(&c, &[circle(500.0, 100.0, 40.0)], 1.0);
        assert_eq!(alone, with_far);
    }

    #[test]
    fn half_covering_occluder_removes_about_half() {
        // A huge occluder whose left edge runs through the circle's center.
        let c = circle(0.0, 0.0, 50.0);
        let area = estimate_compound_area(&c, &[circle(10_000.0, 0.0, 10_000.0)], 1.0);
        let half = PI * 50.0 * 50.0 / 2.0;
        assert!((area - half).abs() / half < 0.02, "area {area}");
    }

    #[test]
    fn overlapping_occluders_are_not_double_subtracted() {
        let c = circle(0.0, 0.0, 50.0);
        let occluder = circle(40.0, 0.0, 30.0);
        let once = estimate_compound_area(&c, &[occluder], 1.0);
        let twice = estimate_compound_area(&c, &[occluder, occluder], 1.0);
        assert!((once - twice).abs() < 1e-9);
    }

    #[test]
    fn merging_handles_nested_and_disjoint_intervals() {
        let mut intervals = vec![
            ScanBounds { x_min: 5.0, x_max: 6.0 },
            ScanBounds { x_min: 0.0, x_max: 4.0 },
            ScanBounds { x_min: 1.0, x_max: 2.0 },
            ScanBounds { x_min: 4.0, x_max: 4.5 },
        ];
        assert_eq!(merged_length(&mut intervals), 5.5);
    }

    #[test]
    fn only_the_later_coincident_boom_is_discounted() {
        let booms = vec![
            boom(Team::Red, 200.0, 200.0, 30.0, vec![]),
            boom(Team::Blue, 200.0, 200.0, 30.0, vec![0]),
        ];
        let exact = PI * 30.0 * 30.0;
        assert!((boom_contribution(&booms, 0) - exact).abs() / exact < 0.01);
        assert!(boom_contribution(&booms, 1).abs() < 1e-9);
    }

    #[test]
    fn team_scores_are_normalized_by_arena_area() {
        let booms = vec![
            boom(Team::Red, 200.0, 200.0, 128.0, vec![]),
            boom(Team::Blue, 700.0, 700.0, 128.0, vec![]),
        ];
        let scores = team_scores(&booms, 1_000_000.0);
        let expected = PI * 128.0 * 128.0 / 1_000_000.0;
        assert!((scores.red - expected).abs() < 0.001, "red {}", scores.red);
        assert!((scores.blue - expected).abs() < 0.001, "blue {}", scores.blue);
    }

    #[test]
    fn team_scores_never_exceed_one() {
        let booms = vec![boom(Team::Red, 0.0, 0.0, 100.0, vec![])];
        let scores = team_scores(&booms, 100.0);
        assert_eq!(scores.red, 1.0);
        assert_eq!(scores.blue, 0.0);
    }
}
