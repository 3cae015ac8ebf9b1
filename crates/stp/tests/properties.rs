//! Property tests for the round loop on random and synthetic networks.

use proptest::prelude::*;
use stp::api::{
    draw_grid_network, drop_conflicting, find_conflicts, generate_all, GridNetworkCfg, Line,
    Outcome, PlacementParams, PlanarEngine, ReplayToken, Resolver,
};

const SPACING: f64 = 10.0;
const SEPARATION: f64 = 8.0;

fn params() -> PlacementParams {
    PlacementParams::new(SPACING, SEPARATION).with_max_iterations(20)
}

fn random_lines() -> impl Strategy<Value = Vec<Line>> {
    let line = prop::collection::vec((0.0f64..150.0, 0.0f64..150.0), 2..5);
    prop::collection::vec(line, 1..7).prop_map(|coords| {
        coords
            .iter()
            .enumerate()
            .map(|(i, c)| Line::from_xy(i as u64 + 1, c))
            .collect()
    })
}

fn small_grid(seed: u64) -> Vec<Line> {
    let cfg = GridNetworkCfg {
        blocks_x: 2,
        blocks_y: 2,
        block_size: 60.0,
        sidewalk_offset: 6.0,
        bend_jitter: 2.0,
        overlap_prob: 0.5,
        overlap_shift: 2.0,
    };
    draw_grid_network(cfg, ReplayToken { seed, index: 0 })
}

fn run(lines: Vec<Line>) -> Outcome {
    Resolver::new(params()).unwrap().run(lines).unwrap()
}

fn check_outcome(out: &Outcome) -> Result<(), TestCaseError> {
    // every point sits on a surviving line
    for p in out.final_points.iter() {
        prop_assert!(out.final_lines.iter().any(|l| l.id() == p.parent));
    }
    // working length never grows between rounds
    for w in out.history.windows(2) {
        prop_assert!(w[1].total_length <= w[0].total_length + 1e-9);
    }
    if out.converged {
        let pts = out.final_points.as_slice();
        for (i, p) in pts.iter().enumerate() {
            for q in &pts[i + 1..] {
                if p.parent != q.parent {
                    prop_assert!((p.position - q.position).norm() > SEPARATION - 1e-9);
                }
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_lines_keep_invariants(lines in random_lines()) {
        let out = run(lines);
        check_outcome(&out)?;
    }

    #[test]
    fn grid_networks_keep_invariants(seed in any::<u64>()) {
        let out = run(small_grid(seed));
        check_outcome(&out)?;
    }

    #[test]
    fn runs_are_deterministic(seed in any::<u64>()) {
        let a = run(small_grid(seed));
        let b = run(small_grid(seed));
        prop_assert_eq!(a.final_lines, b.final_lines);
        prop_assert_eq!(a.final_points, b.final_points);
        prop_assert_eq!(a.rounds_run, b.rounds_run);
        prop_assert_eq!(a.history, b.history);
    }

    #[test]
    fn converged_lines_are_a_fixed_point(lines in random_lines()) {
        let first = run(lines);
        prop_assume!(first.converged);
        let again = run(first.final_lines.clone());
        prop_assert!(again.converged);
        prop_assert_eq!(again.rounds_run, 0);
        prop_assert_eq!(again.final_lines, first.final_lines);
    }

    #[test]
    fn dropping_conflicting_points_leaves_none(lines in random_lines()) {
        let (points, _) = generate_all(&lines, SPACING, 0);
        let kept = drop_conflicting(&PlanarEngine, &points, SEPARATION);
        prop_assert!(kept.len() <= points.len());
        prop_assert!(find_conflicts(&PlanarEngine, &kept, SEPARATION).is_empty());
    }
}
