//! Pairwise proximity between candidates of different lines.

use std::collections::{BTreeSet, HashSet};

use super::types::{ConflictPair, PointId, PointSet};
use crate::geom::GeometryEngine;

/// All different-parent pairs within `radius` (inclusive), each once.
pub fn find_conflicts<E: GeometryEngine>(
    engine: &E,
    points: &PointSet,
    radius: f64,
) -> BTreeSet<ConflictPair> {
    let slice = points.as_slice();
    engine
        .proximity_query(&points.positions(), radius)
        .into_iter()
        .filter(|&(i, j)| slice[i].parent != slice[j].parent)
        .filter_map(|(i, j)| ConflictPair::new(slice[i].id, slice[j].id))
        .collect()
}

/// Drop every point that takes part in a conflict (both sides).
///
/// Ids of the surviving points are unchanged.
pub fn drop_conflicting<E: GeometryEngine>(engine: &E, points: &PointSet, radius: f64) -> PointSet {
    let involved: HashSet<PointId> = find_conflicts(engine, points, radius)
        .into_iter()
        .flat_map(|pair| [pair.lo(), pair.hi()])
        .collect();
    points.retain(|p| !involved.contains(&p.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::PlanarEngine;
    use crate::place::{generate_all, Line};

    fn two_rows(gap: f64) -> PointSet {
        let lines = vec![
            Line::from_xy(1, &[(0.0, 0.0), (30.0, 0.0)]),
            Line::from_xy(2, &[(0.0, gap), (30.0, gap)]),
        ];
        generate_all(&lines, 10.0, 0).0
    }

    #[test]
    fn same_line_points_never_conflict() {
        let lines = vec![Line::from_xy(1, &[(0.0, 0.0), (30.0, 0.0)])];
        let pts = generate_all(&lines, 1.0, 0).0;
        assert!(find_conflicts(&PlanarEngine, &pts, 5.0).is_empty());
    }

    #[test]
    fn parallel_rows_pair_up_once() {
        let pts = two_rows(3.0);
        let conflicts = find_conflicts(&PlanarEngine, &pts, 4.0);
        // (10,0)-(10,3), (20,0)-(20,3), (30,0)-(30,3)
        let got: Vec<(u32, u32)> = conflicts.iter().map(|c| (c.lo().0, c.hi().0)).collect();
        assert_eq!(got, vec![(0, 3), (1, 4), (2, 5)]);
    }

    #[test]
    fn radius_is_inclusive() {
        let pts = two_rows(4.0);
        assert_eq!(find_conflicts(&PlanarEngine, &pts, 4.0).len(), 3);
        assert!(find_conflicts(&PlanarEngine, &pts, 3.999).is_empty());
    }

    #[test]
    fn drop_conflicting_removes_both_sides() {
        let mut lines = vec![
            Line::from_xy(1, &[(0.0, 0.0), (30.0, 0.0)]),
            Line::from_xy(2, &[(0.0, 3.0), (10.0, 3.0)]),
        ];
        lines.push(Line::from_xy(3, &[(100.0, 0.0), (110.0, 0.0)]));
        let pts = generate_all(&lines, 10.0, 0).0;
        let kept = drop_conflicting(&PlanarEngine, &pts, 4.0);
        let ids: Vec<u32> = kept.iter().map(|p| p.id.0).collect();
        // p0 (10,0) and p3 (10,3) conflict; p1, p2 on line 1 and p4 on line 3 stay
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(find_conflicts(&PlanarEngine, &kept, 4.0).is_empty());
    }
}
