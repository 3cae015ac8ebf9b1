//! Winner/loser ranking for conflicting candidates.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::types::{ConflictPair, PointId, PointSet, SuppressionMap};

/// Outcome of one conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub winner: PointId,
    pub loser: PointId,
}

/// Longer parent wins; equal priorities go to the lower point id.
///
/// `None` if either point is missing from `points`.
pub fn resolve(pair: ConflictPair, points: &PointSet) -> Option<Resolution> {
    let lo = points.get(pair.lo())?;
    let hi = points.get(pair.hi())?;
    let lo_wins = match lo.priority.total_cmp(&hi.priority) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => true,
    };
    Some(if lo_wins {
        Resolution {
            winner: lo.id,
            loser: hi.id,
        }
    } else {
        Resolution {
            winner: hi.id,
            loser: lo.id,
        }
    })
}

/// Resolve every pair and key each winner under its loser's parent line.
pub fn suppressions(conflicts: &BTreeSet<ConflictPair>, points: &PointSet) -> SuppressionMap {
    let mut map = SuppressionMap::default();
    for &pair in conflicts {
        let Some(res) = resolve(pair, points) else {
            continue;
        };
        if let Some(loser) = points.get(res.loser) {
            map.record(loser.parent, res.winner);
        }
    }
    map
}
