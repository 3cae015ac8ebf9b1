//! Data model of the placement loop.
//!
//! - `LineId`, `Line`: immutable working lines; trimming replaces, never edits.
//! - `PointId`, `CandidatePoint`, `PointSet`: one round's candidates.
//! - `ConflictPair`, `SuppressionMap`: per-round detection and resolution results.

use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

use nalgebra::Vector2;

use crate::geom::Polyline;

/// Stable line identity; fragments keep their source and record where they came from.
///
/// Caller lines have `generation == 0`. A fragment cut in round `g` has
/// `generation == g` and a `part` number unique among that round's fragments
/// of the same source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId {
    pub source: u64,
    pub generation: u32,
    pub part: u32,
}

impl LineId {
    #[inline]
    pub const fn new(source: u64) -> Self {
        Self {
            source,
            generation: 0,
            part: 0,
        }
    }

    #[inline]
    pub const fn fragment(self, generation: u32, part: u32) -> Self {
        Self {
            source: self.source,
            generation,
            part,
        }
    }

    #[inline]
    pub const fn is_fragment(&self) -> bool {
        self.generation > 0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fragment() {
            write!(f, "{}#{}.{}", self.source, self.generation, self.part)
        } else {
            write!(f, "{}", self.source)
        }
    }
}

/// Working line: id, geometry, and length computed once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    id: LineId,
    geometry: Polyline,
    length: f64,
}

impl Line {
    pub fn new(id: LineId, geometry: Polyline) -> Self {
        let length = geometry.length();
        Self {
            id,
            geometry,
            length,
        }
    }

    /// Caller line from `(x, y)` tuples.
    pub fn from_xy(source: u64, coords: &[(f64, f64)]) -> Self {
        Self::new(LineId::new(source), Polyline::from_xy(coords))
    }

    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    #[inline]
    pub fn geometry(&self) -> &Polyline {
        &self.geometry
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }
}

/// Candidate point id; dense within the round that generated it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Proposed placement on a line.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePoint {
    pub id: PointId,
    pub position: Vector2<f64>,
    pub parent: LineId,
    /// Parent line length at generation time.
    pub priority: f64,
    /// Distance from the parent's first vertex.
    pub chainage: f64,
    pub round: u32,
}

/// Points of one round, sorted by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<CandidatePoint>,
}

impl PointSet {
    /// Build from points in any order; ids must be unique.
    pub fn new(mut points: Vec<CandidatePoint>) -> Self {
        points.sort_by_key(|p| p.id);
        debug_assert!(points.windows(2).all(|w| w[0].id < w[1].id));
        Self { points }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<&CandidatePoint> {
        self.points
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.points[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidatePoint> {
        self.points.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[CandidatePoint] {
        &self.points
    }

    pub fn positions(&self) -> Vec<Vector2<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Keep points matching `keep`, ids unchanged.
    pub fn retain(&self, mut keep: impl FnMut(&CandidatePoint) -> bool) -> PointSet {
        PointSet {
            points: self.points.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }

    pub fn into_vec(self) -> Vec<CandidatePoint> {
        self.points
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a CandidatePoint;
    type IntoIter = std::slice::Iter<'a, CandidatePoint>;
    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Unordered pair of points from different lines, stored as `(lo, hi)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictPair {
    lo: PointId,
    hi: PointId,
}

impl ConflictPair {
    /// `None` for a self-pair.
    pub fn new(a: PointId, b: PointId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Some(Self { lo: b, hi: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn lo(&self) -> PointId {
        self.lo
    }

    #[inline]
    pub fn hi(&self) -> PointId {
        self.hi
    }
}

/// Losing line → winner points whose surroundings get erased from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuppressionMap {
    map: BTreeMap<LineId, BTreeSet<PointId>>,
}

impl SuppressionMap {
    pub fn record(&mut self, losing_line: LineId, winner: PointId) {
        self.map.entry(losing_line).or_default().insert(winner);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of losing lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, line: &LineId) -> Option<&BTreeSet<PointId>> {
        self.map.get(line)
    }

    pub fn contains_line(&self, line: &LineId) -> bool {
        self.map.contains_key(line)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, LineId, BTreeSet<PointId>> {
        self.map.iter()
    }
}
