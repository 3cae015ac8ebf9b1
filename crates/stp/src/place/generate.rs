//! Fixed-interval candidate points along lines.

use tracing::warn;

use super::types::{CandidatePoint, Line, PointId, PointSet};
use crate::error::{GeometryFault, InvalidGeometryError, Stage};
use crate::geom::{Walker, REL_LEN_EPS};

/// Lazy sequence of candidates at chainages `spacing, 2·spacing, … <= length`.
///
/// Cloning forks the sequence at its current position; calling `generate`
/// again restarts it.
#[derive(Clone, Debug)]
pub struct Stations<'a> {
    line: &'a Line,
    walker: Walker<'a>,
    spacing: f64,
    k: u64,
    count: u64,
    next_id: u32,
    round: u32,
}

impl Iterator for Stations<'_> {
    type Item = CandidatePoint;

    fn next(&mut self) -> Option<CandidatePoint> {
        if self.k >= self.count {
            return None;
        }
        self.k += 1;
        let chainage = (self.k as f64 * self.spacing).min(self.line.length());
        let position = self.walker.advance(chainage)?;
        let id = PointId(self.next_id);
        self.next_id += 1;
        Some(CandidatePoint {
            id,
            position,
            parent: self.line.id(),
            priority: self.line.length(),
            chainage,
            round: self.round,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.k) as usize;
        (left, Some(left))
    }
}

/// Number of full `spacing` steps that fit on a line of `length`.
fn station_count(length: f64, spacing: f64) -> u64 {
    if !(spacing > 0.0 && spacing.is_finite()) {
        return 0;
    }
    (length * (1.0 + REL_LEN_EPS) / spacing).floor() as u64
}

/// Candidates of one line in round 0, ids from 0.
pub fn generate(line: &Line, spacing: f64) -> Result<Stations<'_>, InvalidGeometryError> {
    stations(line, spacing, 0, 0)
}

/// Candidates of one line tagged with `round`, ids starting at `first_id`.
pub fn stations(
    line: &Line,
    spacing: f64,
    round: u32,
    first_id: u32,
) -> Result<Stations<'_>, InvalidGeometryError> {
    let length = line
        .geometry()
        .validate()
        .map_err(|fault| InvalidGeometryError {
            line: line.id(),
            stage: Stage::Generate,
            fault,
        })?;
    let count = station_count(length, spacing);
    // ids first_id..first_id + count must stay below u32::MAX
    if count > u64::from(u32::MAX - first_id) {
        return Err(InvalidGeometryError {
            line: line.id(),
            stage: Stage::Generate,
            fault: GeometryFault::TooManyStations { count, first_id },
        });
    }
    Ok(Stations {
        line,
        walker: Walker::new(line.geometry()),
        spacing,
        k: 0,
        count,
        next_id: first_id,
        round,
    })
}

/// Candidates of a whole line collection, ids dense in collection order.
///
/// Invalid lines are skipped and returned alongside the points.
pub fn generate_all(
    lines: &[Line],
    spacing: f64,
    round: u32,
) -> (PointSet, Vec<InvalidGeometryError>) {
    let mut points = Vec::new();
    let mut invalid = Vec::new();
    for line in lines {
        // saturates; `stations` then rejects any line that would need more ids
        let first_id = u32::try_from(points.len()).unwrap_or(u32::MAX);
        match stations(line, spacing, round, first_id) {
            Ok(seq) => points.extend(seq),
            Err(err) => {
                warn!(line = %err.line, fault = %err.fault, "skipping line");
                invalid.push(err);
            }
        }
    }
    (PointSet::new(points), invalid)
}
