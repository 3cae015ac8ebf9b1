//! Erase winner buffers from losing lines and re-split the remainder.

use std::collections::BTreeMap;

use nalgebra::Vector2;
use tracing::{debug, warn};

use super::types::{Line, PointSet, SuppressionMap};
use crate::error::{GeometryFault, InvalidGeometryError, Stage};
use crate::geom::{GeometryEngine, LEN_EPS, REL_LEN_EPS};

/// New working lines plus what happened to the old ones.
#[derive(Clone, Debug, Default)]
pub struct TrimOutput {
    pub lines: Vec<Line>,
    /// Lines whose erase failed; they are not carried forward.
    pub failures: Vec<InvalidGeometryError>,
    /// Lines swapped for one or more fragments.
    pub replaced: usize,
    /// Lines with no fragment left.
    pub dropped: usize,
}

enum Cut {
    Unchanged,
    Fragments(Vec<crate::geom::Polyline>),
}

fn cut_line<E: GeometryEngine>(
    engine: &E,
    line: &Line,
    centers: &[Vector2<f64>],
    buffer_radius: f64,
    min_length: f64,
) -> Result<Cut, GeometryFault> {
    let region = engine.buffer(centers, buffer_radius)?;
    let multi = engine.difference(line.geometry(), &region)?;
    let before = line.length();
    if multi.parts.len() == 1 && (before - multi.length()).abs() <= LEN_EPS.max(REL_LEN_EPS * before)
    {
        return Ok(Cut::Unchanged);
    }
    Ok(Cut::Fragments(
        engine
            .explode(multi)
            .into_iter()
            .filter(|p| engine.length(p) >= min_length)
            .collect(),
    ))
}

/// Replace every suppressed line by its fragments outside the winner buffers.
///
/// - Unsuppressed lines, and lines the erase does not touch, pass through as-is.
/// - Fragments take their parent's slot, in chainage order, with ids
///   `parent.fragment(generation, n)`; `n` counts per source, starting past
///   any part already used by `lines` in the same generation.
/// - Fragments shorter than `min_length` are discarded; a line with none left is dropped.
pub fn trim<E: GeometryEngine>(
    engine: &E,
    lines: &[Line],
    points: &PointSet,
    suppression: &SuppressionMap,
    buffer_radius: f64,
    min_length: f64,
    generation: u32,
) -> TrimOutput {
    let mut out = TrimOutput {
        lines: Vec::with_capacity(lines.len()),
        ..TrimOutput::default()
    };
    let mut parts_per_source: BTreeMap<u64, u32> = BTreeMap::new();
    for id in lines.iter().map(Line::id).filter(|id| id.generation == generation) {
        let next = parts_per_source.entry(id.source).or_insert(0);
        *next = (*next).max(id.part.saturating_add(1));
    }
    for line in lines {
        let Some(winners) = suppression.get(&line.id()) else {
            out.lines.push(line.clone());
            continue;
        };
        let centers: Vec<Vector2<f64>> = winners
            .iter()
            .filter_map(|id| points.get(*id).map(|p| p.position))
            .collect();
        if centers.is_empty() {
            out.lines.push(line.clone());
            continue;
        }
        match cut_line(engine, line, &centers, buffer_radius, min_length) {
            Ok(Cut::Unchanged) => out.lines.push(line.clone()),
            Ok(Cut::Fragments(parts)) if parts.is_empty() => {
                debug!(line = %line.id(), "line fully consumed");
                out.dropped += 1;
            }
            Ok(Cut::Fragments(parts)) => {
                out.replaced += 1;
                let counter = parts_per_source.entry(line.id().source).or_insert(0);
                for part in parts {
                    let id = line.id().fragment(generation, *counter);
                    *counter += 1;
                    out.lines.push(Line::new(id, part));
                }
            }
            Err(fault) => {
                warn!(line = %line.id(), %fault, "erase failed; dropping line");
                out.failures.push(InvalidGeometryError {
                    line: line.id(),
                    stage: Stage::Trim,
                    fault,
                });
            }
        }
    }
    out
}
