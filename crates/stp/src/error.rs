//! Error and warning taxonomy.
//!
//! - Fatal: `ConfigurationError` (raised before round 0) and `PlacementError`.
//! - Recovered per line: `InvalidGeometryError`; the line is skipped and the
//!   error is returned with the outcome as a `Warning`.
//! - Non-fatal: `ConvergenceWarning` when the round budget runs out.

use thiserror::Error;

use crate::place::LineId;

/// What is wrong with a geometry, independent of which line carries it.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeometryFault {
    #[error("polyline has {count} vertices (needs at least 2)")]
    TooFewVertices { count: usize },
    #[error("polyline has zero length")]
    ZeroLength,
    #[error("non-finite coordinate at vertex {index}")]
    NonFinite { index: usize },
    #[error("buffer radius {radius} is not a positive finite number")]
    BadRadius { radius: f64 },
    #[error("{count} stations from point id {first_id} overflow the id range")]
    TooManyStations { count: u64, first_id: u32 },
}

/// Where a per-line failure happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Generate,
    Trim,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Generate => f.write_str("generate"),
            Stage::Trim => f.write_str("trim"),
        }
    }
}

/// A line that could not be processed; it is dropped from the working set.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("line {line} ({stage}): {fault}")]
pub struct InvalidGeometryError {
    pub line: LineId,
    pub stage: Stage,
    pub fault: GeometryFault,
}

/// Parameter combinations rejected before any work starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("min_fragment_length must be >= 0, got {0}")]
    NegativeMinLength(f64),
    #[error("buffer_radius ({buffer}) must be < separation_radius ({separation})")]
    BufferNotBelowSeparation { buffer: f64, separation: f64 },
    #[error("max_iterations must be >= 1")]
    ZeroIterations,
}

/// Fatal errors of a placement run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PlacementError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("duplicate line id {0}")]
    DuplicateLineId(LineId),
}

/// The round budget ran out with conflicts left.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no convergence after {rounds} rounds; {remaining_conflicts} conflicts remain")]
pub struct ConvergenceWarning {
    pub rounds: u32,
    pub remaining_conflicts: usize,
}

/// Non-fatal findings aggregated over a run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Warning {
    #[error(transparent)]
    InvalidGeometry(#[from] InvalidGeometryError),
    #[error(transparent)]
    Convergence(#[from] ConvergenceWarning),
}
